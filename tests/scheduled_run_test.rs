use chrono::{DateTime, TimeZone, Utc};
use httpmock::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use tidbit_bot::config::RawSettings;
use tidbit_bot::core::StepOutcome;
use tidbit_bot::{GeminiClient, RunConfig, RunEngine, TelegramClient};

const TOKEN: &str = "42:run-token";
const CHAT: &str = "-100777";
const MODEL: &str = "gemini-2.0-flash";

fn settings(server: &MockServer) -> RawSettings {
    RawSettings {
        bot_token: Some(TOKEN.to_string()),
        chat_id: Some(CHAT.to_string()),
        gemini_api_key: Some("key".to_string()),
        telegram_api_base: Some(server.base_url()),
        gemini_api_base: Some(server.base_url()),
        gemini_model: Some(MODEL.to_string()),
        ..Default::default()
    }
}

fn engine(config: &RunConfig) -> RunEngine<'_, GeminiClient, TelegramClient> {
    let telegram = TelegramClient::new(&config.telegram_api_base, &config.bot_token).unwrap();
    let gemini = GeminiClient::new(
        &config.gemini_api_base,
        &config.gemini_api_key,
        &config.gemini_model,
        config.generation_timeout,
    )
    .unwrap();
    RunEngine::new(config, gemini, telegram)
}

fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, hour, 5, 0).unwrap()
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
}

#[tokio::test]
async fn test_morning_run_posts_greeting_then_blog() {
    let server = MockServer::start();
    let greeting_gen = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1beta/models/{}:generateContent", MODEL))
            .body_contains("Good Morning");
        then.status(200).json_body(gemini_reply("Rise and compile!"));
    });
    let blog_gen = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1beta/models/{}:generateContent", MODEL))
            .body_contains("blog post");
        then.status(200)
            .json_body(gemini_reply("Why do keyboards have a Scroll Lock key?"));
    });
    let greeting_send = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/bot{}/sendMessage", TOKEN))
            .json_body(json!({
                "chat_id": CHAT,
                "text": "_Rise and compile!_",
                "parse_mode": "Markdown"
            }));
        then.status(200).json_body(json!({"ok": true, "result": {}}));
    });
    let blog_send = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/bot{}/sendMessage", TOKEN))
            .json_body(json!({
                "chat_id": CHAT,
                "text": "*Tech Tidbit:*\nWhy do keyboards have a Scroll Lock key?",
                "parse_mode": "Markdown"
            }));
        then.status(200).json_body(json!({"ok": true, "result": {}}));
    });

    let config = RunConfig::from_raw(settings(&server)).unwrap();
    let report = engine(&config)
        .run(at(3, 3, 9), &mut StdRng::seed_from_u64(1))
        .await;

    assert_eq!(report.greeting, StepOutcome::Sent);
    assert_eq!(report.blog, StepOutcome::Sent);
    greeting_gen.assert();
    blog_gen.assert();
    greeting_send.assert();
    blog_send.assert();
}

#[tokio::test]
async fn test_christmas_afternoon_sends_holiday_text() {
    let server = MockServer::start();
    let generation = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1beta/models/{}:generateContent", MODEL));
        then.status(200).json_body(gemini_reply("Santa's sleigh now has OTA updates."));
    });
    let holiday_send = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/bot{}/sendMessage", TOKEN))
            .body_contains("Merry Christmas");
        then.status(200).json_body(json!({"ok": true, "result": {}}));
    });
    let blog_send = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/bot{}/sendMessage", TOKEN))
            .body_contains("Tech Tidbit");
        then.status(200).json_body(json!({"ok": true, "result": {}}));
    });

    let config = RunConfig::from_raw(settings(&server)).unwrap();
    let report = engine(&config)
        .run(at(12, 25, 14), &mut StdRng::seed_from_u64(1))
        .await;

    assert_eq!(report.sent_count(), 2);
    // 只有短文需要生成
    generation.assert_hits(1);
    holiday_send.assert();
    blog_send.assert();
}

#[tokio::test]
async fn test_generation_timeout_skips_blog_but_run_completes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1beta/models/{}:generateContent", MODEL));
        then.status(200)
            .delay(std::time::Duration::from_secs(3))
            .json_body(gemini_reply("too late"));
    });
    let sends = server.mock(|when, then| {
        when.method(POST).path(format!("/bot{}/sendMessage", TOKEN));
        then.status(200).json_body(json!({"ok": true, "result": {}}));
    });

    let mut raw = settings(&server);
    raw.generation_timeout_secs = Some(1);
    let config = RunConfig::from_raw(raw).unwrap();

    // 深夜：不發問候，只嘗試短文
    let report = engine(&config)
        .run(at(6, 6, 23), &mut StdRng::seed_from_u64(1))
        .await;

    assert_eq!(report.greeting, StepOutcome::Skipped);
    assert!(matches!(report.blog, StepOutcome::GenerationFailed(_)));
    sends.assert_hits(0);
}

#[tokio::test]
async fn test_forbidden_greeting_does_not_abort_blog() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1beta/models/{}:generateContent", MODEL));
        then.status(200).json_body(gemini_reply("Good Evening, techies"));
    });
    let sends = server.mock(|when, then| {
        when.method(POST).path(format!("/bot{}/sendMessage", TOKEN));
        then.status(403).json_body(json!({
            "ok": false,
            "error_code": 403,
            "description": "Forbidden: bot is not a member of the channel chat"
        }));
    });

    let config = RunConfig::from_raw(settings(&server)).unwrap();
    let report = engine(&config)
        .run(at(9, 9, 20), &mut StdRng::seed_from_u64(1))
        .await;

    assert!(matches!(report.greeting, StepOutcome::DeliveryFailed(ref e) if e.contains("not a member")));
    assert!(matches!(report.blog, StepOutcome::DeliveryFailed(_)));
    sends.assert_hits(2);
}

#[tokio::test]
async fn test_operator_is_alerted_on_generation_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1beta/models/{}:generateContent", MODEL));
        then.status(500).body("internal");
    });
    let alert = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/bot{}/sendMessage", TOKEN))
            .json_body_partial(r#"{"chat_id": "555"}"#);
        then.status(200).json_body(json!({"ok": true, "result": {}}));
    });

    let mut raw = settings(&server);
    raw.operator_chat_id = Some("555".to_string());
    let config = RunConfig::from_raw(raw).unwrap();

    let report = engine(&config)
        .run(at(2, 2, 10), &mut StdRng::seed_from_u64(1))
        .await;

    assert!(matches!(report.greeting, StepOutcome::GenerationFailed(_)));
    assert!(matches!(report.blog, StepOutcome::GenerationFailed(_)));
    alert.assert_hits(2);
}

#[tokio::test]
async fn test_static_policy_file_with_night_greetings() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1beta/models/{}:generateContent", MODEL));
        then.status(200).json_body(gemini_reply("Midnight snack for your CPU."));
    });
    let night_send = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/bot{}/sendMessage", TOKEN))
            .body_contains("Night owls welcome");
        then.status(200).json_body(json!({"ok": true, "result": {}}));
    });
    let blog_send = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/bot{}/sendMessage", TOKEN))
            .body_contains("Midnight snack");
        then.status(200).json_body(json!({"ok": true, "result": {}}));
    });

    let mut policy_file = NamedTempFile::new().unwrap();
    policy_file
        .write_all(
            br#"
[bands]
preset = "early-evening"
night_greetings = true

[source]
kind = "static"

[source.pool]
night = ["Night owls welcome"]
"#,
        )
        .unwrap();

    let mut raw = settings(&server);
    raw.policy_path = Some(policy_file.path().to_string_lossy().to_string());
    let config = RunConfig::from_raw(raw).unwrap();

    let report = engine(&config)
        .run(at(8, 8, 23), &mut StdRng::seed_from_u64(3))
        .await;

    assert_eq!(report.sent_count(), 2);
    night_send.assert();
    blog_send.assert();
}

#[test]
fn test_missing_secrets_fail_before_any_request() {
    let server = MockServer::start();
    let anything = server.mock(|when, then| {
        when.any_request();
        then.status(200);
    });

    let mut raw = settings(&server);
    raw.gemini_api_key = None;

    let err = RunConfig::from_raw(raw).unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("GEMINIAPIKEY"));
    anything.assert_hits(0);
}

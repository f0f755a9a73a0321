#[cfg(feature = "lambda")]
use chrono::Utc;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use rand::rngs::StdRng;
#[cfg(feature = "lambda")]
use rand::SeedableRng;
#[cfg(feature = "lambda")]
use serde::Serialize;
#[cfg(feature = "lambda")]
use tidbit_bot::core::RunReport;
#[cfg(feature = "lambda")]
use tidbit_bot::utils::logger;
#[cfg(feature = "lambda")]
use tidbit_bot::{GeminiClient, RunConfig, RunEngine, TelegramClient};

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub messages_sent: usize,
    pub report: RunReport,
}

/// EventBridge 排程事件的內容不需要，只當作觸發
#[cfg(feature = "lambda")]
async fn function_handler(_event: LambdaEvent<serde_json::Value>) -> Result<Response, Error> {
    tracing::info!("Starting tidbit-bot Lambda function");

    let config = RunConfig::from_env().map_err(|e| {
        tracing::error!("❌ Configuration validation failed: {}", e);
        Box::new(e) as Box<dyn std::error::Error + Send + Sync>
    })?;

    let telegram = TelegramClient::new(&config.telegram_api_base, &config.bot_token)?;
    let gemini = GeminiClient::new(
        &config.gemini_api_base,
        &config.gemini_api_key,
        &config.gemini_model,
        config.generation_timeout,
    )?;

    let engine = RunEngine::new(&config, gemini, telegram);
    let mut rng = StdRng::from_entropy();
    let report = engine.run(Utc::now(), &mut rng).await;

    let response = Response {
        message: "Scheduled run completed".to_string(),
        messages_sent: report.sent_count(),
        report,
    };

    tracing::info!("tidbit-bot Lambda function completed");
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}

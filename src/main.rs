use chrono::Utc;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tidbit_bot::core::Greeting;
use tidbit_bot::utils::logger;
use tidbit_bot::{CliConfig, GeminiClient, RunEngine, TelegramClient};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting tidbit-bot");
    let dry_run = cli.dry_run;

    // 讀取並驗證設定，失敗時不做任何網路呼叫
    let config = match cli.into_run_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    tracing::debug!("Run config: {:?}", config);

    let clients = TelegramClient::new(&config.telegram_api_base, &config.bot_token).and_then(
        |telegram| {
            GeminiClient::new(
                &config.gemini_api_base,
                &config.gemini_api_key,
                &config.gemini_model,
                config.generation_timeout,
            )
            .map(|gemini| (telegram, gemini))
        },
    );
    let (telegram, gemini) = match clients {
        Ok(clients) => clients,
        Err(e) => {
            tracing::error!("❌ Failed to build HTTP clients: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let engine = RunEngine::new(&config, gemini, telegram);
    let mut rng = StdRng::from_entropy();
    let now = Utc::now();

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No messages will be sent");
        match engine.preview(now, &mut rng) {
            Some(Greeting::Ready(text)) => println!("Greeting: {}", text),
            Some(Greeting::Prompt(prompt)) => println!("Greeting prompt: {}", prompt),
            None => println!("No greeting for this hour"),
        }
        println!("Blog prompt: {}", config.policy.blog.prompt);
        return;
    }

    // 發送結果不影響退出碼
    let report = engine.run(now, &mut rng).await;
    println!("✅ Run complete: {} message(s) sent", report.sent_count());
}

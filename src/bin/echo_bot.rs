use anyhow::{Context, Result};
use tidbit_bot::core::echo::reply_for;
use tidbit_bot::core::Messenger;
use tidbit_bot::utils::logger;
use tidbit_bot::TelegramClient;

const POLL_TIMEOUT_SECS: u64 = 30;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logger::init_cli_logger(false);

    let token = match std::env::var("TELEGRAM_BOT_TOKEN") {
        Ok(token) if !token.trim().is_empty() => token,
        _ => {
            tracing::error!("TELEGRAM_BOT_TOKEN environment variable is not set. Exiting.");
            std::process::exit(1);
        }
    };
    let api_base = std::env::var("TELEGRAM_API_BASE")
        .unwrap_or_else(|_| tidbit_bot::config::DEFAULT_TELEGRAM_API_BASE.to_string());

    let client = TelegramClient::new(&api_base, &token).context("building Telegram client")?;

    tracing::info!("Bot started long-polling...");
    tokio::select! {
        result = poll(&client) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl-C, shutting down");
            Ok(())
        }
    }
}

async fn poll(client: &TelegramClient) -> Result<()> {
    let mut offset = None;

    loop {
        let updates = match client.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!("getUpdates failed: {}", e);
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);

            let Some(message) = update.message else {
                continue;
            };
            let Some(reply) = reply_for(&message) else {
                continue;
            };

            let chat_id = message.chat.id.to_string();
            if let Err(e) = client.send_message(&chat_id, &reply, false).await {
                tracing::warn!("Failed to reply in chat {}: {}", chat_id, e);
            }
        }
    }
}

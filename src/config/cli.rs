use crate::config::{RawSettings, RunConfig};
use crate::utils::error::Result;
use clap::Parser;

/// 所有參數都可由環境變數提供，排程器不帶參數直接執行即可
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "tidbit-bot")]
#[command(about = "Posts a time-based greeting and a generated tech tidbit to a Telegram chat")]
pub struct CliConfig {
    #[arg(long, env = "TELEGRAMBOTTOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    #[arg(long, env = "TELEGRAMCHATID")]
    pub chat_id: Option<String>,

    #[arg(long, env = "GEMINIAPIKEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Chat that receives generation failure alerts
    #[arg(long, env = "OPERATORCHATID")]
    pub operator_chat_id: Option<String>,

    /// Path to a greeting policy TOML file
    #[arg(long, env = "GREETING_POLICY")]
    pub policy: Option<String>,

    #[arg(long, env = "TELEGRAM_API_BASE")]
    pub telegram_api_base: Option<String>,

    #[arg(long, env = "GEMINI_API_BASE")]
    pub gemini_api_base: Option<String>,

    #[arg(long, env = "GEMINI_MODEL")]
    pub gemini_model: Option<String>,

    /// Seconds to wait for a generation before giving up
    #[arg(long, env = "GENERATION_TIMEOUT_SECS")]
    pub generation_timeout: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Print the selected greeting without calling any API
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn into_run_config(self) -> Result<RunConfig> {
        RunConfig::from_raw(RawSettings {
            bot_token: self.bot_token,
            chat_id: self.chat_id,
            gemini_api_key: self.gemini_api_key,
            operator_chat_id: self.operator_chat_id,
            policy_path: self.policy,
            telegram_api_base: self.telegram_api_base,
            gemini_api_base: self.gemini_api_base,
            gemini_model: self.gemini_model,
            generation_timeout_secs: self.generation_timeout,
        })
    }
}

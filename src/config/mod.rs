#[cfg(feature = "cli")]
pub mod cli;
pub mod policy;

use crate::config::policy::GreetingPolicy;
use crate::utils::error::{BotError, Result};
use crate::utils::validation::{validate_range, validate_required_field, validate_url, Validate};
use std::env;
use std::fmt;
use std::time::Duration;

pub const BOT_TOKEN_VAR: &str = "TELEGRAMBOTTOKEN";
pub const CHAT_ID_VAR: &str = "TELEGRAMCHATID";
pub const GEMINI_API_KEY_VAR: &str = "GEMINIAPIKEY";
pub const OPERATOR_CHAT_ID_VAR: &str = "OPERATORCHATID";
pub const TIMEOUT_VAR: &str = "GENERATION_TIMEOUT_SECS";

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// 啟動時建立一次，整個執行期間不變
#[derive(Clone)]
pub struct RunConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub gemini_api_key: String,
    pub operator_chat_id: Option<String>,
    pub telegram_api_base: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub generation_timeout: Duration,
    pub policy: GreetingPolicy,
}

/// 尚未驗證的原始設定值
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub gemini_api_key: Option<String>,
    pub operator_chat_id: Option<String>,
    pub policy_path: Option<String>,
    pub telegram_api_base: Option<String>,
    pub gemini_api_base: Option<String>,
    pub gemini_model: Option<String>,
    pub generation_timeout_secs: Option<u64>,
}

impl RunConfig {
    /// 給非 CLI 入口 (例如 Lambda) 使用
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let generation_timeout_secs = match var(TIMEOUT_VAR) {
            Some(value) => Some(value.trim().parse::<u64>().map_err(|e| {
                BotError::InvalidConfigValueError {
                    field: TIMEOUT_VAR.to_string(),
                    value: value.clone(),
                    reason: format!("expected whole seconds: {}", e),
                }
            })?),
            None => None,
        };

        Self::from_raw(RawSettings {
            bot_token: var(BOT_TOKEN_VAR),
            chat_id: var(CHAT_ID_VAR),
            gemini_api_key: var(GEMINI_API_KEY_VAR),
            operator_chat_id: var(OPERATOR_CHAT_ID_VAR),
            policy_path: var("GREETING_POLICY"),
            telegram_api_base: var("TELEGRAM_API_BASE"),
            gemini_api_base: var("GEMINI_API_BASE"),
            gemini_model: var("GEMINI_MODEL"),
            generation_timeout_secs,
        })
    }

    /// 必填值缺少時立即回傳錯誤，不做任何網路呼叫
    pub fn from_raw(raw: RawSettings) -> Result<Self> {
        let bot_token = validate_required_field(BOT_TOKEN_VAR, raw.bot_token.as_deref())?;
        let chat_id = validate_required_field(CHAT_ID_VAR, raw.chat_id.as_deref())?;
        let gemini_api_key =
            validate_required_field(GEMINI_API_KEY_VAR, raw.gemini_api_key.as_deref())?;

        let policy = match raw.policy_path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => {
                tracing::info!("📁 Loading greeting policy from: {}", path);
                GreetingPolicy::from_file(path)?
            }
            _ => GreetingPolicy::default(),
        };

        let config = Self {
            bot_token,
            chat_id,
            gemini_api_key,
            operator_chat_id: raw
                .operator_chat_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            telegram_api_base: raw
                .telegram_api_base
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
            gemini_api_base: raw
                .gemini_api_base
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            gemini_model: raw
                .gemini_model
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            generation_timeout: Duration::from_secs(
                raw.generation_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            policy,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_url("telegram_api_base", &self.telegram_api_base)?;
        validate_url("gemini_api_base", &self.gemini_api_base)?;
        crate::utils::validation::validate_non_empty_string("gemini_model", &self.gemini_model)?;
        validate_range(
            "generation_timeout_secs",
            self.generation_timeout.as_secs(),
            1,
            600,
        )?;
        self.policy.validate()?;

        tracing::debug!("✅ Run configuration validation passed");
        Ok(())
    }
}

// 不輸出密鑰
impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("gemini_api_key", &"<redacted>")
            .field("operator_chat_id", &self.operator_chat_id)
            .field("telegram_api_base", &self.telegram_api_base)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("gemini_model", &self.gemini_model)
            .field("generation_timeout", &self.generation_timeout)
            .finish_non_exhaustive()
    }
}

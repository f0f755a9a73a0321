use thiserror::Error;

/// 內容生成失敗的種類
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("generation returned empty text")]
    Empty,

    #[error("generation failed: {0}")]
    Failed(String),
}

#[derive(Error, Debug)]
pub enum BotError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Content generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Message delivery failed with status {status}: {body}")]
    DeliveryError { status: u16, body: String },

    #[error("Telegram API rejected the request: {description}")]
    TelegramError { description: String },

    #[error("Message text cannot be empty")]
    EmptyMessageError,

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Generation,
    Delivery,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BotError::MissingConfigError { .. }
            | BotError::InvalidConfigValueError { .. }
            | BotError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            BotError::Generation(_) => ErrorCategory::Generation,
            BotError::ApiError(_)
            | BotError::DeliveryError { .. }
            | BotError::TelegramError { .. }
            | BotError::EmptyMessageError => ErrorCategory::Delivery,
            BotError::IoError(_) | BotError::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// 設定錯誤會中止執行，其餘錯誤只影響單次發送
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Critical,
            ErrorCategory::System => ErrorSeverity::High,
            ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Generation => ErrorSeverity::Low,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BotError::MissingConfigError { field } => {
                format!("Missing required configuration value: {}", field)
            }
            BotError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            BotError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            BotError::Generation(e) => format!("Could not generate content: {}", e),
            BotError::DeliveryError { status, .. } => {
                format!("Messaging API refused the message (HTTP {})", status)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BotError::MissingConfigError { .. } => {
                "Set TELEGRAMBOTTOKEN, TELEGRAMCHATID and GEMINIAPIKEY (e.g. as repository secrets)"
            }
            BotError::InvalidConfigValueError { .. } | BotError::ConfigValidationError { .. } => {
                "Check the greeting policy file and environment overrides"
            }
            BotError::Generation(_) => "The next scheduled run will try again",
            BotError::DeliveryError { status: 401, .. }
            | BotError::DeliveryError { status: 403, .. } => {
                "Check the bot token and that the bot is a member of the target chat"
            }
            BotError::DeliveryError { .. }
            | BotError::TelegramError { .. }
            | BotError::ApiError(_) => "Check network connectivity and the messaging API status",
            BotError::EmptyMessageError => "Nothing to send; make sure the message has content",
            BotError::IoError(_) | BotError::SerializationError(_) => {
                "Check file permissions and input formats"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

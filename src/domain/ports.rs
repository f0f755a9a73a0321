use crate::utils::error::{GenerationError, Result};
use async_trait::async_trait;

/// 文字生成服務 (prompt -> text)
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError>;
}

/// 訊息平台的發送介面
#[async_trait]
pub trait Messenger: Send + Sync {
    /// `markdown` 為 false 時以純文字送出
    async fn send_message(&self, chat_id: &str, text: &str, markdown: bool) -> Result<()>;
}

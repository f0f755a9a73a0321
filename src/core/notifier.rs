use crate::domain::model::OutboundMessage;
use crate::domain::ports::Messenger;
use crate::utils::error::{BotError, Result};

/// 發送單則訊息，失敗只記錄不重試
pub struct Notifier<M: Messenger> {
    messenger: M,
}

impl<M: Messenger> Notifier<M> {
    pub fn new(messenger: M) -> Self {
        Self { messenger }
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    pub async fn notify(&self, chat_id: &str, message: &OutboundMessage) -> Result<()> {
        let text = message.render();
        tracing::debug!("Sending {} chars to chat {}", text.len(), chat_id);

        match self
            .messenger
            .send_message(chat_id, &text, message.uses_markup())
            .await
        {
            Ok(()) => {
                tracing::info!("✅ Message sent successfully");
                Ok(())
            }
            Err(e) => {
                match &e {
                    BotError::DeliveryError { status, body } => {
                        tracing::warn!("❌ Error sending message: HTTP {}", status);
                        tracing::warn!("Response content: {}", body);
                    }
                    other => tracing::warn!("❌ Error sending message: {}", other),
                }
                Err(e)
            }
        }
    }
}

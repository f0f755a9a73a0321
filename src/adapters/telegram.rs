use crate::domain::ports::Messenger;
use crate::utils::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram Bot API 的回應外層
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
}

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    api_base: String,
    token: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, token: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// 以 long polling 取得新訊息
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let mut query = vec![("timeout", timeout_secs.to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&query)
            .timeout(Duration::from_secs(timeout_secs) + REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| BotError::ApiError(e.without_url()))?;

        let updates: Option<Vec<Update>> = Self::unwrap_response(response).await?;
        Ok(updates.unwrap_or_default())
    }

    async fn unwrap_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<Option<T>> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BotError::ApiError(e.without_url()))?;

        if !status.is_success() {
            return Err(BotError::DeliveryError {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
        if !envelope.ok {
            return Err(BotError::TelegramError {
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        Ok(envelope.result)
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, chat_id: &str, text: &str, markdown: bool) -> Result<()> {
        let payload = SendMessageRequest {
            chat_id,
            text,
            parse_mode: markdown.then_some("Markdown"),
        };

        tracing::debug!("POST sendMessage (parse_mode: {:?})", payload.parse_mode);
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| BotError::ApiError(e.without_url()))?;

        tracing::debug!("sendMessage response status: {}", response.status());
        Self::unwrap_response::<serde_json::Value>(response).await?;
        Ok(())
    }
}

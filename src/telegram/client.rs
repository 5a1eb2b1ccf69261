use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Messenger, OutboundReply, TelegramError, Update, UpdateBatch};

/// Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        TelegramClient {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Checks the token and returns the bot account.
    pub async fn get_me(&self) -> Result<BotUser, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    pub async fn get_updates(
        &self,
        offset: i64,
        timeout: Duration,
    ) -> Result<UpdateBatch, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: &["message"],
        };
        let raw: Vec<RawUpdate> = self.call("getUpdates", &request).await?;

        let mut batch = UpdateBatch {
            next_offset: offset,
            updates: Vec::with_capacity(raw.len()),
        };
        for update in raw {
            batch.next_offset = batch.next_offset.max(update.update_id + 1);
            match update.message {
                Some(message) => batch.updates.push(Update::new(
                    update.update_id,
                    message.chat.id,
                    message.message_id,
                    message.text.unwrap_or_default(),
                )),
                None => debug!(update_id = update.update_id, "dropping non-message update"),
            }
        }

        Ok(batch)
    }

    pub async fn send_message(&self, reply: &OutboundReply) -> Result<(), TelegramError> {
        let request = SendMessageRequest {
            chat_id: reply.chat_id,
            text: &reply.text,
            reply_to_message_id: reply.reply_to_message_id,
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned, B: Serialize>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, TelegramError> {
        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);
        debug!(method, "telegram request");
        let resp = self.client.post(&url).json(body).send().await?;

        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, TelegramError> {
        let status = resp.status();
        let text = resp.text().await?;

        let envelope: ApiResponse<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Api {
                    code: i64::from(status.as_u16()),
                    description: text,
                })
            }
            Err(err) => return Err(err.into()),
        };

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                error_code,
                description,
                ..
            } => Err(TelegramError::Api {
                code: error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                description: description.unwrap_or_else(|| "missing result".to_string()),
            }),
        }
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn poll_updates(
        &self,
        offset: i64,
        timeout: Duration,
    ) -> Result<UpdateBatch, TelegramError> {
        self.get_updates(offset, timeout).await
    }

    async fn send_reply(&self, reply: &OutboundReply) -> Result<(), TelegramError> {
        self.send_message(reply).await
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
}

#[derive(Serialize)]
struct GetUpdatesRequest<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    reply_to_message_id: i64,
}

#[derive(Deserialize)]
struct RawUpdate {
    update_id: i64,
    message: Option<RawMessage>,
}

#[derive(Deserialize)]
struct RawMessage {
    message_id: i64,
    chat: RawChat,
    text: Option<String>,
}

#[derive(Deserialize)]
struct RawChat {
    id: i64,
}

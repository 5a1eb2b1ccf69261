//! Messaging gateway: inbound updates and threaded replies over the Telegram Bot API.

mod client;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use client::{BotUser, TelegramClient};

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {code} - {description}")]
    Api { code: i64, description: String },
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Blocks up to `timeout` waiting for updates at or after `offset`.
    async fn poll_updates(
        &self,
        offset: i64,
        timeout: Duration,
    ) -> Result<UpdateBatch, TelegramError>;

    async fn send_reply(&self, reply: &OutboundReply) -> Result<(), TelegramError>;
}

#[derive(Debug, Clone, Default)]
pub struct UpdateBatch {
    /// Cursor for the next poll; acknowledges everything in this batch.
    pub next_offset: i64,
    pub updates: Vec<Update>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub update_id: i64,
    pub chat_id: i64,
    pub message_id: i64,
    pub text: String,
    pub command: Option<String>,
    pub argument: Option<String>,
}

impl Update {
    pub fn new(update_id: i64, chat_id: i64, message_id: i64, text: impl Into<String>) -> Self {
        let text = text.into();
        let (command, argument) = match parse_command(&text) {
            Some((command, argument)) => (Some(command), Some(argument)),
            None => (None, None),
        };

        Update {
            update_id,
            chat_id,
            message_id,
            text,
            command,
            argument,
        }
    }

    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub chat_id: i64,
    pub reply_to_message_id: i64,
    pub text: String,
}

/// Splits `/name@bot some args` into `("name", "some args")`.
pub fn parse_command(text: &str) -> Option<(String, String)> {
    let rest = text.strip_prefix('/')?;
    let (head, argument) = match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    };
    let name = head.split('@').next().unwrap_or_default();
    if name.is_empty() {
        return None;
    }

    Some((name.to_string(), argument.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_with_argument() {
        assert_eq!(
            parse_command("/p   btc "),
            Some(("p".to_string(), "btc".to_string()))
        );
    }

    #[test]
    fn strips_bot_mention() {
        assert_eq!(
            parse_command("/help@paprika_bot"),
            Some(("help".to_string(), String::new()))
        );
        assert_eq!(
            parse_command("/v@paprika_bot eth"),
            Some(("v".to_string(), "eth".to_string()))
        );
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert!(parse_command("hello there").is_none());
        assert!(parse_command("/").is_none());
        assert!(parse_command("/ btc").is_none());
        assert!(parse_command("").is_none());
    }

    #[test]
    fn update_carries_parsed_command() {
        let update = Update::new(7, 42, 3, "/s xrp");
        assert!(update.is_command());
        assert_eq!(update.command.as_deref(), Some("s"));
        assert_eq!(update.argument.as_deref(), Some("xrp"));

        let chat = Update::new(8, 42, 4, "gm");
        assert!(!chat.is_command());
        assert!(chat.argument.is_none());
    }
}

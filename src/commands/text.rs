use async_trait::async_trait;

use super::{CommandError, CommandHandler, CommandUsage};
use crate::market::MarketData;

/// Replies with fixed text regardless of the argument.
pub struct StaticReply {
    text: String,
}

impl StaticReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl CommandHandler for StaticReply {
    async fn handle(
        &self,
        _market: &dyn MarketData,
        _argument: &str,
    ) -> Result<String, CommandError> {
        Ok(self.text.clone())
    }
}

pub fn help_text(usage: &[CommandUsage]) -> String {
    let rows: Vec<(String, &str)> = usage
        .iter()
        .map(|entry| {
            let names = entry
                .names
                .iter()
                .map(|name| format!("/{name}"))
                .collect::<Vec<_>>()
                .join(" or ");
            let invocation = match entry.argument {
                Some(argument) => format!("{names} {argument}"),
                None => names,
            };
            (invocation, entry.summary)
        })
        .collect();
    let width = rows.iter().map(|(invocation, _)| invocation.len()).max().unwrap_or(0);

    let mut text = String::from("Please use one of the commands:\n\n");
    for (invocation, summary) in rows {
        text.push_str(&format!("{invocation:<width$}  {summary}\n"));
    }
    text
}

//! Bot commands and the registry that maps command names to handlers.

mod quote;
mod text;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::constants::{SOURCE_URL, WEBSITE_URL};
use crate::market::{MarketData, MarketDataError};

pub use quote::{QuoteHandler, QuoteView, QUOTE_CURRENCIES};
pub use text::{help_text, StaticReply};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{argument} is invalid coin name|ticker|symbol")]
    NotFound { argument: String },
    #[error("incomplete market data for {argument}: missing {field}")]
    MissingData {
        argument: String,
        field: &'static str,
    },
    #[error("command /{command} argument:{argument}")]
    Upstream {
        command: &'static str,
        argument: String,
        #[source]
        source: MarketDataError,
    },
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, market: &dyn MarketData, argument: &str)
        -> Result<String, CommandError>;
}

/// Usage line shown in the help text.
#[derive(Debug, Clone)]
pub struct CommandUsage {
    pub names: Vec<&'static str>,
    pub argument: Option<&'static str>,
    pub summary: &'static str,
}

pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    fallback: Arc<dyn CommandHandler>,
}

impl CommandRegistry {
    pub fn new(fallback: Arc<dyn CommandHandler>) -> Self {
        Self {
            handlers: HashMap::new(),
            fallback,
        }
    }

    pub fn register(mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Registers a quote handler under the view's own command name.
    pub fn register_quote(self, view: QuoteView) -> Self {
        self.register(view.command(), Arc::new(QuoteHandler::new(view)))
    }

    /// Unknown names resolve to the fallback handler.
    pub fn resolve(&self, name: &str) -> &dyn CommandHandler {
        self.handlers
            .get(name)
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn standard() -> Self {
        let usage = standard_usage();
        let help: Arc<dyn CommandHandler> = Arc::new(StaticReply::new(help_text(&usage)));

        CommandRegistry::new(Arc::clone(&help))
            .register("start", Arc::clone(&help))
            .register("help", help)
            .register_quote(QuoteView::Price)
            .register_quote(QuoteView::Supply)
            .register_quote(QuoteView::Volume)
            .register("website", Arc::new(StaticReply::new(WEBSITE_URL)))
            .register("source", Arc::new(StaticReply::new(SOURCE_URL)))
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn standard_usage() -> Vec<CommandUsage> {
    vec![
        CommandUsage {
            names: vec!["start", "help"],
            argument: None,
            summary: "show this message",
        },
        CommandUsage {
            names: vec!["p"],
            argument: Some("<symbol>"),
            summary: "check the price for given coin",
        },
        CommandUsage {
            names: vec!["s"],
            argument: Some("<symbol>"),
            summary: "check the circulating supply for given coin",
        },
        CommandUsage {
            names: vec!["v"],
            argument: Some("<symbol>"),
            summary: "check the 24h volume for given coin",
        },
        CommandUsage {
            names: vec!["website"],
            argument: None,
            summary: "show link to the coinpaprika webpage",
        },
        CommandUsage {
            names: vec!["source"],
            argument: None,
            summary: "show source code of this bot",
        },
    ]
}

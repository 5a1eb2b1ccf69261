//! Market data client: coin search and ticker snapshots.

mod paprika;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub use paprika::PaprikaClient;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait MarketData: Send + Sync {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResult, MarketDataError>;

    async fn ticker(&self, id: &str, quotes: &[&str]) -> Result<Ticker, MarketDataError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchModifier {
    /// Match ticker symbols only, never display names.
    SymbolSearch,
}

impl SearchModifier {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchModifier::SymbolSearch => "symbol_search",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub categories: Vec<String>,
    pub modifier: Option<SearchModifier>,
    pub limit: Option<u32>,
}

impl SearchOptions {
    pub fn currency_symbols() -> Self {
        Self {
            categories: vec!["currencies".to_string()],
            modifier: Some(SearchModifier::SymbolSearch),
            limit: None,
        }
    }
}

/// Candidates ordered by relevance; the first entry is the best match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub currencies: Vec<CurrencyMatch>,
}

impl SearchResult {
    pub fn best_match(&self) -> Option<&CurrencyMatch> {
        self.currencies.first()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencyMatch {
    pub id: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub rank: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ticker {
    pub id: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub rank: Option<i64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quotes: HashMap<String, Quote>,
}

impl Ticker {
    pub fn quote(&self, currency: &str) -> Option<&Quote> {
        self.quotes.get(currency)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Quote {
    pub price: Option<f64>,
    pub volume_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub percent_change_24h: Option<f64>,
}

/// Treats an explicit `null` the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{MarketData, MarketDataError, SearchOptions, SearchResult, Ticker};

/// HTTP client for the coinpaprika REST API.
#[derive(Clone)]
pub struct PaprikaClient {
    client: Client,
    base_url: String,
}

impl PaprikaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        PaprikaClient {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResult, MarketDataError> {
        let mut params: Vec<(&str, String)> = vec![("q", query.to_string())];
        if !options.categories.is_empty() {
            params.push(("c", options.categories.join(",")));
        }
        if let Some(modifier) = options.modifier {
            params.push(("modifier", modifier.as_str().to_string()));
        }
        if let Some(limit) = options.limit {
            params.push(("limit", limit.to_string()));
        }

        self.get("/v1/search", &params).await
    }

    pub async fn ticker(&self, id: &str, quotes: &[&str]) -> Result<Ticker, MarketDataError> {
        let path = format!("/v1/tickers/{id}");
        let mut params = Vec::new();
        if !quotes.is_empty() {
            params.push(("quotes", quotes.join(",")));
        }

        self.get(&path, &params).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, MarketDataError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?params, "coinpaprika request");
        let resp = self.client.get(&url).query(params).send().await?;

        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, MarketDataError> {
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|err| err.error)
                .unwrap_or(text);
            return Err(MarketDataError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
}

#[async_trait]
impl MarketData for PaprikaClient {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResult, MarketDataError> {
        PaprikaClient::search(self, query, options).await
    }

    async fn ticker(&self, id: &str, quotes: &[&str]) -> Result<Ticker, MarketDataError> {
        PaprikaClient::ticker(self, id, quotes).await
    }
}

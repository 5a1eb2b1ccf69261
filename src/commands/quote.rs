use async_trait::async_trait;
use tracing::debug;

use super::{CommandError, CommandHandler};
use crate::constants::COIN_PAGE_URL;
use crate::market::{MarketData, MarketDataError, SearchOptions, Ticker};

pub const QUOTE_CURRENCIES: [&str; 2] = ["USD", "BTC"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteView {
    Price,
    Supply,
    Volume,
}

impl QuoteView {
    /// Name the view is registered under, without the leading slash.
    pub fn command(self) -> &'static str {
        match self {
            QuoteView::Price => "p",
            QuoteView::Supply => "s",
            QuoteView::Volume => "v",
        }
    }
}

/// Resolves the argument by symbol search, fetches its ticker and renders one view of it.
pub struct QuoteHandler {
    view: QuoteView,
}

impl QuoteHandler {
    pub fn new(view: QuoteView) -> Self {
        Self { view }
    }

    fn upstream(&self, argument: &str) -> impl FnOnce(MarketDataError) -> CommandError {
        let command = self.view.command();
        let argument = argument.to_string();
        move |source| CommandError::Upstream {
            command,
            argument,
            source,
        }
    }
}

#[async_trait]
impl CommandHandler for QuoteHandler {
    async fn handle(
        &self,
        market: &dyn MarketData,
        argument: &str,
    ) -> Result<String, CommandError> {
        debug!(command = self.view.command(), argument, "starting quote command");

        let result = market
            .search(argument, &SearchOptions::currency_symbols())
            .await
            .map_err(self.upstream(argument))?;
        debug!(
            command = self.view.command(),
            argument,
            results = result.currencies.len(),
            "search finished"
        );

        let best = result.best_match().ok_or_else(|| CommandError::NotFound {
            argument: argument.to_string(),
        })?;
        let ticker_id = best.id.as_deref().ok_or_else(|| CommandError::MissingData {
            argument: argument.to_string(),
            field: "id",
        })?;
        debug!(command = self.view.command(), argument, ticker_id, "best match");

        let ticker = market
            .ticker(ticker_id, &QUOTE_CURRENCIES)
            .await
            .map_err(self.upstream(argument))?;

        render(self.view, &ticker, argument)
    }
}

pub(crate) fn render(view: QuoteView, ticker: &Ticker, argument: &str) -> Result<String, CommandError> {
    let missing = |field: &'static str| CommandError::MissingData {
        argument: argument.to_string(),
        field,
    };

    let name = ticker.name.as_deref().ok_or_else(|| missing("name"))?;
    let id = ticker.id.as_deref().ok_or_else(|| missing("id"))?;

    let body = match view {
        QuoteView::Price => {
            let usd = ticker
                .quote("USD")
                .and_then(|quote| quote.price)
                .ok_or_else(|| missing("quotes.USD.price"))?;
            let btc = ticker
                .quote("BTC")
                .and_then(|quote| quote.price)
                .ok_or_else(|| missing("quotes.BTC.price"))?;
            format!("{name} price: {usd:.6} USD, {btc:.6} BTC")
        }
        QuoteView::Supply => {
            let supply = ticker
                .circulating_supply
                .ok_or_else(|| missing("circulating_supply"))?;
            format!("{name} circulating supply: {}", supply.trunc() as i64)
        }
        QuoteView::Volume => {
            let volume = ticker
                .quote("USD")
                .and_then(|quote| quote.volume_24h)
                .ok_or_else(|| missing("quotes.USD.volume_24h"))?;
            format!("{name} 24h volume: {volume:.2} USD")
        }
    };

    Ok(format!("{body}\n\n {COIN_PAGE_URL}/{id}"))
}

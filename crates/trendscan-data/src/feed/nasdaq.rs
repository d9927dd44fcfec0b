//! Ticker universe from the NASDAQ stock screener API.

use super::{TickerFeed, sanitize_universe};
use crate::error::{DataError, Result};
use crate::model::TickerIdentity;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// NASDAQ screener endpoint (covers NASDAQ, NYSE and AMEX listings)
const SCREENER_URL: &str = "https://api.nasdaq.com/api/screener/stocks";

/// The API rejects requests without a browser-like user agent
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

#[derive(Debug, Deserialize)]
struct ScreenerResponse {
    data: Option<ScreenerData>,
}

#[derive(Debug, Deserialize)]
struct ScreenerData {
    #[serde(default)]
    rows: Vec<ScreenerRow>,
}

#[derive(Debug, Deserialize)]
struct ScreenerRow {
    symbol: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry: Option<String>,
}

/// Pulls every listed common stock from the NASDAQ screener.
#[derive(Debug)]
pub struct NasdaqTickerFeed {
    client: reqwest::Client,
    exchange: Option<String>,
}

impl NasdaqTickerFeed {
    /// Create a feed covering all exchanges.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            exchange: None,
        })
    }

    /// Restrict the feed to one exchange (`nasdaq`, `nyse` or `amex`).
    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into().to_lowercase());
        self
    }

    /// Parse a screener response body.
    pub fn parse(body: &str) -> Result<Vec<TickerIdentity>> {
        let response: ScreenerResponse = serde_json::from_str(body)?;
        let rows = response
            .data
            .ok_or_else(|| DataError::Parse("screener response has no data".to_string()))?
            .rows;

        let identities = rows
            .into_iter()
            .map(|row| {
                TickerIdentity::new(
                    row.symbol,
                    row.name.unwrap_or_default(),
                    row.sector.unwrap_or_default(),
                    row.industry.unwrap_or_default(),
                )
            })
            .collect();

        Ok(sanitize_universe(identities))
    }
}

impl TickerFeed for NasdaqTickerFeed {
    async fn fetch_universe(&self) -> Result<Vec<TickerIdentity>> {
        let mut request = self
            .client
            .get(SCREENER_URL)
            .query(&[("tableonly", "true"), ("download", "true")]);
        if let Some(exchange) = &self.exchange {
            request = request.query(&[("exchange", exchange.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                url: SCREENER_URL.to_string(),
            });
        }

        let body = response.text().await?;
        let universe = Self::parse(&body)?;
        debug!(count = universe.len(), "fetched NASDAQ screener universe");
        Ok(universe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_screener_rows() {
        let body = r#"{
            "data": {
                "headers": {"symbol": "Symbol"},
                "rows": [
                    {"symbol": "AAPL", "name": "Apple Inc.", "lastsale": "$227.52",
                     "sector": "Technology", "industry": "Computer Manufacturing"},
                    {"symbol": "BAC^K", "name": "Bank of America Preferred",
                     "sector": "Finance", "industry": "Major Banks"},
                    {"symbol": "XYZ", "name": "No Labels Corp", "sector": null}
                ]
            },
            "message": null
        }"#;

        let universe = NasdaqTickerFeed::parse(body).unwrap();
        assert_eq!(universe.len(), 2);
        assert_eq!(universe[0].industry, "Computer Manufacturing");
        assert_eq!(universe[1].symbol, "XYZ");
        assert!(universe[1].sector.is_empty());
    }

    #[test]
    fn test_parse_without_data() {
        let result = NasdaqTickerFeed::parse(r#"{"data": null}"#);
        assert!(matches!(result, Err(DataError::Parse(_))));
    }
}

//! Ticker universe from the SEC company tickers file.
//!
//! `company_tickers.json` maps a row index to `{cik_str, ticker, title}`
//! and lists every company filing with the SEC. It carries no sector or
//! industry, so those seeds stay empty until the provider fills them.

use super::{TickerFeed, sanitize_universe};
use crate::error::{DataError, Result};
use crate::model::TickerIdentity;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Company tickers endpoint
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// SEC fair-access policy requires a contact in the user agent
const DEFAULT_USER_AGENT: &str = "trendscan admin@trendscan.invalid";

#[derive(Debug, Deserialize)]
struct CompanyTicker {
    cik_str: u64,
    ticker: String,
    #[serde(default)]
    title: String,
}

/// Pulls every SEC registrant with a ticker, in the file's row order.
#[derive(Debug)]
pub struct SecTickerFeed {
    client: reqwest::Client,
}

impl SecTickerFeed {
    /// Create a feed with the default contact user agent.
    pub fn new() -> Result<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a feed identifying itself as `user_agent`
    /// (`"Company Name contact@example.com"`).
    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self { client })
    }

    /// Parse a `company_tickers.json` body.
    pub fn parse(body: &str) -> Result<Vec<TickerIdentity>> {
        // Keys are row numbers; integer keys keep numeric order ("2" before "10").
        let rows: BTreeMap<u64, CompanyTicker> = serde_json::from_str(body)?;

        let identities = rows
            .into_values()
            .map(|row| TickerIdentity::new(row.ticker, row.title, "", "").with_cik(row.cik_str))
            .collect();

        Ok(sanitize_universe(identities))
    }
}

impl TickerFeed for SecTickerFeed {
    async fn fetch_universe(&self) -> Result<Vec<TickerIdentity>> {
        let response = self.client.get(COMPANY_TICKERS_URL).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                url: COMPANY_TICKERS_URL.to_string(),
            });
        }

        let body = response.text().await?;
        let universe = Self::parse(&body)?;
        debug!(count = universe.len(), "fetched SEC company tickers");
        Ok(universe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_company_tickers() {
        let body = r#"{
            "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
            "10": {"cik_str": 1045810, "ticker": "NVDA", "title": "NVIDIA CORP"},
            "2": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"},
            "3": {"cik_str": 1067983, "ticker": "BRK-B", "title": "BERKSHIRE HATHAWAY INC"},
            "4": {"cik_str": 320193, "ticker": "aapl", "title": "Apple duplicate"}
        }"#;

        let universe = SecTickerFeed::parse(body).unwrap();
        let symbols: Vec<&str> = universe.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "BRK-B", "NVDA"]);
        assert_eq!(universe[0].cik, Some(320_193));
        assert_eq!(universe[0].name, "Apple Inc.");
        assert!(universe[1].sector.is_empty());
        assert_eq!(universe[3].cik, Some(1_045_810));
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        let result = SecTickerFeed::parse(r#"{"fields": ["cik", "name"], "data": []}"#);
        assert!(matches!(result, Err(DataError::Serialization(_))));
    }
}

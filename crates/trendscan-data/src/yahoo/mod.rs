//! Yahoo Finance data providers.

pub mod fundamentals;
pub mod profile;
pub mod quotes;
pub mod rate_limit;

pub use fundamentals::YahooFundamentalsProvider;
pub use profile::YahooProfileProvider;
pub use quotes::YahooQuoteProvider;
pub use rate_limit::SharedRateLimiter;

use crate::error::{DataError, Result};
use crate::model::{CompanyProfile, PriceBar, QuarterlyFundamentals};
use crate::provider::MarketDataProvider;
use chrono::{Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Browser-like user agent; Yahoo rejects the reqwest default.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

/// Request budget and window settings for [`YahooProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    /// Minimum interval between any two Yahoo requests, in milliseconds
    pub min_request_interval_ms: u64,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
    /// Calendar days of daily price history to request
    pub history_days: i64,
    /// Newest quarters to keep from the statements
    pub max_quarters: usize,
    /// Whether to request the company profile at all
    pub fetch_profile: bool,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            min_request_interval_ms: 500,
            timeout_secs: 30,
            history_days: 365,
            max_quarters: 9,
            fetch_profile: true,
        }
    }
}

/// [`MarketDataProvider`] backed by Yahoo Finance.
///
/// All three endpoints draw from a single [`SharedRateLimiter`], so the
/// configured interval bounds total request throughput.
#[derive(Debug)]
pub struct YahooProvider {
    config: YahooConfig,
    quotes: YahooQuoteProvider,
    fundamentals: YahooFundamentalsProvider,
    profiles: YahooProfileProvider,
}

impl YahooProvider {
    /// Create a provider with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(YahooConfig::default())
    }

    /// Create a provider with custom settings.
    pub fn with_config(config: YahooConfig) -> Result<Self> {
        let limiter = SharedRateLimiter::new(Duration::from_millis(config.min_request_interval_ms));
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            quotes: YahooQuoteProvider::new(limiter.clone())?,
            fundamentals: YahooFundamentalsProvider::new(
                client.clone(),
                limiter.clone(),
                config.max_quarters,
            ),
            profiles: YahooProfileProvider::new(client, limiter),
            config,
        })
    }

    /// Active configuration.
    pub const fn config(&self) -> &YahooConfig {
        &self.config
    }
}

impl MarketDataProvider for YahooProvider {
    async fn quarterly_fundamentals(&self, symbol: &str) -> Result<QuarterlyFundamentals> {
        self.fundamentals.fetch_quarterly(symbol).await
    }

    async fn price_history(&self, symbol: &str) -> Result<Vec<PriceBar>> {
        let end = Utc::now();
        let start = end - ChronoDuration::days(self.config.history_days);
        self.quotes.fetch_bars(symbol, start, end).await
    }

    async fn company_profile(&self, symbol: &str) -> Result<Option<CompanyProfile>> {
        if !self.config.fetch_profile {
            return Ok(None);
        }
        self.profiles.fetch_profile(symbol).await
    }
}

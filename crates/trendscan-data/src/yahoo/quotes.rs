//! Daily price history from Yahoo Finance.

use super::rate_limit::SharedRateLimiter;
use crate::error::{DataError, Result};
use crate::model::PriceBar;
use chrono::{DateTime, Utc};
use yahoo_finance_api as yahoo;

/// Yahoo Finance quote provider.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    limiter: SharedRateLimiter,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a quote provider drawing on `limiter`'s request budget.
    pub fn new(limiter: SharedRateLimiter) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            limiter,
        })
    }

    /// Fetch daily bars for a single symbol, oldest first.
    ///
    /// Bars without a usable close are dropped.
    pub async fn fetch_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>> {
        // Validate date range
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }

        // Validate symbol
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let start_time = time::OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;
        let end_time = time::OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;

        self.limiter.acquire().await;
        let response = self
            .provider
            .get_quote_history(symbol, start_time, end_time)
            .await?;

        let quotes = response.quotes()?;

        let mut bars = Vec::with_capacity(quotes.len());
        for quote in &quotes {
            let seconds = i64::try_from(quote.timestamp)
                .map_err(|e| DataError::TimeConversion(e.to_string()))?;
            let date = DateTime::from_timestamp(seconds, 0)
                .ok_or_else(|| DataError::TimeConversion(format!("bad timestamp {seconds}")))?
                .date_naive();
            let bar = PriceBar {
                date,
                open: quote.open,
                high: quote.high,
                low: quote.low,
                close: quote.close,
                volume: quote.volume,
            };
            if bar.is_valid() {
                bars.push(bar);
            }
        }

        if bars.is_empty() {
            return Err(DataError::missing(
                symbol,
                "No data returned from Yahoo Finance",
            ));
        }

        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Ok(bars)
    }
}

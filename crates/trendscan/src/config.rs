//! Screener configuration.

use serde::{Deserialize, Serialize};
use trendscan_metrics::{MIN_PRICE_POINTS, MIN_QUARTERS, PriceHistoryConfig};

/// Settings for a screening run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    /// Minimum valid daily prices per ticker (default: 251)
    pub min_price_points: usize,
    /// Minimum quarters of fundamentals per ticker (default: 4)
    pub min_quarters: usize,
    /// Newest quarters kept for growth metrics (default: 9)
    pub max_quarters: usize,
    /// Clamp negative EPS to zero in the rolling average (default: true)
    pub floor_negative_eps: bool,
    /// Tickers processed at once; 1 is strictly sequential (default: 1)
    pub concurrency: usize,
    /// Consecutive upstream outages that abort the run (default: 10)
    pub max_consecutive_outages: usize,
    /// Quarters per series in the exported report (default: 4)
    pub report_quarters: usize,
    /// Process only the first N universe members
    pub limit: Option<usize>,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            min_price_points: MIN_PRICE_POINTS,
            min_quarters: MIN_QUARTERS,
            max_quarters: 9,
            floor_negative_eps: true,
            concurrency: 1,
            max_consecutive_outages: 10,
            report_quarters: 4,
            limit: None,
        }
    }
}

impl ScreenerConfig {
    /// Price analyzer settings derived from this configuration.
    pub fn price_history(&self) -> PriceHistoryConfig {
        PriceHistoryConfig {
            min_observations: self.min_price_points,
            ..PriceHistoryConfig::default()
        }
    }

    /// Concurrency, never below one.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

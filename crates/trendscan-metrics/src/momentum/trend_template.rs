//! Trend template screen.

use serde::{Deserialize, Serialize};

/// Thresholds relative to the 52-week range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendTemplateConfig {
    /// Last close must be at least this multiple of the 52-week low (default: 1.3)
    pub low_multiple: f64,
    /// Last close must be at least this fraction of the 52-week high (default: 0.75)
    pub high_fraction: f64,
}

impl Default for TrendTemplateConfig {
    fn default() -> Self {
        Self {
            low_multiple: 1.3,
            high_fraction: 0.75,
        }
    }
}

/// Outcome of each trend template condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendTemplate {
    /// `last_close > sma50`
    pub above_sma50: bool,
    /// `sma50 > sma150`
    pub sma50_above_sma150: bool,
    /// `sma150 > sma200`
    pub sma150_above_sma200: bool,
    /// `last_close >= low_multiple * low_52w`
    pub above_low: bool,
    /// `last_close >= high_fraction * high_52w`
    pub near_high: bool,
}

impl TrendTemplate {
    /// Evaluate every condition.
    pub fn evaluate(
        last_close: f64,
        sma50: f64,
        sma150: f64,
        sma200: f64,
        low_52w: f64,
        high_52w: f64,
        config: &TrendTemplateConfig,
    ) -> Self {
        Self {
            above_sma50: last_close > sma50,
            sma50_above_sma150: sma50 > sma150,
            sma150_above_sma200: sma150 > sma200,
            above_low: last_close >= config.low_multiple * low_52w,
            near_high: last_close >= config.high_fraction * high_52w,
        }
    }

    /// Whether all five conditions hold.
    pub const fn passes(&self) -> bool {
        self.above_sma50
            && self.sma50_above_sma150
            && self.sma150_above_sma200
            && self.above_low
            && self.near_high
    }
}

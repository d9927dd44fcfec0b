//! Price history analysis
//!
//! Turns a trailing year of daily bars into the price-derived fields of a
//! screen row: 52-week range, simple moving averages, the composite
//! [`relative_strength`] score and the [`TrendTemplate`] rule.

pub mod relative_strength;
pub mod trend_template;

pub use relative_strength::relative_strength;
pub use trend_template::{TrendTemplate, TrendTemplateConfig};

use crate::error::MetricsError;
use serde::{Deserialize, Serialize};
use trendscan_data::PriceBar;

/// Minimum daily observations for a full trailing year.
pub const MIN_PRICE_POINTS: usize = 251;

/// Configuration for [`analyze_price_history`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryConfig {
    /// Minimum valid bars (default: 251)
    pub min_observations: usize,
    /// Short moving average window (default: 50)
    pub sma_short: usize,
    /// Medium moving average window (default: 150)
    pub sma_medium: usize,
    /// Long moving average window (default: 200)
    pub sma_long: usize,
    /// Trend template thresholds
    pub trend_template: TrendTemplateConfig,
}

impl Default for PriceHistoryConfig {
    fn default() -> Self {
        Self {
            min_observations: MIN_PRICE_POINTS,
            sma_short: 50,
            sma_medium: 150,
            sma_long: 200,
            trend_template: TrendTemplateConfig::default(),
        }
    }
}

impl PriceHistoryConfig {
    /// Bars actually required: the configured minimum, raised if needed so
    /// every moving average and relative-strength checkpoint is covered.
    pub fn required_observations(&self) -> usize {
        let checkpoints = relative_strength::CHECKPOINTS[2] + 2;
        self.min_observations
            .max(self.sma_short)
            .max(self.sma_medium)
            .max(self.sma_long)
            .max(checkpoints)
    }
}

/// Price-derived metrics for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMetrics {
    /// Newest close
    pub last_close: f64,
    /// Highest high over the window
    pub high_52w: f64,
    /// Lowest low over the window
    pub low_52w: f64,
    /// Mean of the newest 50 closes
    pub sma50: f64,
    /// Mean of the newest 150 closes
    pub sma150: f64,
    /// Mean of the newest 200 closes
    pub sma200: f64,
    /// Composite relative-strength score
    pub relative_strength: f64,
    /// Individual trend template conditions
    pub trend_template: TrendTemplate,
    /// Valid bars used
    pub observations: usize,
}

impl PriceMetrics {
    /// Whether the trend template passes.
    pub const fn trend_template_pass(&self) -> bool {
        self.trend_template.passes()
    }
}

/// Analyze a daily price series delivered oldest first.
///
/// Bars without a positive finite close or with non-finite high/low are
/// dropped before counting. Fails with [`MetricsError::InsufficientHistory`]
/// when fewer than [`PriceHistoryConfig::required_observations`] remain.
pub fn analyze_price_history(
    bars: &[PriceBar],
    config: &PriceHistoryConfig,
) -> Result<PriceMetrics, MetricsError> {
    // newest first from here on
    let window: Vec<&PriceBar> = bars.iter().rev().filter(|bar| bar.is_valid()).collect();

    let required = config.required_observations();
    if window.len() < required {
        return Err(MetricsError::InsufficientHistory {
            found: window.len(),
            required,
        });
    }

    let closes: Vec<f64> = window.iter().map(|bar| bar.close).collect();
    let last_close = closes[0];
    let high_52w = window.iter().map(|bar| bar.high).fold(f64::MIN, f64::max);
    let low_52w = window.iter().map(|bar| bar.low).fold(f64::MAX, f64::min);

    let sma50 = simple_moving_average(&closes, config.sma_short);
    let sma150 = simple_moving_average(&closes, config.sma_medium);
    let sma200 = simple_moving_average(&closes, config.sma_long);

    let relative_strength =
        relative_strength(&closes).ok_or(MetricsError::InsufficientHistory {
            found: closes.len(),
            required,
        })?;

    let trend_template = TrendTemplate::evaluate(
        last_close,
        sma50,
        sma150,
        sma200,
        low_52w,
        high_52w,
        &config.trend_template,
    );

    Ok(PriceMetrics {
        last_close,
        high_52w,
        low_52w,
        sma50,
        sma150,
        sma200,
        relative_strength,
        trend_template,
        observations: closes.len(),
    })
}

/// Mean of the first `window` values of a newest-first series.
fn simple_moving_average(closes: &[f64], window: usize) -> f64 {
    let n = window.min(closes.len()).max(1);
    closes.iter().take(n).sum::<f64>() / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    /// Oldest-first bars whose newest-first closes are `closes`.
    fn bars_from_newest_first(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .rev()
            .enumerate()
            .map(|(i, close)| PriceBar::flat(start + Duration::days(i as i64), *close))
            .collect()
    }

    #[test]
    fn test_relative_strength_example() {
        let mut closes = vec![75.0; 251];
        closes[0] = 100.0;
        for k in [62, 125, 188, 250] {
            closes[k] = 50.0;
        }

        let metrics =
            analyze_price_history(&bars_from_newest_first(&closes), &Default::default()).unwrap();
        assert_relative_eq!(metrics.last_close, 100.0);
        assert_relative_eq!(metrics.relative_strength, 10.0);
        assert_relative_eq!(metrics.high_52w, 100.0);
        assert_relative_eq!(metrics.low_52w, 50.0);
        assert_eq!(metrics.observations, 251);
    }

    #[test]
    fn test_rising_series_passes_trend_template() {
        // Newest first: 300, 299, ... so every average sits below the last close.
        let closes: Vec<f64> = (0..260).map(|i| 300.0 - f64::from(i)).collect();

        let metrics =
            analyze_price_history(&bars_from_newest_first(&closes), &Default::default()).unwrap();
        assert_relative_eq!(metrics.sma50, 275.5);
        assert_relative_eq!(metrics.sma150, 225.5);
        assert_relative_eq!(metrics.sma200, 200.5);
        assert!(metrics.trend_template_pass());
    }

    #[test]
    fn test_falling_series_fails_trend_template() {
        let closes: Vec<f64> = (0..260).map(|i| 41.0 + f64::from(i)).collect();

        let metrics =
            analyze_price_history(&bars_from_newest_first(&closes), &Default::default()).unwrap();
        assert!(!metrics.trend_template.above_sma50);
        assert!(!metrics.trend_template_pass());
    }

    #[test]
    fn test_insufficient_history() {
        let bars = bars_from_newest_first(&vec![10.0; 250]);
        let err = analyze_price_history(&bars, &Default::default()).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::InsufficientHistory {
                found: 250,
                required: 251
            }
        ));
    }

    #[test]
    fn test_invalid_bars_do_not_count() {
        let mut bars = bars_from_newest_first(&vec![10.0; 252]);
        bars[5].close = 0.0;
        bars[9].close = f64::NAN;

        let err = analyze_price_history(&bars, &Default::default()).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::InsufficientHistory { found: 250, .. }
        ));
    }

    #[test]
    fn test_input_is_reversed() {
        let mut closes = vec![10.0; 251];
        closes[0] = 12.0;
        let bars = bars_from_newest_first(&closes);
        assert_relative_eq!(bars.last().unwrap().close, 12.0);

        let metrics = analyze_price_history(&bars, &Default::default()).unwrap();
        assert_relative_eq!(metrics.last_close, 12.0);
    }

    #[test]
    fn test_required_observations_covers_windows() {
        let config = PriceHistoryConfig {
            min_observations: 100,
            ..Default::default()
        };
        assert_eq!(config.required_observations(), 200);
        assert_eq!(PriceHistoryConfig::default().required_observations(), 251);
    }
}

//! Fundamentals growth metrics
//!
//! Quarterly series flow through three stages:
//!
//! - [`reconcile`]: fills missing EPS and derives net margin
//! - [`smoothing`]: two-quarter rolling average of EPS
//! - [`streak`]: counts consecutive quarters of strict improvement
//!
//! All series are ordered newest quarter first.

pub mod reconcile;
pub mod smoothing;
pub mod streak;

pub use reconcile::{MIN_QUARTERS, ReconciledSeries, reconcile, reconcile_series};
pub use smoothing::rolling_average;
pub use streak::growth_streak;

use serde::{Deserialize, Serialize};

/// Streak counters for the four tracked series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthStreaks {
    /// Raw EPS
    pub eps: usize,
    /// Two-quarter average EPS
    pub eps_smoothed: usize,
    /// Total revenue
    pub revenue: usize,
    /// Net margin
    pub net_margin: usize,
}

/// Growth metrics for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetrics {
    /// Reconciled EPS
    pub eps: Vec<Option<f64>>,
    /// Rolling-average EPS, defined exactly where `eps` is
    pub eps_smoothed: Vec<Option<f64>>,
    /// Total revenue
    pub revenue: Vec<Option<f64>>,
    /// Net margin
    pub net_margin: Vec<Option<f64>>,
    /// Growth streaks
    pub streaks: GrowthStreaks,
}

/// Smooth EPS and count growth streaks on a reconciled series.
///
/// `floor` clamps negative EPS to zero inside the rolling average.
pub fn compute_growth_metrics(series: &ReconciledSeries, floor: bool) -> GrowthMetrics {
    let eps_smoothed = rolling_average(&series.eps, floor);

    let streaks = GrowthStreaks {
        eps: growth_streak(&series.eps),
        eps_smoothed: growth_streak(&eps_smoothed),
        revenue: growth_streak(&series.revenue),
        net_margin: growth_streak(&series.net_margin),
    };

    GrowthMetrics {
        eps: series.eps.clone(),
        eps_smoothed,
        revenue: series.revenue.clone(),
        net_margin: series.net_margin.clone(),
        streaks,
    }
}

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/trendscan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod growth;
pub mod momentum;
pub mod ranking;

pub use error::MetricsError;
pub use growth::{
    GrowthMetrics, GrowthStreaks, MIN_QUARTERS, ReconciledSeries, compute_growth_metrics,
    growth_streak, reconcile, reconcile_series, rolling_average,
};
pub use momentum::{
    MIN_PRICE_POINTS, PriceHistoryConfig, PriceMetrics, TrendTemplate, TrendTemplateConfig,
    analyze_price_history, relative_strength,
};
pub use ranking::{Percentiles, RankEntry, rank_percentiles};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

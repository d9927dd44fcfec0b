//! Error types for metric computations.

use thiserror::Error;
use trendscan_data::LineItem;

/// Errors raised when input data cannot support a metric.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// A required fundamentals line item is absent.
    #[error("missing {line_item} series")]
    MissingSeries {
        /// The absent line item
        line_item: LineItem,
    },

    /// Too few quarters of fundamentals.
    #[error("only {found} quarters of fundamentals, need {required}")]
    ShortQuarterHistory {
        /// Quarters available
        found: usize,
        /// Quarters required
        required: usize,
    },

    /// Too few daily price observations.
    #[error("only {found} daily prices, need {required}")]
    InsufficientHistory {
        /// Observations available
        found: usize,
        /// Observations required
        required: usize,
    },

    /// Cross-sectional ranking failed.
    #[error("ranking failed: {0}")]
    Ranking(#[from] polars::prelude::PolarsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = MetricsError::MissingSeries {
            line_item: LineItem::TotalRevenue,
        };
        assert_eq!(err.to_string(), "missing Total Revenue series");

        let err = MetricsError::InsufficientHistory {
            found: 120,
            required: 251,
        };
        assert_eq!(err.to_string(), "only 120 daily prices, need 251");
    }
}

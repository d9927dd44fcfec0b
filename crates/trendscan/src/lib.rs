#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/trendscan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod state;

// Re-export main types from sub-crates
pub use trendscan_data as data;
pub use trendscan_metrics as metrics;
pub use trendscan_output as output;

pub use config::ScreenerConfig;
pub use error::{Result, ScreenerError};
pub use pipeline::{Progress, ScreenOutcome, Screener};
pub use record::TickerRecord;
pub use state::{Rejection, RejectionReason, TickerState};

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

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/trendscan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod column;
pub mod error;
pub mod export;
pub mod summary;
pub mod table;

pub use column::{Column, ColumnFormat, ColumnId, EARNINGS_DATE_COLUMNS, report_columns};
pub use error::ExportError;
pub use export::{CsvReportWriter, ExportFormat, Exporter, JsonReportWriter, ReportWriter};
pub use summary::{RejectionEntry, RunSummary};
pub use table::{Cell, ReportRow, ReportTable};

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

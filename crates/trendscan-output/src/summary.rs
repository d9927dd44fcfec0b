//! Run summary report.

use crate::error::ExportError;
use crate::export::{ExportFormat, Exporter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One rejected ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionEntry {
    /// Ticker symbol
    pub symbol: String,
    /// Error kind, e.g. `InsufficientHistoryError`
    pub kind: String,
    /// Pipeline state reached before rejection
    pub state: String,
    /// Human-readable detail
    pub detail: String,
}

impl RejectionEntry {
    /// Create a new entry.
    pub fn new(
        symbol: impl Into<String>,
        kind: impl Into<String>,
        state: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            kind: kind.into(),
            state: state.into(),
            detail: detail.into(),
        }
    }
}

/// Totals and rejections for one screening run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run finished
    pub generated_at: DateTime<Utc>,
    /// Symbols delivered by the ticker feed
    pub universe: usize,
    /// Symbols processed
    pub processed: usize,
    /// Symbols in the ranked output
    pub valid: usize,
    /// Valid symbols passing the trend template
    pub trend_template_passes: usize,
    /// Rejected symbols, in universe order
    pub rejections: Vec<RejectionEntry>,
}

impl RunSummary {
    /// Create a summary stamped with the current time.
    pub fn new(
        universe: usize,
        processed: usize,
        valid: usize,
        trend_template_passes: usize,
        rejections: Vec<RejectionEntry>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            universe,
            processed,
            valid,
            trend_template_passes,
            rejections,
        }
    }

    /// Number of rejected symbols.
    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }

    /// Rejection counts per error kind, sorted by kind.
    pub fn rejections_by_kind(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for rejection in &self.rejections {
            match counts.iter_mut().find(|(kind, _)| *kind == rejection.kind) {
                Some((_, count)) => *count += 1,
                None => counts.push((rejection.kind.clone(), 1)),
            }
        }
        counts.sort();
        counts
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nScreen Summary ({})\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("  Universe:                 {}\n", self.universe));
        output.push_str(&format!("  Processed:                {}\n", self.processed));
        output.push_str(&format!("  Valid:                    {}\n", self.valid));
        output.push_str(&format!("  Rejected:                 {}\n", self.rejected()));
        output.push_str(&format!(
            "  Trend template passes:    {}\n",
            self.trend_template_passes
        ));

        if !self.rejections.is_empty() {
            output.push_str("\nRejections by kind:\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for (kind, count) in self.rejections_by_kind() {
                output.push_str(&format!("  {kind:<34} {count:>6}\n"));
            }

            output.push_str("\nRejected symbols:\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            output.push_str(&format!("{:<10} {:<28} {}\n", "Symbol", "Kind", "Detail"));
            for rejection in &self.rejections {
                output.push_str(&format!(
                    "{:<10} {:<28} {}\n",
                    rejection.symbol, rejection.kind, rejection.detail
                ));
            }
        }

        output.push_str(&"=".repeat(60));
        output.push('\n');

        output
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} valid, {} rejected, {} pass the trend template",
            self.processed,
            self.valid,
            self.rejected(),
            self.trend_template_passes
        )
    }
}

impl Exporter for RunSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for rejection in &self.rejections {
                    wtr.serialize(rejection)?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> RunSummary {
        RunSummary::new(
            5,
            5,
            2,
            1,
            vec![
                RejectionEntry::new(
                    "ZZZ",
                    "InsufficientHistoryError",
                    "PriceFetched",
                    "only 120 daily prices, need 251",
                ),
                RejectionEntry::new(
                    "AAA",
                    "MissingSeriesError",
                    "FundamentalsFetched",
                    "missing Basic EPS series",
                ),
                RejectionEntry::new(
                    "BBB",
                    "InsufficientHistoryError",
                    "PriceFetched",
                    "only 30 daily prices, need 251",
                ),
            ],
        )
    }

    #[test]
    fn test_counts() {
        let summary = summary();
        assert_eq!(summary.rejected(), 3);
        assert_eq!(
            summary.rejections_by_kind(),
            vec![
                ("InsufficientHistoryError".to_string(), 2),
                ("MissingSeriesError".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_ascii_table_lists_rejections() {
        let table = summary().to_ascii_table();
        assert!(table.contains("Rejected:                 3"));
        assert!(table.contains("ZZZ"));
        assert!(table.contains("missing Basic EPS series"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            summary().to_string(),
            "5 processed, 2 valid, 3 rejected, 1 pass the trend template"
        );
    }

    #[test]
    fn test_csv_export_keeps_order() {
        let csv = summary().export_to_string(ExportFormat::Csv).unwrap();
        let symbols: Vec<&str> = csv
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(symbols, vec!["ZZZ", "AAA", "BBB"]);
    }

    #[test]
    fn test_json_round_trip() {
        let summary = summary();
        let json = summary.export_to_string(ExportFormat::Json).unwrap();
        let parsed: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
    }
}

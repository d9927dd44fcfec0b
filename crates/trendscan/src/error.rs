//! Fatal pipeline errors.

use thiserror::Error;
use trendscan_data::DataError;
use trendscan_metrics::MetricsError;
use trendscan_output::ExportError;

/// Errors that abort a screening run.
///
/// Problems with a single ticker never surface here; they become a
/// [`Rejection`](crate::Rejection) instead.
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// The ticker feed or the market data provider is unreachable.
    #[error("upstream unavailable ({context}): {source}")]
    UpstreamUnavailable {
        /// What was being fetched
        context: String,
        /// Last upstream error
        #[source]
        source: DataError,
    },

    /// Cross-sectional ranking failed.
    #[error("ranking failed: {0}")]
    Ranking(#[from] MetricsError),

    /// Writing the report failed.
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

impl ScreenerError {
    /// Wrap an upstream error.
    pub fn upstream(context: impl Into<String>, source: DataError) -> Self {
        Self::UpstreamUnavailable {
            context: context.into(),
            source,
        }
    }

    /// Error kind name as reported in summaries.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable { .. } => "UpstreamUnavailableError",
            Self::Ranking(_) => "RankingError",
            Self::Export(_) => "ExportError",
        }
    }
}

/// Result type for screening runs.
pub type Result<T> = std::result::Result<T, ScreenerError>;

//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance API error: {0}")]
    YahooApi(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream host could not be reached or timed out
    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    /// Non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Http {
        /// Status code returned by the server
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Invalid date range
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: String,
        /// End date of the range
        end: String,
    },

    /// Missing data
    #[error("Missing data for {symbol}: {reason}")]
    MissingData {
        /// Symbol that was queried
        symbol: String,
        /// Reason for missing data
        reason: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Time conversion error
    #[error("Time conversion error: {0}")]
    TimeConversion(String),

    /// Rate limit error
    #[error("Rate limit exceeded, please retry after {retry_after_ms}ms")]
    RateLimit {
        /// Milliseconds to wait before retrying
        retry_after_ms: u64,
    },

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Creates a [`DataError::MissingData`] for `symbol`.
    pub fn missing(symbol: &str, reason: impl Into<String>) -> Self {
        Self::MissingData {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the upstream service itself is unreachable,
    /// as opposed to one symbol lacking data.
    pub fn is_upstream_outage(&self) -> bool {
        match self {
            Self::Network(e) => e.is_connect() || e.is_timeout(),
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            Self::RateLimit { .. } | Self::Unreachable(_) => true,
            _ => false,
        }
    }
}

/// Chart endpoint label used when the quote client reports a bare status.
const YAHOO_CHART: &str = "Yahoo Finance chart endpoint";

impl From<yahoo_finance_api::YahooError> for DataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        use yahoo_finance_api::YahooError;

        match err {
            YahooError::ConnectionFailed(e) if e.is_connect() || e.is_timeout() => {
                Self::Unreachable(e.to_string())
            }
            YahooError::TooManyRequests(_) => Self::RateLimit { retry_after_ms: 0 },
            YahooError::FetchFailed(message) => match http_status(&message) {
                Some(status) => Self::Http {
                    status,
                    url: YAHOO_CHART.to_string(),
                },
                None => Self::YahooApi(message),
            },
            other => Self::YahooApi(other.to_string()),
        }
    }
}

/// Status code from the quote client's `HTTP error: <status>` messages.
fn http_status(message: &str) -> Option<u16> {
    message
        .strip_prefix("HTTP error: ")?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

//! Per-ticker lifecycle and rejections.

use serde::{Deserialize, Serialize};
use std::fmt;
use trendscan_data::{DataError, LineItem};
use trendscan_metrics::MetricsError;
use trendscan_output::RejectionEntry;

/// Lifecycle of one ticker through the pipeline.
///
/// `Pending → FundamentalsFetched → Reconciled → PriceFetched → Scored`,
/// ending in `Valid` once ranked or `Rejected` at the first missing or
/// insufficient input. Both end states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickerState {
    /// Accepted from the feed, nothing fetched yet
    Pending,
    /// Quarterly fundamentals retrieved
    FundamentalsFetched,
    /// Quarterly series reconciled
    Reconciled,
    /// Daily prices retrieved
    PriceFetched,
    /// Growth and price metrics computed
    Scored,
    /// Ranked and part of the output
    Valid,
    /// Dropped from the run
    Rejected,
}

impl TickerState {
    /// Whether no further transition is possible.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Valid | Self::Rejected)
    }

    /// The state that follows a successful stage, if any.
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::FundamentalsFetched),
            Self::FundamentalsFetched => Some(Self::Reconciled),
            Self::Reconciled => Some(Self::PriceFetched),
            Self::PriceFetched => Some(Self::Scored),
            Self::Scored => Some(Self::Valid),
            Self::Valid | Self::Rejected => None,
        }
    }

    /// State name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::FundamentalsFetched => "FundamentalsFetched",
            Self::Reconciled => "Reconciled",
            Self::PriceFetched => "PriceFetched",
            Self::Scored => "Scored",
            Self::Valid => "Valid",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for TickerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a ticker was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Fundamentals could not be retrieved or came back empty.
    FundamentalsUnavailable {
        /// Provider message
        detail: String,
    },
    /// A required line item is absent.
    MissingSeries {
        /// The absent line item
        line_item: LineItem,
    },
    /// Too few quarters of fundamentals.
    ShortQuarterHistory {
        /// Quarters available
        found: usize,
        /// Quarters required
        required: usize,
    },
    /// Daily prices could not be retrieved.
    PriceUnavailable {
        /// Provider message
        detail: String,
    },
    /// Too few daily price points.
    InsufficientHistory {
        /// Valid points available
        found: usize,
        /// Points required
        required: usize,
    },
}

impl RejectionReason {
    /// Error kind name.
    ///
    /// Missing or unobtainable series report as `MissingSeriesError`.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FundamentalsUnavailable { .. } | Self::MissingSeries { .. } => {
                "MissingSeriesError"
            }
            Self::ShortQuarterHistory { .. } => "ShortQuarterHistoryError",
            Self::PriceUnavailable { .. } | Self::InsufficientHistory { .. } => {
                "InsufficientHistoryError"
            }
        }
    }

    /// Rejection for a failed fundamentals request.
    pub fn fundamentals_unavailable(err: &DataError) -> Self {
        Self::FundamentalsUnavailable {
            detail: err.to_string(),
        }
    }

    /// Rejection for a failed price request.
    pub fn price_unavailable(err: &DataError) -> Self {
        Self::PriceUnavailable {
            detail: err.to_string(),
        }
    }
}

impl From<MetricsError> for RejectionReason {
    fn from(err: MetricsError) -> Self {
        match err {
            MetricsError::MissingSeries { line_item } => Self::MissingSeries { line_item },
            MetricsError::ShortQuarterHistory { found, required } => {
                Self::ShortQuarterHistory { found, required }
            }
            MetricsError::InsufficientHistory { found, required } => {
                Self::InsufficientHistory { found, required }
            }
            MetricsError::Ranking(e) => Self::FundamentalsUnavailable {
                detail: e.to_string(),
            },
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FundamentalsUnavailable { detail } => {
                write!(f, "fundamentals unavailable: {detail}")
            }
            Self::MissingSeries { line_item } => write!(f, "missing {line_item} series"),
            Self::ShortQuarterHistory { found, required } => {
                write!(f, "only {found} quarters of fundamentals, need {required}")
            }
            Self::PriceUnavailable { detail } => write!(f, "price history unavailable: {detail}"),
            Self::InsufficientHistory { found, required } => {
                write!(f, "only {found} daily prices, need {required}")
            }
        }
    }
}

/// A rejected ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Ticker symbol
    pub symbol: String,
    /// Last state reached before rejection
    pub state: TickerState,
    /// Why the ticker was dropped
    pub reason: RejectionReason,
}

impl Rejection {
    /// Create a new rejection.
    pub fn new(symbol: impl Into<String>, state: TickerState, reason: RejectionReason) -> Self {
        Self {
            symbol: symbol.into(),
            state,
            reason,
        }
    }

    /// Error kind name of the reason.
    pub const fn kind(&self) -> &'static str {
        self.reason.kind()
    }
}

impl From<&Rejection> for RejectionEntry {
    fn from(rejection: &Rejection) -> Self {
        Self::new(
            rejection.symbol.clone(),
            rejection.kind(),
            rejection.state.as_str(),
            rejection.reason.to_string(),
        )
    }
}

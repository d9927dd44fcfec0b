//! Data records exchanged between the providers and the screener.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static FOUNDED_IN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"founded in ([0-9]{4})"));
static INCORPORATED_IN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"incorporated in ([0-9]{4})"));

/// Identity of one candidate instrument as delivered by a ticker feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerIdentity {
    /// Ticker symbol, unique within a run.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub name: String,
    /// Sector seed from the feed (may be empty).
    #[serde(default)]
    pub sector: String,
    /// Industry seed from the feed (may be empty).
    #[serde(default)]
    pub industry: String,
    /// SEC central index key, when the feed knows it.
    #[serde(default)]
    pub cik: Option<u64>,
}

impl TickerIdentity {
    /// Create a new identity record.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        sector: impl Into<String>,
        industry: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            sector: sector.into(),
            industry: industry.into(),
            cik: None,
        }
    }

    /// Attach an SEC central index key.
    #[must_use]
    pub const fn with_cik(mut self, cik: u64) -> Self {
        self.cik = Some(cik);
        self
    }
}

/// Quarterly income statement line items used by the screener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineItem {
    /// Basic earnings per share
    BasicEps,
    /// Total revenue
    TotalRevenue,
    /// Net income
    NetIncome,
    /// Basic weighted average share count
    BasicAverageShares,
}

impl LineItem {
    /// Returns all line items.
    pub const fn all() -> [Self; 4] {
        [
            Self::BasicEps,
            Self::TotalRevenue,
            Self::NetIncome,
            Self::BasicAverageShares,
        ]
    }

    /// Label used in financial statements.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::BasicEps => "Basic EPS",
            Self::TotalRevenue => "Total Revenue",
            Self::NetIncome => "Net Income",
            Self::BasicAverageShares => "Basic Average Shares",
        }
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Quarterly fundamentals table for one symbol, newest quarter first.
///
/// Each line item is `None` when the provider does not report it at all;
/// individual quarters inside a present line item may still be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyFundamentals {
    /// Stock symbol
    pub symbol: String,
    /// Fiscal quarter end dates, newest first
    pub quarter_ends: Vec<NaiveDate>,
    /// Basic EPS per quarter
    pub basic_eps: Option<Vec<Option<f64>>>,
    /// Total revenue per quarter
    pub total_revenue: Option<Vec<Option<f64>>>,
    /// Net income per quarter
    pub net_income: Option<Vec<Option<f64>>>,
    /// Basic average shares per quarter
    pub basic_average_shares: Option<Vec<Option<f64>>>,
}

impl QuarterlyFundamentals {
    /// Create an empty table for `symbol`.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Number of quarters in the table.
    pub fn len(&self) -> usize {
        self.quarter_ends.len()
    }

    /// Whether the table holds no quarters.
    pub fn is_empty(&self) -> bool {
        self.quarter_ends.is_empty()
    }

    /// Values of one line item, if reported.
    pub fn line_item(&self, item: LineItem) -> Option<&[Option<f64>]> {
        match item {
            LineItem::BasicEps => self.basic_eps.as_deref(),
            LineItem::TotalRevenue => self.total_revenue.as_deref(),
            LineItem::NetIncome => self.net_income.as_deref(),
            LineItem::BasicAverageShares => self.basic_average_shares.as_deref(),
        }
    }

    /// Replace the values of one line item.
    pub fn set_line_item(&mut self, item: LineItem, values: Vec<Option<f64>>) {
        let slot = match item {
            LineItem::BasicEps => &mut self.basic_eps,
            LineItem::TotalRevenue => &mut self.total_revenue,
            LineItem::NetIncome => &mut self.net_income,
            LineItem::BasicAverageShares => &mut self.basic_average_shares,
        };
        *slot = Some(values);
    }
}

/// One daily OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// Intraday high
    pub high: f64,
    /// Intraday low
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Shares traded
    pub volume: u64,
}

impl PriceBar {
    /// Create a bar where open, high and low all equal `close`.
    pub const fn flat(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }

    /// Whether the bar carries usable prices.
    pub fn is_valid(&self) -> bool {
        self.close.is_finite()
            && self.close > 0.0
            && self.high.is_finite()
            && self.low.is_finite()
    }
}

/// Descriptive company data; every field is optional upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Market capitalization
    pub market_cap: Option<f64>,
    /// Float shares
    pub float_shares: Option<f64>,
    /// Fraction held by insiders
    pub held_percent_insiders: Option<f64>,
    /// Fraction held by institutions
    pub held_percent_institutions: Option<f64>,
    /// Sector reported by the provider
    pub sector: Option<String>,
    /// Industry reported by the provider
    pub industry: Option<String>,
    /// Company website
    pub website: Option<String>,
    /// Long business summary
    pub long_business_summary: Option<String>,
    /// Scheduled or past earnings dates
    pub earnings_dates: Vec<NaiveDate>,
}

impl CompanyProfile {
    /// The earliest earnings date on or after `today`, falling back to the
    /// latest past date when nothing is scheduled.
    pub fn next_earnings_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.earnings_dates
            .iter()
            .copied()
            .filter(|d| *d >= today)
            .min()
            .or_else(|| self.earnings_dates.iter().copied().max())
    }

    /// Calendar earnings dates in ascending order, without repeats.
    pub fn sorted_earnings_dates(&self) -> Vec<NaiveDate> {
        let mut dates = self.earnings_dates.clone();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// Year the company was founded, else incorporated, as stated in the
    /// business summary.
    pub fn incorporation_year(&self) -> Option<u16> {
        let summary = self.long_business_summary.as_deref()?;
        [&FOUNDED_IN, &INCORPORATED_IN]
            .into_iter()
            .filter_map(|pattern| LazyLock::force(pattern).as_ref().ok())
            .find_map(|pattern| pattern.captures(summary))
            .and_then(|captures| captures.get(1))
            .and_then(|year| year.as_str().parse().ok())
    }
}

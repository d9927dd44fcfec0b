//! Report column registry
//!
//! Every exported column, in report order, with the format hint the writer
//! uses to render it. Quarterly series are flattened to one column per
//! quarter, `Q0` being the newest.

use crate::table::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display rule for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnFormat {
    /// Whole number
    Int,
    /// Two decimals
    Float,
    /// A `[0, 1]` fraction shown as `0-100%`
    Percent,
    /// Unstyled string
    Text,
    /// ISO `yyyy-mm-dd`
    Date,
}

impl ColumnFormat {
    /// Hint name as exported.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Percent => "percent",
            Self::Text => "text",
            Self::Date => "date",
        }
    }

    /// Render a cell for display. Missing and non-finite values render empty.
    pub fn render(&self, cell: &Cell) -> String {
        match cell {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.clone(),
            Cell::Bool(flag) => (if *flag { "TRUE" } else { "FALSE" }).to_string(),
            Cell::Date(date) => date.format("%Y-%m-%d").to_string(),
            Cell::Int(value) => match self {
                Self::Float => format!("{value}.00"),
                Self::Percent => format!("{:.1}%", *value as f64 * 100.0),
                _ => value.to_string(),
            },
            Cell::Float(value) if !value.is_finite() => String::new(),
            Cell::Float(value) => match self {
                Self::Int => format!("{value:.0}"),
                Self::Percent => format!("{:.1}%", value * 100.0),
                Self::Float | Self::Text | Self::Date => format!("{value:.2}"),
            },
        }
    }
}

impl fmt::Display for ColumnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "percent" => Ok(Self::Percent),
            "text" => Ok(Self::Text),
            "date" => Ok(Self::Date),
            other => Err(format!("unknown column format: {other}")),
        }
    }
}

/// What a column holds. Quarterly variants carry the quarter index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnId {
    /// Ticker symbol
    Symbol,
    /// Company name
    Name,
    /// Sector label
    Sector,
    /// Industry label
    Industry,
    /// Newest close
    LastClose,
    /// 52-week high
    High52w,
    /// 52-week low
    Low52w,
    /// 50-day simple moving average
    Sma50,
    /// 150-day simple moving average
    Sma150,
    /// 200-day simple moving average
    Sma200,
    /// Composite relative-strength score
    RelativeStrength,
    /// Trend template verdict
    TrendTemplatePass,
    /// Relative-strength percentile across the run
    PercentileMarket,
    /// Relative-strength percentile within the sector
    PercentileSector,
    /// Relative-strength percentile within the industry
    PercentileIndustry,
    /// EPS growth streak
    EpsGrowthQuarters,
    /// Smoothed EPS growth streak
    EpsSmoothedGrowthQuarters,
    /// Revenue growth streak
    RevenueGrowthQuarters,
    /// Net margin growth streak
    MarginGrowthQuarters,
    /// EPS for a quarter
    Eps(usize),
    /// Two-quarter average EPS for a quarter
    EpsSmoothed(usize),
    /// Revenue for a quarter
    Revenue(usize),
    /// Net margin for a quarter
    NetMargin(usize),
    /// Market capitalisation
    MarketCap,
    /// Float shares
    FloatShares,
    /// Fraction held by insiders
    HeldPercentInsiders,
    /// Fraction held by institutions
    HeldPercentInstitutions,
    /// Next (or latest) earnings date
    NextEarningsDate,
    /// One calendar earnings date, oldest first
    EarningsDate(usize),
    /// Year founded or incorporated
    IncorporationYear,
    /// SEC central index key
    Cik,
    /// Company website
    Website,
    /// Business summary
    BusinessSummary,
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// What the column holds
    pub id: ColumnId,
    /// Machine-readable key, used by the JSON writer
    pub key: String,
    /// Header shown in tabular output
    pub header: String,
    /// Display rule
    pub format: ColumnFormat,
    /// Brief description
    pub description: String,
}

impl Column {
    fn new(
        id: ColumnId,
        key: impl Into<String>,
        header: impl Into<String>,
        format: ColumnFormat,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            key: key.into(),
            header: header.into(),
            format,
            description: description.into(),
        }
    }
}

/// Calendar earnings dates exported per ticker.
pub const EARNINGS_DATE_COLUMNS: usize = 2;

/// All report columns, flattening quarterly series to `quarters` columns each.
pub fn report_columns(quarters: usize) -> Vec<Column> {
    use ColumnFormat::{Date, Float, Int, Percent, Text};
    use ColumnId as C;

    let mut columns = vec![
        Column::new(C::Symbol, "symbol", "Symbol", Text, "Ticker symbol"),
        Column::new(C::Name, "name", "Name", Text, "Company name"),
        Column::new(C::Sector, "sector", "Sector", Text, "Sector"),
        Column::new(C::Industry, "industry", "Industry", Text, "Industry"),
        Column::new(C::Cik, "cik", "CIK", Int, "SEC central index key"),
        Column::new(C::LastClose, "last_close", "Last Close", Float, "Newest daily close"),
        Column::new(C::High52w, "high_52w", "52W High", Float, "Highest high over the trailing year"),
        Column::new(C::Low52w, "low_52w", "52W Low", Float, "Lowest low over the trailing year"),
        Column::new(C::Sma50, "sma50", "SMA 50", Float, "Mean of the newest 50 closes"),
        Column::new(C::Sma150, "sma150", "SMA 150", Float, "Mean of the newest 150 closes"),
        Column::new(C::Sma200, "sma200", "SMA 200", Float, "Mean of the newest 200 closes"),
        Column::new(
            C::RelativeStrength,
            "relative_strength",
            "Relative Strength",
            Float,
            "Composite momentum score, latest quarter double weighted",
        ),
        Column::new(
            C::TrendTemplatePass,
            "trend_template_pass",
            "Trend Template",
            Text,
            "Price above a rising SMA stack and near the 52-week high",
        ),
        Column::new(
            C::PercentileMarket,
            "percentile_market",
            "RS Pctl (Market)",
            Percent,
            "Max-rank relative-strength percentile across the run",
        ),
        Column::new(
            C::PercentileSector,
            "percentile_sector",
            "RS Pctl (Sector)",
            Percent,
            "Max-rank relative-strength percentile within the sector",
        ),
        Column::new(
            C::PercentileIndustry,
            "percentile_industry",
            "RS Pctl (Industry)",
            Percent,
            "Max-rank relative-strength percentile within the industry",
        ),
        Column::new(
            C::EpsGrowthQuarters,
            "eps_growth_quarters",
            "EPS Growth Qtrs",
            Int,
            "Consecutive quarters of strictly rising EPS",
        ),
        Column::new(
            C::EpsSmoothedGrowthQuarters,
            "eps_smoothed_growth_quarters",
            "EPS (2Q avg) Growth Qtrs",
            Int,
            "Consecutive quarters of strictly rising two-quarter average EPS",
        ),
        Column::new(
            C::RevenueGrowthQuarters,
            "revenue_growth_quarters",
            "Revenue Growth Qtrs",
            Int,
            "Consecutive quarters of strictly rising revenue",
        ),
        Column::new(
            C::MarginGrowthQuarters,
            "margin_growth_quarters",
            "Margin Growth Qtrs",
            Int,
            "Consecutive quarters of strictly rising net margin",
        ),
    ];

    let series: [(fn(usize) -> ColumnId, &str, &str, ColumnFormat); 4] = [
        (C::Eps, "eps", "EPS", Float),
        (C::EpsSmoothed, "eps_smoothed", "EPS (2Q avg)", Float),
        (C::Revenue, "revenue", "Revenue", Int),
        (C::NetMargin, "net_margin", "Net Margin", Percent),
    ];
    for (id, key, header, format) in series {
        for q in 0..quarters {
            let age = if q == 0 {
                "newest quarter".to_string()
            } else {
                format!("{q} quarters back")
            };
            columns.push(Column::new(
                id(q),
                format!("{key}_q{q}"),
                format!("{header} Q{q}"),
                format,
                format!("{header}, {age}"),
            ));
        }
    }

    columns.extend([
        Column::new(C::MarketCap, "market_cap", "Market Cap", Int, "Market capitalisation"),
        Column::new(C::FloatShares, "float_shares", "Float Shares", Int, "Shares available to trade"),
        Column::new(
            C::HeldPercentInsiders,
            "held_percent_insiders",
            "Insiders",
            Percent,
            "Fraction of shares held by insiders",
        ),
        Column::new(
            C::HeldPercentInstitutions,
            "held_percent_institutions",
            "Institutions",
            Percent,
            "Fraction of shares held by institutions",
        ),
        Column::new(
            C::NextEarningsDate,
            "next_earnings_date",
            "Next Earnings",
            Date,
            "Nearest upcoming earnings date, else the latest one",
        ),
    ]);
    columns.extend((0..EARNINGS_DATE_COLUMNS).map(|n| {
        Column::new(
            C::EarningsDate(n),
            format!("earnings_{}", n + 1),
            format!("Earnings {}", n + 1),
            Date,
            format!("Calendar earnings date {} of {EARNINGS_DATE_COLUMNS}", n + 1),
        )
    }));
    columns.extend([
        Column::new(
            C::IncorporationYear,
            "incorporation_year",
            "Inc.",
            Int,
            "Year founded, else incorporated, from the business summary",
        ),
        Column::new(C::Website, "website", "Website", Text, "Company website"),
        Column::new(C::BusinessSummary, "business_summary", "Business Summary", Text, "Business summary"),
    ]);

    columns
}

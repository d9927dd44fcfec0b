//! Screen result rows.

use crate::state::TickerState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trendscan_data::{CompanyProfile, TickerIdentity};
use trendscan_metrics::{GrowthMetrics, Percentiles, PriceMetrics, RankEntry};
use trendscan_output::{Cell, ColumnId, ReportRow};

/// One scored ticker.
///
/// Built in one step once every per-ticker stage has succeeded; only the
/// percentile fields change afterwards, when the whole run is ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerRecord {
    /// Position in the universe
    pub universe_index: usize,
    /// Ticker symbol
    pub symbol: String,
    /// Company name
    pub name: String,
    /// Sector; provider value when known, else the feed seed
    pub sector: String,
    /// Industry; provider value when known, else the feed seed
    pub industry: String,
    /// SEC central index key from the feed
    pub cik: Option<u64>,
    /// `Scored` when built, `Valid` once accepted into the ranked set
    pub state: TickerState,

    /// Reconciled EPS, newest quarter first
    pub eps: Vec<Option<f64>>,
    /// Two-quarter rolling average EPS
    pub eps_smoothed: Vec<Option<f64>>,
    /// Total revenue
    pub revenue: Vec<Option<f64>>,
    /// Net margin
    pub net_margin: Vec<Option<f64>>,
    /// EPS growth streak
    pub eps_growth_quarters: usize,
    /// Smoothed EPS growth streak
    pub eps_smoothed_growth_quarters: usize,
    /// Revenue growth streak
    pub revenue_growth_quarters: usize,
    /// Net margin growth streak
    pub margin_growth_quarters: usize,

    /// Newest close
    pub last_close: f64,
    /// 52-week high
    pub high_52w: f64,
    /// 52-week low
    pub low_52w: f64,
    /// 50-day SMA
    pub sma50: f64,
    /// 150-day SMA
    pub sma150: f64,
    /// 200-day SMA
    pub sma200: f64,
    /// Composite relative-strength score
    pub relative_strength: f64,
    /// Trend template verdict
    pub trend_template_pass: bool,

    /// Percentile across the run
    pub percentile_market: Option<f64>,
    /// Percentile within the sector
    pub percentile_sector: Option<f64>,
    /// Percentile within the industry
    pub percentile_industry: Option<f64>,

    /// Market capitalisation
    pub market_cap: Option<f64>,
    /// Float shares
    pub float_shares: Option<f64>,
    /// Fraction held by insiders
    pub held_percent_insiders: Option<f64>,
    /// Fraction held by institutions
    pub held_percent_institutions: Option<f64>,
    /// Company website
    pub website: Option<String>,
    /// Business summary
    pub business_summary: Option<String>,
    /// Nearest upcoming earnings date, else the latest one
    pub next_earnings_date: Option<NaiveDate>,
    /// Every calendar earnings date, oldest first
    pub earnings_dates: Vec<NaiveDate>,
    /// Year founded or incorporated, from the business summary
    pub incorporation_year: Option<u16>,
}

impl TickerRecord {
    /// Assemble a record from the per-ticker stage outputs.
    pub fn new(
        universe_index: usize,
        identity: TickerIdentity,
        growth: GrowthMetrics,
        price: &PriceMetrics,
        profile: Option<CompanyProfile>,
        today: NaiveDate,
    ) -> Self {
        let profile = profile.unwrap_or_default();
        let label = |provider: Option<String>, seed: String| {
            provider
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(seed)
        };
        let next_earnings_date = profile.next_earnings_date(today);
        let earnings_dates = profile.sorted_earnings_dates();
        let incorporation_year = profile.incorporation_year();

        Self {
            universe_index,
            symbol: identity.symbol,
            name: identity.name,
            sector: label(profile.sector, identity.sector),
            industry: label(profile.industry, identity.industry),
            state: TickerState::Scored,
            cik: identity.cik,
            eps_growth_quarters: growth.streaks.eps,
            eps_smoothed_growth_quarters: growth.streaks.eps_smoothed,
            revenue_growth_quarters: growth.streaks.revenue,
            margin_growth_quarters: growth.streaks.net_margin,
            eps: growth.eps,
            eps_smoothed: growth.eps_smoothed,
            revenue: growth.revenue,
            net_margin: growth.net_margin,
            last_close: price.last_close,
            high_52w: price.high_52w,
            low_52w: price.low_52w,
            sma50: price.sma50,
            sma150: price.sma150,
            sma200: price.sma200,
            relative_strength: price.relative_strength,
            trend_template_pass: price.trend_template_pass(),
            percentile_market: None,
            percentile_sector: None,
            percentile_industry: None,
            market_cap: profile.market_cap,
            float_shares: profile.float_shares,
            held_percent_insiders: profile.held_percent_insiders,
            held_percent_institutions: profile.held_percent_institutions,
            website: profile.website,
            business_summary: profile.long_business_summary,
            next_earnings_date,
            earnings_dates,
            incorporation_year,
        }
    }

    /// Ranker input for this record.
    pub fn rank_entry(&self) -> RankEntry {
        RankEntry::new(self.relative_strength, &self.sector, &self.industry)
    }

    /// Accept the record into the set the ranker sees.
    pub const fn mark_valid(&mut self) {
        self.state = TickerState::Valid;
    }

    /// Store the ranked percentiles.
    pub const fn set_percentiles(&mut self, percentiles: Percentiles) {
        self.percentile_market = Some(percentiles.market);
        self.percentile_sector = percentiles.sector;
        self.percentile_industry = percentiles.industry;
    }
}

fn quarter(series: &[Option<f64>], q: usize) -> Cell {
    Cell::from(series.get(q).copied().flatten())
}

impl ReportRow for TickerRecord {
    fn cell(&self, column: ColumnId) -> Cell {
        match column {
            ColumnId::Symbol => Cell::from(self.symbol.as_str()),
            ColumnId::Name => Cell::from(self.name.as_str()),
            ColumnId::Sector => Cell::from(self.sector.as_str()),
            ColumnId::Industry => Cell::from(self.industry.as_str()),
            ColumnId::LastClose => Cell::from(self.last_close),
            ColumnId::High52w => Cell::from(self.high_52w),
            ColumnId::Low52w => Cell::from(self.low_52w),
            ColumnId::Sma50 => Cell::from(self.sma50),
            ColumnId::Sma150 => Cell::from(self.sma150),
            ColumnId::Sma200 => Cell::from(self.sma200),
            ColumnId::RelativeStrength => Cell::from(self.relative_strength),
            ColumnId::TrendTemplatePass => Cell::from(self.trend_template_pass),
            ColumnId::PercentileMarket => Cell::from(self.percentile_market),
            ColumnId::PercentileSector => Cell::from(self.percentile_sector),
            ColumnId::PercentileIndustry => Cell::from(self.percentile_industry),
            ColumnId::EpsGrowthQuarters => Cell::from(self.eps_growth_quarters),
            ColumnId::EpsSmoothedGrowthQuarters => Cell::from(self.eps_smoothed_growth_quarters),
            ColumnId::RevenueGrowthQuarters => Cell::from(self.revenue_growth_quarters),
            ColumnId::MarginGrowthQuarters => Cell::from(self.margin_growth_quarters),
            ColumnId::Eps(q) => quarter(&self.eps, q),
            ColumnId::EpsSmoothed(q) => quarter(&self.eps_smoothed, q),
            ColumnId::Revenue(q) => quarter(&self.revenue, q),
            ColumnId::NetMargin(q) => quarter(&self.net_margin, q),
            ColumnId::MarketCap => Cell::from(self.market_cap),
            ColumnId::FloatShares => Cell::from(self.float_shares),
            ColumnId::HeldPercentInsiders => Cell::from(self.held_percent_insiders),
            ColumnId::HeldPercentInstitutions => Cell::from(self.held_percent_institutions),
            ColumnId::NextEarningsDate => Cell::from(self.next_earnings_date),
            ColumnId::EarningsDate(n) => Cell::from(self.earnings_dates.get(n).copied()),
            ColumnId::IncorporationYear => Cell::from(self.incorporation_year),
            ColumnId::Cik => Cell::from(self.cik),
            ColumnId::Website => Cell::from(self.website.clone()),
            ColumnId::BusinessSummary => Cell::from(self.business_summary.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscan_data::PriceBar;
    use trendscan_metrics::{
        PriceHistoryConfig, analyze_price_history, compute_growth_metrics, reconcile_series,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(profile: Option<CompanyProfile>) -> TickerRecord {
        let series = reconcile_series(
            &[Some(2.0), Some(1.5), Some(1.0), Some(0.5)],
            &[Some(20.0), Some(15.0), Some(10.0), Some(5.0)],
            &[Some(10.0); 4],
            &[Some(100.0), Some(90.0), Some(80.0), Some(70.0)],
        );
        let growth = compute_growth_metrics(&series, true);

        let start = date(2024, 1, 1);
        let bars: Vec<PriceBar> = (0..260)
            .map(|i| PriceBar::flat(start + chrono::Duration::days(i), 10.0 + i as f64))
            .collect();
        let price = analyze_price_history(&bars, &PriceHistoryConfig::default()).unwrap();

        TickerRecord::new(
            3,
            TickerIdentity::new("ACME", "Acme Corp", "Industrials", "Machinery").with_cik(7),
            growth,
            &price,
            profile,
            date(2024, 9, 1),
        )
    }

    #[test]
    fn test_record_fields() {
        let record = record(None);
        assert_eq!(record.universe_index, 3);
        assert_eq!(record.eps_growth_quarters, 3);
        assert_eq!(record.revenue_growth_quarters, 3);
        assert!(record.trend_template_pass);
        assert_eq!(record.sector, "Industrials");
        assert!(record.percentile_market.is_none());
        assert_eq!(record.state, TickerState::Scored);
        let mut record = record;
        record.mark_valid();
        assert_eq!(record.state, TickerState::Valid);
        assert!(record.state.is_terminal());
        assert!(record.next_earnings_date.is_none());
    }

    #[test]
    fn test_profile_overrides_labels() {
        let profile = CompanyProfile {
            sector: Some("Technology".into()),
            industry: Some("  ".into()),
            market_cap: Some(2.5e9),
            earnings_dates: vec![date(2024, 10, 24)],
            ..CompanyProfile::default()
        };

        let record = record(Some(profile));
        assert_eq!(record.sector, "Technology");
        assert_eq!(record.industry, "Machinery");
        assert_eq!(record.market_cap, Some(2.5e9));
        assert_eq!(record.next_earnings_date, Some(date(2024, 10, 24)));
    }

    #[test]
    fn test_calendar_and_incorporation_cells() {
        let profile = CompanyProfile {
            long_business_summary: Some(
                "Acme Corp builds machinery. The company was incorporated in 1952 \
                 and is headquartered in Chicago, Illinois."
                    .into(),
            ),
            earnings_dates: vec![date(2024, 10, 28), date(2024, 10, 24)],
            ..CompanyProfile::default()
        };

        let record = record(Some(profile));
        assert_eq!(record.incorporation_year, Some(1952));
        assert_eq!(record.earnings_dates, vec![date(2024, 10, 24), date(2024, 10, 28)]);
        assert_eq!(record.cell(ColumnId::IncorporationYear), Cell::Int(1952));
        assert_eq!(record.cell(ColumnId::EarningsDate(0)), Cell::Date(date(2024, 10, 24)));
        assert_eq!(record.cell(ColumnId::EarningsDate(1)), Cell::Date(date(2024, 10, 28)));
        assert_eq!(record.cell(ColumnId::EarningsDate(2)), Cell::Empty);
        assert_eq!(record.cell(ColumnId::Cik), Cell::Int(7));
    }

    #[test]
    fn test_report_cells() {
        let mut record = record(None);
        record.set_percentiles(Percentiles {
            market: 0.5,
            sector: None,
            industry: Some(1.0),
        });

        assert_eq!(record.cell(ColumnId::Symbol), Cell::Text("ACME".into()));
        assert_eq!(record.cell(ColumnId::PercentileMarket), Cell::Float(0.5));
        assert_eq!(record.cell(ColumnId::PercentileSector), Cell::Empty);
        assert_eq!(record.cell(ColumnId::Eps(0)), Cell::Float(2.0));
        assert_eq!(record.cell(ColumnId::Eps(8)), Cell::Empty);
        assert_eq!(record.cell(ColumnId::EpsGrowthQuarters), Cell::Int(3));
        assert_eq!(record.cell(ColumnId::TrendTemplatePass), Cell::Bool(true));
    }
}

//! Screening pipeline
//!
//! Runs every ticker in the universe through fundamentals, reconciliation,
//! price history and scoring, then ranks the survivors in one batch. Tickers
//! can be processed concurrently, but outcomes are consumed in universe order
//! so rejections and rows come out in feed order on every run.

use crate::config::ScreenerConfig;
use crate::error::{Result, ScreenerError};
use crate::record::TickerRecord;
use crate::state::{Rejection, RejectionReason, TickerState};
use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use std::fmt;
use std::pin::pin;
use std::sync::Arc;
use tracing::{debug, info, warn};
use trendscan_data::{DataError, MarketDataProvider, TickerFeed, TickerIdentity};
use trendscan_metrics::{
    PriceHistoryConfig, analyze_price_history, compute_growth_metrics, rank_percentiles, reconcile,
};
use trendscan_output::{RejectionEntry, ReportTable, RunSummary, report_columns};

/// Progress notification, sent once per finished ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Tickers finished so far
    pub completed: usize,
    /// Tickers in this run
    pub total: usize,
    /// Ticker just finished
    pub symbol: String,
    /// `Valid` or `Rejected`
    pub state: TickerState,
}

type ProgressFn = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenOutcome {
    /// Valid records in universe order
    pub records: Vec<TickerRecord>,
    /// Rejected tickers in universe order
    pub rejections: Vec<Rejection>,
    /// Symbols delivered by the feed
    pub universe_size: usize,
    /// Symbols processed
    pub processed: usize,
}

impl ScreenOutcome {
    /// Valid records passing the trend template.
    pub fn trend_template_passes(&self) -> usize {
        self.records.iter().filter(|r| r.trend_template_pass).count()
    }

    /// Report table with `quarters` columns per quarterly series.
    pub fn report_table(&self, quarters: usize) -> ReportTable {
        ReportTable::from_records(report_columns(quarters), &self.records)
    }

    /// Totals and rejection list.
    pub fn summary(&self) -> RunSummary {
        RunSummary::new(
            self.universe_size,
            self.processed,
            self.records.len(),
            self.trend_template_passes(),
            self.rejections.iter().map(RejectionEntry::from).collect(),
        )
    }
}

/// What happened to one ticker.
enum TickerOutcome {
    Scored(Box<TickerRecord>),
    Rejected {
        rejection: Rejection,
        /// Set when the provider looked unreachable rather than the data bad
        outage: Option<DataError>,
    },
}

/// Screens a ticker universe.
pub struct Screener {
    config: ScreenerConfig,
    on_progress: Option<ProgressFn>,
}

impl fmt::Debug for Screener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screener")
            .field("config", &self.config)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl Default for Screener {
    fn default() -> Self {
        Self::new(ScreenerConfig::default())
    }
}

impl Screener {
    /// Create a screener.
    pub const fn new(config: ScreenerConfig) -> Self {
        Self {
            config,
            on_progress: None,
        }
    }

    /// Install a progress callback.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Active configuration.
    pub const fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Fetch the universe from `feed` and screen it.
    ///
    /// A feed failure aborts before any ticker is processed.
    pub async fn run<F, P>(&self, feed: &F, provider: &P) -> Result<ScreenOutcome>
    where
        F: TickerFeed,
        P: MarketDataProvider,
    {
        let universe = feed
            .fetch_universe()
            .await
            .map_err(|e| ScreenerError::upstream("ticker feed", e))?;
        info!(symbols = universe.len(), "fetched ticker universe");

        self.screen(universe, provider).await
    }

    /// Screen an already fetched universe.
    pub async fn screen<P>(
        &self,
        universe: Vec<TickerIdentity>,
        provider: &P,
    ) -> Result<ScreenOutcome>
    where
        P: MarketDataProvider,
    {
        let universe_size = universe.len();
        let limit = self.config.limit.unwrap_or(universe_size);
        let selected: Vec<TickerIdentity> = universe.into_iter().take(limit).collect();
        let total = selected.len();
        let price_config = self.config.price_history();
        let today = Utc::now().date_naive();

        let mut outcomes = pin!(
            stream::iter(selected.into_iter().enumerate())
                .map(|(index, identity)| {
                    screen_ticker(index, identity, provider, &self.config, &price_config, today)
                })
                .buffered(self.config.effective_concurrency())
        );

        let mut records = Vec::new();
        let mut rejections = Vec::new();
        let mut consecutive_outages = 0;
        let mut completed = 0;

        while let Some(outcome) = outcomes.next().await {
            completed += 1;
            let (symbol, state) = match outcome {
                TickerOutcome::Scored(mut record) => {
                    consecutive_outages = 0;
                    record.mark_valid();
                    let symbol = record.symbol.clone();
                    let state = record.state;
                    records.push(*record);
                    (symbol, state)
                }
                TickerOutcome::Rejected { rejection, outage } => {
                    warn!(
                        symbol = %rejection.symbol,
                        state = %rejection.state,
                        kind = rejection.kind(),
                        reason = %rejection.reason,
                        "ticker rejected"
                    );
                    match outage {
                        Some(err) => {
                            consecutive_outages += 1;
                            if consecutive_outages >= self.config.max_consecutive_outages.max(1) {
                                let context = format!(
                                    "market data provider, {consecutive_outages} consecutive failures"
                                );
                                return Err(ScreenerError::upstream(context, err));
                            }
                        }
                        None => consecutive_outages = 0,
                    }
                    let symbol = rejection.symbol.clone();
                    rejections.push(rejection);
                    (symbol, TickerState::Rejected)
                }
            };

            if let Some(callback) = &self.on_progress {
                callback(&Progress {
                    completed,
                    total,
                    symbol,
                    state,
                });
            }
        }

        rank(&mut records)?;

        let outcome = ScreenOutcome {
            records,
            rejections,
            universe_size,
            processed: completed,
        };
        info!(
            processed = outcome.processed,
            valid = outcome.records.len(),
            rejected = outcome.rejections.len(),
            trend_template_passes = outcome.trend_template_passes(),
            "screen complete"
        );
        Ok(outcome)
    }
}

/// Rank every valid record in one batch.
fn rank(records: &mut [TickerRecord]) -> Result<()> {
    let entries: Vec<_> = records.iter().map(TickerRecord::rank_entry).collect();
    let percentiles = rank_percentiles(&entries)?;
    for (record, percentiles) in records.iter_mut().zip(percentiles) {
        record.set_percentiles(percentiles);
    }
    Ok(())
}

/// Carry one ticker from `Pending` to `Scored` or `Rejected`.
async fn screen_ticker<P: MarketDataProvider>(
    index: usize,
    identity: TickerIdentity,
    provider: &P,
    config: &ScreenerConfig,
    price_config: &PriceHistoryConfig,
    today: NaiveDate,
) -> TickerOutcome {
    let symbol = identity.symbol.clone();
    let reject = |state: TickerState, reason: RejectionReason, outage: Option<DataError>| {
        TickerOutcome::Rejected {
            rejection: Rejection::new(symbol.clone(), state, reason),
            outage,
        }
    };
    let outage = |err: DataError| err.is_upstream_outage().then_some(err);

    let mut state = TickerState::Pending;
    debug!(symbol = %symbol, %state, "screening");

    let table = match provider.quarterly_fundamentals(&symbol).await {
        Ok(table) if table.is_empty() => {
            return reject(
                TickerState::FundamentalsFetched,
                RejectionReason::FundamentalsUnavailable {
                    detail: "no quarterly statements".to_string(),
                },
                None,
            );
        }
        Ok(table) => table,
        Err(err) => {
            let reason = RejectionReason::fundamentals_unavailable(&err);
            return reject(state, reason, outage(err));
        }
    };
    state = TickerState::FundamentalsFetched;
    debug!(symbol = %symbol, %state, quarters = table.len());

    let mut series = match reconcile(&table, config.min_quarters) {
        Ok(series) => series,
        Err(err) => return reject(state, err.into(), None),
    };
    series.truncate(config.max_quarters);
    state = TickerState::Reconciled;
    debug!(symbol = %symbol, %state, reconstructed = ?series.reconstructed);

    let bars = match provider.price_history(&symbol).await {
        Ok(bars) => bars,
        Err(err) => {
            let reason = RejectionReason::price_unavailable(&err);
            return reject(state, reason, outage(err));
        }
    };
    state = TickerState::PriceFetched;
    debug!(symbol = %symbol, %state, bars = bars.len());

    let price = match analyze_price_history(&bars, price_config) {
        Ok(price) => price,
        Err(err) => return reject(state, err.into(), None),
    };
    let growth = compute_growth_metrics(&series, config.floor_negative_eps);

    let profile = match provider.company_profile(&symbol).await {
        Ok(profile) => profile,
        Err(err) => {
            warn!(symbol = %symbol, error = %err, "company profile unavailable");
            None
        }
    };

    state = TickerState::Scored;
    debug!(
        symbol = %symbol,
        %state,
        relative_strength = price.relative_strength,
        trend_template = price.trend_template_pass()
    );

    TickerOutcome::Scored(Box::new(TickerRecord::new(
        index, identity, growth, &price, profile, today,
    )))
}

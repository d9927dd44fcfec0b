//! Market data provider interface.

use crate::error::Result;
use crate::model::{CompanyProfile, PriceBar, QuarterlyFundamentals};
use std::future::Future;

/// Source of per-symbol fundamentals, prices and company data.
///
/// Implementations own their request budget (rate limiting, retries); the
/// screener only sees results. Absence of data is reported as
/// [`DataError::MissingData`](crate::DataError::MissingData) or, for the
/// optional profile, as `Ok(None)`.
pub trait MarketDataProvider: Send + Sync {
    /// Quarterly income statement line items, newest quarter first.
    fn quarterly_fundamentals(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<QuarterlyFundamentals>> + Send;

    /// Daily bars covering the trailing history window, oldest first.
    fn price_history(&self, symbol: &str) -> impl Future<Output = Result<Vec<PriceBar>>> + Send;

    /// Company profile and earnings calendar, if the provider has one.
    fn company_profile(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<Option<CompanyProfile>>> + Send;
}

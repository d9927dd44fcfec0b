//! Company profile and earnings calendar from Yahoo Finance.
//!
//! The quoteSummary endpoint requires a session cookie plus a matching
//! "crumb" token; both are obtained once per provider and reused.

use super::rate_limit::SharedRateLimiter;
use crate::error::{DataError, Result};
use crate::model::CompanyProfile;
use chrono::DateTime;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

/// Sets the session cookie consumed by the crumb endpoint
const COOKIE_URL: &str = "https://fc.yahoo.com";

/// Returns the crumb bound to the current session cookie
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";

/// quoteSummary base URL
const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// Modules requested from quoteSummary
const MODULES: &str = "assetProfile,defaultKeyStatistics,price,calendarEvents";

/// Yahoo Finance company profile provider.
#[derive(Debug)]
pub struct YahooProfileProvider {
    client: reqwest::Client,
    limiter: SharedRateLimiter,
    crumb: OnceCell<String>,
}

impl YahooProfileProvider {
    /// Create a provider. `client` must have its cookie store enabled.
    pub const fn new(client: reqwest::Client, limiter: SharedRateLimiter) -> Self {
        Self {
            client,
            limiter,
            crumb: OnceCell::const_new(),
        }
    }

    async fn crumb(&self) -> Result<&str> {
        let crumb = self
            .crumb
            .get_or_try_init(|| async {
                // fc.yahoo.com answers 404 but still sets the cookie
                self.limiter.acquire().await;
                let _ = self.client.get(COOKIE_URL).send().await;

                self.limiter.acquire().await;
                let response = self.client.get(CRUMB_URL).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(DataError::Http {
                        status: status.as_u16(),
                        url: CRUMB_URL.to_string(),
                    });
                }
                let crumb = response.text().await?.trim().to_string();
                if crumb.is_empty() || crumb.contains('<') {
                    return Err(DataError::YahooApi("invalid crumb".to_string()));
                }
                Ok(crumb)
            })
            .await?;
        Ok(crumb.as_str())
    }

    /// Fetch the profile for a single symbol; `Ok(None)` when Yahoo has none.
    pub async fn fetch_profile(&self, symbol: &str) -> Result<Option<CompanyProfile>> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let crumb = self.crumb().await?;
        let url = format!("{SUMMARY_URL}/{symbol}");

        self.limiter.acquire().await;
        let response = self
            .client
            .get(&url)
            .query(&[("modules", MODULES), ("crumb", crumb)])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(symbol, "no quoteSummary for symbol");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        parse_quote_summary(&body)
    }
}

/// Parse a quoteSummary response body.
pub fn parse_quote_summary(body: &str) -> Result<Option<CompanyProfile>> {
    let root: Value = serde_json::from_str(body)?;
    let Some(result) = root.pointer("/quoteSummary/result/0") else {
        return Ok(None);
    };

    let raw = |path: &str| {
        result
            .pointer(path)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    };
    let text = |path: &str| {
        result
            .pointer(path)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let earnings_dates = result
        .pointer("/calendarEvents/earnings/earningsDate")
        .and_then(Value::as_array)
        .map(|dates| {
            dates
                .iter()
                .filter_map(|d| d.get("raw").and_then(Value::as_i64))
                .filter_map(|ts| DateTime::from_timestamp(ts, 0))
                .map(|dt| dt.date_naive())
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(CompanyProfile {
        market_cap: raw("/price/marketCap/raw"),
        float_shares: raw("/defaultKeyStatistics/floatShares/raw"),
        held_percent_insiders: raw("/defaultKeyStatistics/heldPercentInsiders/raw"),
        held_percent_institutions: raw("/defaultKeyStatistics/heldPercentInstitutions/raw"),
        sector: text("/assetProfile/sector"),
        industry: text("/assetProfile/industry"),
        website: text("/assetProfile/website"),
        long_business_summary: text("/assetProfile/longBusinessSummary"),
        earnings_dates,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_full_summary() {
        let body = r#"{"quoteSummary": {"result": [{
            "assetProfile": {
                "sector": "Technology",
                "industry": "Consumer Electronics",
                "website": "https://www.apple.com",
                "longBusinessSummary": "Designs smartphones."
            },
            "defaultKeyStatistics": {
                "floatShares": {"raw": 15000000000, "fmt": "15B"},
                "heldPercentInsiders": {"raw": 0.0207, "fmt": "2.07%"},
                "heldPercentInstitutions": {"raw": 0.6127, "fmt": "61.27%"}
            },
            "price": {"marketCap": {"raw": 3400000000000, "fmt": "3.4T"}},
            "calendarEvents": {"earnings": {"earningsDate": [
                {"raw": 1730332800, "fmt": "2024-10-31"}
            ]}}
        }], "error": null}}"#;

        let profile = parse_quote_summary(body).unwrap().unwrap();
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(profile.industry.as_deref(), Some("Consumer Electronics"));
        assert_relative_eq!(profile.market_cap.unwrap(), 3.4e12);
        assert_relative_eq!(profile.held_percent_insiders.unwrap(), 0.0207);
        assert_eq!(
            profile.earnings_dates,
            vec![NaiveDate::from_ymd_opt(2024, 10, 31).unwrap()]
        );
    }

    #[test]
    fn test_parse_partial_summary() {
        let body = r#"{"quoteSummary": {"result": [{
            "assetProfile": {"sector": "", "industry": "Biotechnology"},
            "price": {"marketCap": {}}
        }], "error": null}}"#;

        let profile = parse_quote_summary(body).unwrap().unwrap();
        assert!(profile.sector.is_none());
        assert_eq!(profile.industry.as_deref(), Some("Biotechnology"));
        assert!(profile.market_cap.is_none());
        assert!(profile.earnings_dates.is_empty());
    }

    #[test]
    fn test_parse_not_found() {
        let body = r#"{"quoteSummary": {"result": null, "error": {"code": "Not Found"}}}"#;
        assert!(parse_quote_summary(body).unwrap().is_none());
    }
}

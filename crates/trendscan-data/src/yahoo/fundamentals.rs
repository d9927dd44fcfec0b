//! Quarterly income statement data from Yahoo Finance.
//!
//! Uses the fundamentals-timeseries endpoint, which returns one series per
//! requested line item with entries keyed by `asOfDate` (quarter end).

use super::rate_limit::SharedRateLimiter;
use crate::error::{DataError, Result};
use crate::model::{LineItem, QuarterlyFundamentals};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Timeseries endpoint base URL
const TIMESERIES_URL: &str =
    "https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";

/// How far back to request statements (nine quarters plus filing lag)
const LOOKBACK_DAYS: i64 = 3 * 365;

/// Timeseries type key for a line item.
const fn timeseries_key(item: LineItem) -> &'static str {
    match item {
        LineItem::BasicEps => "quarterlyBasicEPS",
        LineItem::TotalRevenue => "quarterlyTotalRevenue",
        LineItem::NetIncome => "quarterlyNetIncome",
        LineItem::BasicAverageShares => "quarterlyBasicAverageShares",
    }
}

fn line_item_for_key(key: &str) -> Option<LineItem> {
    LineItem::all()
        .into_iter()
        .find(|item| timeseries_key(*item) == key)
}

/// Yahoo Finance quarterly fundamentals provider.
#[derive(Debug)]
pub struct YahooFundamentalsProvider {
    client: reqwest::Client,
    limiter: SharedRateLimiter,
    max_quarters: usize,
}

impl YahooFundamentalsProvider {
    /// Create a provider sharing `client` and `limiter`, keeping at most
    /// `max_quarters` of the newest quarters.
    pub const fn new(client: reqwest::Client, limiter: SharedRateLimiter, max_quarters: usize) -> Self {
        Self {
            client,
            limiter,
            max_quarters,
        }
    }

    /// Fetch the quarterly table for a single symbol.
    pub async fn fetch_quarterly(&self, symbol: &str) -> Result<QuarterlyFundamentals> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let now = Utc::now();
        let period1 = (now - Duration::days(LOOKBACK_DAYS)).timestamp().to_string();
        let period2 = now.timestamp().to_string();
        let types = LineItem::all()
            .into_iter()
            .map(timeseries_key)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{TIMESERIES_URL}/{symbol}");

        self.limiter.acquire().await;
        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("type", types.as_str()),
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let table = parse_timeseries(symbol, &body, self.max_quarters)?;
        debug!(symbol, quarters = table.len(), "fetched quarterly fundamentals");
        Ok(table)
    }
}

/// Parse a timeseries response into a newest-first quarterly table.
///
/// Line items are aligned on quarter end date; a quarter reported for one
/// item but not another leaves a gap in the latter. Items that never appear
/// in the response stay `None`.
pub fn parse_timeseries(
    symbol: &str,
    body: &str,
    max_quarters: usize,
) -> Result<QuarterlyFundamentals> {
    let root: Value = serde_json::from_str(body)?;
    let results = root
        .pointer("/timeseries/result")
        .and_then(Value::as_array)
        .ok_or_else(|| DataError::Parse("timeseries response has no result".to_string()))?;

    let mut values: HashMap<LineItem, BTreeMap<NaiveDate, f64>> = HashMap::new();
    let mut dates = BTreeSet::new();

    for result in results {
        let Some(key) = result.pointer("/meta/type/0").and_then(Value::as_str) else {
            continue;
        };
        let Some(item) = line_item_for_key(key) else {
            continue;
        };
        let Some(entries) = result.get(key).and_then(Value::as_array) else {
            continue;
        };

        let series = values.entry(item).or_default();
        for entry in entries.iter().filter(|e| !e.is_null()) {
            let Some(date) = entry
                .get("asOfDate")
                .and_then(Value::as_str)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            else {
                continue;
            };
            dates.insert(date);
            if let Some(raw) = entry
                .pointer("/reportedValue/raw")
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite())
            {
                series.insert(date, raw);
            }
        }
    }

    if dates.is_empty() {
        return Err(DataError::missing(symbol, "no quarterly statements"));
    }

    let mut table = QuarterlyFundamentals::new(symbol);
    table.quarter_ends = dates.into_iter().rev().take(max_quarters).collect();

    for (item, series) in values {
        let column = table
            .quarter_ends
            .iter()
            .map(|date| series.get(date).copied())
            .collect();
        table.set_line_item(item, column);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, raw: f64) -> String {
        format!(
            r#"{{"asOfDate": "{date}", "periodType": "3M", "currencyCode": "USD",
                "reportedValue": {{"raw": {raw}, "fmt": "{raw}"}}}}"#
        )
    }

    fn series(key: &str, entries: &[String]) -> String {
        format!(
            r#"{{"meta": {{"symbol": ["TEST"], "type": ["{key}"]}},
                "timestamp": [], "{key}": [{}]}}"#,
            entries.join(",")
        )
    }

    fn body(results: &[String]) -> String {
        format!(
            r#"{{"timeseries": {{"result": [{}], "error": null}}}}"#,
            results.join(",")
        )
    }

    #[test]
    fn test_parse_aligns_line_items_newest_first() {
        let eps = series(
            "quarterlyBasicEPS",
            &[entry("2024-03-31", 1.5), entry("2024-06-30", 1.8)],
        );
        let revenue = series(
            "quarterlyTotalRevenue",
            &[
                entry("2023-12-31", 90.0),
                entry("2024-03-31", 100.0),
                entry("2024-06-30", 110.0),
            ],
        );
        let table = parse_timeseries("TEST", &body(&[eps, revenue]), 9).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.quarter_ends[0],
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
        );
        assert_eq!(table.basic_eps, Some(vec![Some(1.8), Some(1.5), None]));
        assert_eq!(
            table.total_revenue,
            Some(vec![Some(110.0), Some(100.0), Some(90.0)])
        );
        assert!(table.net_income.is_none());
        assert!(table.basic_average_shares.is_none());
    }

    #[test]
    fn test_parse_skips_null_entries_and_limits_quarters() {
        let entries: Vec<String> = (1..=12)
            .map(|m| entry(&format!("2023-{m:02}-28"), f64::from(m)))
            .collect();
        let mut income = series("quarterlyNetIncome", &entries);
        income = income.replacen("[{", "[null, {", 1);

        let table = parse_timeseries("TEST", &body(&[income]), 9).unwrap();
        assert_eq!(table.len(), 9);
        assert_eq!(table.net_income.as_ref().unwrap()[0], Some(12.0));
        assert_eq!(table.net_income.as_ref().unwrap()[8], Some(4.0));
    }

    #[test]
    fn test_parse_empty_result_is_missing_data() {
        let result = parse_timeseries("TEST", &body(&[]), 9);
        assert!(matches!(result, Err(DataError::MissingData { .. })));
    }

    #[test]
    fn test_parse_malformed_body() {
        let result = parse_timeseries("TEST", r#"{"chart": {}}"#, 9);
        assert!(matches!(result, Err(DataError::Parse(_))));
    }
}

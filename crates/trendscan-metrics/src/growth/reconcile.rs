//! Quarterly series reconciliation.
//!
//! Providers often leave `Basic EPS` blank for a quarter while still
//! reporting net income and share count. Reconciliation fills those gaps and
//! derives net margin, without ever overwriting a reported value.

use crate::error::MetricsError;
use serde::{Deserialize, Serialize};
use trendscan_data::{LineItem, QuarterlyFundamentals};

/// Minimum quarters of fundamentals a ticker needs.
pub const MIN_QUARTERS: usize = 4;

/// Reconciled quarterly series, newest quarter first, all the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledSeries {
    /// EPS with gaps reconstructed where possible
    pub eps: Vec<Option<f64>>,
    /// Total revenue
    pub revenue: Vec<Option<f64>>,
    /// Net income
    pub net_income: Vec<Option<f64>>,
    /// Net income over revenue; undefined where revenue is missing or zero
    pub net_margin: Vec<Option<f64>>,
    /// Quarter indices whose EPS was reconstructed
    pub reconstructed: Vec<usize>,
}

impl ReconciledSeries {
    /// Number of quarters.
    pub fn len(&self) -> usize {
        self.eps.len()
    }

    /// Whether there are no quarters.
    pub fn is_empty(&self) -> bool {
        self.eps.is_empty()
    }

    /// Keep only the newest `quarters` quarters.
    pub fn truncate(&mut self, quarters: usize) {
        self.eps.truncate(quarters);
        self.revenue.truncate(quarters);
        self.net_income.truncate(quarters);
        self.net_margin.truncate(quarters);
        self.reconstructed.retain(|q| *q < quarters);
    }
}

/// Reconcile a provider table.
///
/// Fails with [`MetricsError::MissingSeries`] when EPS, revenue or net income
/// is not reported at all, and with [`MetricsError::ShortQuarterHistory`]
/// when fewer than `min_quarters` quarters are present. A missing share
/// count series only disables EPS reconstruction.
pub fn reconcile(
    table: &QuarterlyFundamentals,
    min_quarters: usize,
) -> Result<ReconciledSeries, MetricsError> {
    let required = |item: LineItem| {
        table
            .line_item(item)
            .ok_or(MetricsError::MissingSeries { line_item: item })
    };
    let eps = required(LineItem::BasicEps)?;
    let revenue = required(LineItem::TotalRevenue)?;
    let net_income = required(LineItem::NetIncome)?;
    let shares = table.line_item(LineItem::BasicAverageShares).unwrap_or(&[]);

    let quarters = table.len();
    if quarters < min_quarters {
        return Err(MetricsError::ShortQuarterHistory {
            found: quarters,
            required: min_quarters,
        });
    }

    Ok(reconcile_series(
        &aligned(eps, quarters),
        net_income,
        shares,
        revenue,
    ))
}

/// Reconcile four same-length series (newest first).
///
/// A missing `eps[q]` becomes `net_income[q] / shares[q]`. When exactly one
/// of those operands is missing at `q` and `q` is not the oldest quarter,
/// the value from quarter `q + 1` stands in for it. When both are missing
/// the EPS stays missing. Zero share counts count as missing.
pub fn reconcile_series(
    eps: &[Option<f64>],
    net_income: &[Option<f64>],
    shares: &[Option<f64>],
    revenue: &[Option<f64>],
) -> ReconciledSeries {
    let quarters = eps.len();
    let eps = aligned(eps, quarters);
    let shares: Vec<Option<f64>> = aligned(shares, quarters)
        .into_iter()
        .map(|s| s.filter(|v| *v != 0.0))
        .collect();
    let net_income = aligned(net_income, quarters);
    let revenue = aligned(revenue, quarters);

    let mut reconciled_eps = Vec::with_capacity(quarters);
    let mut reconstructed = Vec::new();

    for q in 0..quarters {
        if let Some(reported) = eps[q] {
            reconciled_eps.push(Some(reported));
            continue;
        }

        let has_older = q + 1 < quarters;
        let older = |series: &[Option<f64>]| if has_older { series[q + 1] } else { None };
        let rebuilt = match (net_income[q], shares[q]) {
            (Some(income), Some(count)) => Some(income / count),
            (Some(income), None) => older(&shares).map(|count| income / count),
            (None, Some(count)) => older(&net_income).map(|income| income / count),
            (None, None) => None,
        };

        if rebuilt.is_some() {
            reconstructed.push(q);
        }
        reconciled_eps.push(rebuilt);
    }

    let net_margin = net_income
        .iter()
        .zip(&revenue)
        .map(|(income, rev)| match (income, rev) {
            (Some(income), Some(rev)) if *rev != 0.0 => Some(income / rev),
            _ => None,
        })
        .collect();

    ReconciledSeries {
        eps: reconciled_eps,
        revenue,
        net_income,
        net_margin,
        reconstructed,
    }
}

/// Pad or truncate to `len`, treating absent entries and NaN as missing.
fn aligned(series: &[Option<f64>], len: usize) -> Vec<Option<f64>> {
    (0..len)
        .map(|q| series.get(q).copied().flatten().filter(|v| !v.is_nan()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn table(quarters: usize) -> QuarterlyFundamentals {
        let mut table = QuarterlyFundamentals::new("TEST");
        let mut date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        for _ in 0..quarters {
            table.quarter_ends.push(date);
            date = date - chrono::Duration::days(91);
        }
        table.basic_eps = Some(vec![Some(1.0); quarters]);
        table.total_revenue = Some(vec![Some(100.0); quarters]);
        table.net_income = Some(vec![Some(10.0); quarters]);
        table.basic_average_shares = Some(vec![Some(10.0); quarters]);
        table
    }

    #[test]
    fn test_present_eps_is_never_overwritten() {
        let eps = [Some(1.5), Some(-0.2), Some(0.0), Some(2.0)];
        let income = [Some(100.0); 4];
        let shares = [Some(10.0); 4];
        let revenue = [Some(1000.0); 4];

        let out = reconcile_series(&eps, &income, &shares, &revenue);
        assert_eq!(out.eps, eps.to_vec());
        assert!(out.reconstructed.is_empty());
    }

    #[test]
    fn test_reconstructs_from_same_quarter() {
        let out = reconcile_series(
            &[None, Some(1.0)],
            &[Some(120.0), Some(100.0)],
            &[Some(60.0), Some(50.0)],
            &[Some(1000.0), Some(900.0)],
        );
        assert_eq!(out.eps[0], Some(2.0));
        assert_eq!(out.reconstructed, vec![0]);
    }

    #[test]
    fn test_missing_shares_fall_back_to_older_quarter() {
        let out = reconcile_series(
            &[None, None],
            &[Some(150.0), Some(100.0)],
            &[None, Some(50.0)],
            &[Some(1000.0), Some(1000.0)],
        );
        assert_eq!(out.eps[0], Some(3.0));
        assert_eq!(out.eps[1], Some(2.0));
    }

    #[test]
    fn test_missing_income_falls_back_to_older_quarter() {
        let out = reconcile_series(
            &[None, Some(2.0)],
            &[None, Some(100.0)],
            &[Some(25.0), Some(50.0)],
            &[Some(1000.0), Some(1000.0)],
        );
        assert_eq!(out.eps[0], Some(4.0));
    }

    #[test]
    fn test_both_operands_missing_stays_missing() {
        let out = reconcile_series(
            &[None, Some(2.0)],
            &[None, Some(100.0)],
            &[None, Some(50.0)],
            &[Some(1000.0), Some(1000.0)],
        );
        assert_eq!(out.eps[0], None);
        assert!(out.reconstructed.is_empty());
    }

    #[test]
    fn test_oldest_quarter_has_no_fallback() {
        let out = reconcile_series(
            &[Some(1.0), None],
            &[Some(10.0), Some(100.0)],
            &[Some(10.0), None],
            &[Some(100.0), Some(100.0)],
        );
        assert_eq!(out.eps[1], None);
    }

    #[test]
    fn test_zero_shares_treated_as_missing() {
        let out = reconcile_series(
            &[None, Some(1.0)],
            &[Some(100.0), Some(100.0)],
            &[Some(0.0), Some(20.0)],
            &[Some(100.0), Some(100.0)],
        );
        assert_eq!(out.eps[0], Some(5.0));
    }

    #[test]
    fn test_net_margin_guards_zero_revenue() {
        let out = reconcile_series(
            &[Some(1.0), Some(1.0), Some(1.0)],
            &[Some(25.0), Some(10.0), None],
            &[Some(10.0); 3],
            &[Some(100.0), Some(0.0), Some(50.0)],
        );
        assert_relative_eq!(out.net_margin[0].unwrap(), 0.25);
        assert_eq!(out.net_margin[1], None);
        assert_eq!(out.net_margin[2], None);
    }

    #[test]
    fn test_reconcile_table() {
        let mut t = table(5);
        t.basic_eps = Some(vec![None, Some(1.0), Some(0.9), Some(0.8), Some(0.7)]);
        t.net_income = Some(vec![Some(20.0), Some(10.0), Some(9.0), Some(8.0), Some(7.0)]);

        let out = reconcile(&t, MIN_QUARTERS).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(out.eps[0], Some(2.0));
        assert_relative_eq!(out.net_margin[0].unwrap(), 0.2);
    }

    #[test]
    fn test_reconcile_pads_short_line_items() {
        let mut t = table(4);
        t.total_revenue = Some(vec![Some(100.0), Some(90.0)]);

        let out = reconcile(&t, MIN_QUARTERS).unwrap();
        assert_eq!(out.revenue, vec![Some(100.0), Some(90.0), None, None]);
    }

    #[test]
    fn test_reconcile_treats_nan_as_missing() {
        let mut t = table(4);
        t.basic_eps = Some(vec![Some(f64::NAN), Some(1.0), Some(1.0), Some(1.0)]);

        let out = reconcile(&t, MIN_QUARTERS).unwrap();
        assert_eq!(out.eps[0], Some(1.0));
        assert_eq!(out.reconstructed, vec![0]);
    }

    #[test]
    fn test_missing_line_items() {
        for item in [LineItem::BasicEps, LineItem::TotalRevenue, LineItem::NetIncome] {
            let mut t = table(6);
            match item {
                LineItem::BasicEps => t.basic_eps = None,
                LineItem::TotalRevenue => t.total_revenue = None,
                LineItem::NetIncome => t.net_income = None,
                LineItem::BasicAverageShares => unreachable!(),
            }
            let err = reconcile(&t, MIN_QUARTERS).unwrap_err();
            assert!(
                matches!(err, MetricsError::MissingSeries { line_item } if line_item == item)
            );
        }
    }

    #[test]
    fn test_missing_shares_is_not_fatal() {
        let mut t = table(4);
        t.basic_average_shares = None;
        t.basic_eps = Some(vec![None, Some(1.0), Some(1.0), Some(1.0)]);

        let out = reconcile(&t, MIN_QUARTERS).unwrap();
        assert_eq!(out.eps[0], None);
    }

    #[test]
    fn test_truncate_keeps_newest() {
        let mut t = table(6);
        t.basic_eps = Some(vec![Some(1.0), Some(0.9), Some(0.8), Some(0.7), None, Some(0.5)]);

        let mut out = reconcile(&t, MIN_QUARTERS).unwrap();
        assert_eq!(out.reconstructed, vec![4]);
        out.truncate(4);
        assert_eq!(out.len(), 4);
        assert_eq!(out.eps[0], Some(1.0));
        assert!(out.reconstructed.is_empty());
    }

    #[test]
    fn test_short_quarter_history() {
        let err = reconcile(&table(3), MIN_QUARTERS).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::ShortQuarterHistory {
                found: 3,
                required: 4
            }
        ));
    }
}

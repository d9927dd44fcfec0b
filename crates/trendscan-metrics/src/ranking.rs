//! Cross-sectional ranking
//!
//! Assigns max-rank percentiles to relative-strength scores across the whole
//! run and within each sector and industry. A percentile is the share of the
//! group scoring at or below the entry, so ties share the highest rank of
//! their tie group.

use crate::error::MetricsError;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

const SCORE: &str = "relative_strength";
const SECTOR: &str = "sector";
const INDUSTRY: &str = "industry";

/// One scored ticker to rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    /// Relative-strength score
    pub relative_strength: f64,
    /// Sector label; empty when unknown
    pub sector: String,
    /// Industry label; empty when unknown
    pub industry: String,
}

impl RankEntry {
    /// Create a new entry.
    pub fn new(relative_strength: f64, sector: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            relative_strength,
            sector: sector.into(),
            industry: industry.into(),
        }
    }
}

/// Percentiles for one entry, each in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    /// Within the whole run
    pub market: f64,
    /// Within the entry's sector; `None` for an empty label
    pub sector: Option<f64>,
    /// Within the entry's industry; `None` for an empty label
    pub industry: Option<f64>,
}

/// Rank every entry; the output is aligned with the input.
///
/// This is a batch operation: call it once, after every score in the run is
/// final. Ranking the same entries again gives the same percentiles.
pub fn rank_percentiles(entries: &[RankEntry]) -> Result<Vec<Percentiles>, MetricsError> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let scores: Vec<f64> = entries.iter().map(|e| e.relative_strength).collect();
    let sectors: Vec<&str> = entries.iter().map(|e| e.sector.trim()).collect();
    let industries: Vec<&str> = entries.iter().map(|e| e.industry.trim()).collect();

    let df = DataFrame::new(vec![
        Column::new(SCORE.into(), scores),
        Column::new(SECTOR.into(), sectors),
        Column::new(INDUSTRY.into(), industries),
    ])?;

    let ranked = df
        .lazy()
        .with_columns([
            max_rank_percentile(None).alias("market"),
            max_rank_percentile(Some(SECTOR)).alias("sector_pct"),
            max_rank_percentile(Some(INDUSTRY)).alias("industry_pct"),
        ])
        .collect()?;

    let market = ranked.column("market")?.as_materialized_series().f64()?;
    let sector = ranked.column("sector_pct")?.as_materialized_series().f64()?;
    let industry = ranked
        .column("industry_pct")?
        .as_materialized_series()
        .f64()?;

    Ok(market
        .into_iter()
        .zip(sector)
        .zip(industry)
        .map(|((market, sector), industry)| Percentiles {
            market: market.unwrap_or(f64::NAN),
            sector,
            industry,
        })
        .collect())
}

/// Max-rank divided by group size, optionally partitioned by a label column.
///
/// Rows with an empty label get null instead of a grouped percentile.
fn max_rank_percentile(group: Option<&str>) -> Expr {
    let rank = col(SCORE)
        .rank(
            RankOptions {
                method: RankMethod::Max,
                descending: false,
            },
            None,
        )
        .cast(DataType::Float64);
    let size = col(SCORE).count().cast(DataType::Float64);

    match group {
        None => rank / size,
        Some(label) => when(col(label).eq(lit("")))
            .then(lit(NULL).cast(DataType::Float64))
            .otherwise((rank / size).over([col(label)])),
    }
}

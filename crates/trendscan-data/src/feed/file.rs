//! Ticker universe from a CSV file.
//!
//! Accepts any CSV with a header row containing a `symbol` column; `name`,
//! `sector`, `industry` and `cik` are optional. Header matching ignores case, so the
//! NASDAQ screener download (`Symbol,Name,...,Sector,Industry`) works as-is.

use super::{TickerFeed, sanitize_universe};
use crate::error::{DataError, Result};
use crate::model::TickerIdentity;
use std::io::Read;
use std::path::PathBuf;

/// Reads the universe from a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvTickerFeed {
    path: PathBuf,
}

impl CsvTickerFeed {
    /// Create a feed reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse identities from CSV content.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TickerIdentity>> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.to_ascii_lowercase())
            .collect();
        let position = |name: &str| headers.iter().position(|h| h == name);

        let symbol_idx = position("symbol")
            .ok_or_else(|| DataError::Parse("ticker CSV has no 'symbol' column".to_string()))?;
        let name_idx = position("name");
        let sector_idx = position("sector");
        let industry_idx = position("industry");
        let cik_idx = position("cik");

        let mut identities = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let field = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .unwrap_or_default()
                    .to_string()
            };
            identities.push(TickerIdentity {
                symbol: field(Some(symbol_idx)),
                name: field(name_idx),
                sector: field(sector_idx),
                industry: field(industry_idx),
                cik: field(cik_idx).parse().ok(),
            });
        }

        Ok(sanitize_universe(identities))
    }
}

impl TickerFeed for CsvTickerFeed {
    async fn fetch_universe(&self) -> Result<Vec<TickerIdentity>> {
        let content = tokio::fs::read(&self.path).await?;
        Self::parse(content.as_slice())
    }
}

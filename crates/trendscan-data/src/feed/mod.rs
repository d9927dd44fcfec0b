//! Ticker feeds: where the investable universe comes from.
//!
//! Every feed returns [`TickerIdentity`] records in feed order. Symbols are
//! normalised and de-duplicated by [`sanitize_universe`] so that each symbol
//! appears at most once per run.

pub mod file;
pub mod nasdaq;
pub mod sec;

pub use file::CsvTickerFeed;
pub use nasdaq::NasdaqTickerFeed;
pub use sec::SecTickerFeed;

use crate::error::Result;
use crate::model::TickerIdentity;
use std::collections::HashSet;
use std::future::Future;

/// Producer of the ordered ticker universe.
pub trait TickerFeed: Send + Sync {
    /// Fetch the universe. Failure here is fatal for a screening run.
    fn fetch_universe(&self) -> impl Future<Output = Result<Vec<TickerIdentity>>> + Send;
}

/// Normalise a raw symbol: trims and upper-cases it, and rejects blanks and
/// share classes the price provider cannot quote (`^` preferreds, `/` units).
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() || symbol.contains('^') || symbol.contains('/') {
        return None;
    }
    Some(symbol)
}

/// Normalise symbols, trim labels and drop repeated symbols (first wins).
pub fn sanitize_universe(identities: Vec<TickerIdentity>) -> Vec<TickerIdentity> {
    let mut seen = HashSet::new();
    identities
        .into_iter()
        .filter_map(|identity| {
            let symbol = normalize_symbol(&identity.symbol)?;
            if !seen.insert(symbol.clone()) {
                return None;
            }
            Some(TickerIdentity {
                symbol,
                name: identity.name.trim().to_string(),
                sector: identity.sector.trim().to_string(),
                industry: identity.industry.trim().to_string(),
                cik: identity.cik,
            })
        })
        .collect()
}

/// Fixed in-memory universe.
#[derive(Debug, Clone, Default)]
pub struct StaticTickerFeed {
    identities: Vec<TickerIdentity>,
}

impl StaticTickerFeed {
    /// Create a feed over the given identities.
    pub const fn new(identities: Vec<TickerIdentity>) -> Self {
        Self { identities }
    }

    /// Create a feed from bare symbols with empty labels.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Self {
        Self::new(
            symbols
                .iter()
                .map(|s| TickerIdentity::new(s.as_ref(), "", "", ""))
                .collect(),
        )
    }
}

impl TickerFeed for StaticTickerFeed {
    async fn fetch_universe(&self) -> Result<Vec<TickerIdentity>> {
        Ok(sanitize_universe(self.identities.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(" aapl ", Some("AAPL"))]
    #[case("BRK.B", Some("BRK.B"))]
    #[case("ABR^D", None)]
    #[case("ACAH/U", None)]
    #[case("   ", None)]
    fn test_normalize_symbol(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_symbol(raw).as_deref(), expected);
    }

    #[test]
    fn test_sanitize_keeps_first_duplicate() {
        let universe = sanitize_universe(vec![
            TickerIdentity::new("msft", " Microsoft ", "Technology", "Software"),
            TickerIdentity::new("AAPL", "Apple", "Technology", "Hardware"),
            TickerIdentity::new("MSFT", "Duplicate", "", ""),
        ]);

        assert_eq!(universe.len(), 2);
        assert_eq!(universe[0].symbol, "MSFT");
        assert_eq!(universe[0].name, "Microsoft");
        assert_eq!(universe[1].symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_static_feed() {
        let feed = StaticTickerFeed::from_symbols(&["nvda", "amd", "NVDA"]);
        let universe = feed.fetch_universe().await.unwrap();
        let symbols: Vec<_> = universe.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["NVDA", "AMD"]);
    }
}

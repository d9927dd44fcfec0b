#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/trendscan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod feed;
pub mod model;
pub mod provider;
pub mod yahoo;

pub use error::{DataError, Result};
pub use feed::{CsvTickerFeed, NasdaqTickerFeed, SecTickerFeed, StaticTickerFeed, TickerFeed};
pub use model::{CompanyProfile, LineItem, PriceBar, QuarterlyFundamentals, TickerIdentity};
pub use provider::MarketDataProvider;
pub use yahoo::{YahooConfig, YahooProvider};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

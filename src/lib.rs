//! Crawl Valorant esports data from vlr.gg into DuckDB.
//!
//! The [`Crawler`] walks tour → split → match list → match pages through a
//! [`PageSource`] (normally a [`VlrClient`]) and writes teams, players,
//! splits, matches, games and per-player statistics into a [`Store`].
//! Processed matches can additionally be mirrored as JSON documents into a
//! [`DocumentStore`].

pub use crate::client::VlrClient;
pub use crate::config::AppConfig;
pub use crate::crawl::{CrawlStats, Crawler, Visit};
pub use crate::error::{IngestError, Result};
pub use crate::scraper::PageSource;
pub use crate::store::documents::DocumentStore;
pub use crate::store::{Store, TableCounts, Upserted};

mod client;
pub mod config;
mod crawl;
mod error;
pub mod ids;
pub mod model;
pub mod normalize;
mod scraper;
mod store;

#[cfg(test)]
mod testing;

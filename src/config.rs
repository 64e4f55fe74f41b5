use std::env;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Name of the variable that points at the relational store.
pub const DATABASE_URL: &str = "DATABASE_URL";
/// Name of the variable that points at the match document directory.
pub const DOCUMENT_STORE_URL: &str = "DOCUMENT_STORE_URL";

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// DuckDB database path, required for anything touching the store.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Directory for JSON match documents; documents are skipped when unset.
    #[serde(default)]
    pub document_store_url: Option<String>,

    #[serde(default)]
    pub scraper: ScraperConfig,

    #[serde(default)]
    pub crawl: CrawlConfig,
}

/// HTTP fetching configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Pause before every request.
    #[serde(default)]
    pub request_delay_ms: u64,
}

/// Traversal configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlConfig {
    /// Tour paths the crawl starts from.
    #[serde(default = "default_tours")]
    pub tours: Vec<String>,

    /// `/stats` leaderboard paths for the `crawl-players` command.
    #[serde(default)]
    pub leaderboards: Vec<String>,
}

fn default_base_url() -> String {
    "https://www.vlr.gg".to_string()
}
fn default_user_agent() -> String {
    concat!("vlr-ingest/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_tours() -> Vec<String> {
    ["/vct-2024", "/gc-2024", "/vcl-2024"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_delay_ms: 0,
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            tours: default_tours(),
            leaderboards: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env`, `config/default.toml`,
    /// `config/local.toml` and `VLR__*` environment overrides.
    ///
    /// `DATABASE_URL` and `DOCUMENT_STORE_URL` are read from the process
    /// environment and take precedence over the files.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let builder = config::Config::builder()
            .add_source(
                File::with_name("config/default")
                    .required(false)
                    .format(FileFormat::Toml),
            )
            .add_source(
                File::with_name("config/local")
                    .required(false)
                    .format(FileFormat::Toml),
            )
            .add_source(Environment::with_prefix("VLR").separator("__"));

        Self::build(
            builder,
            env::var(DATABASE_URL).ok(),
            env::var(DOCUMENT_STORE_URL).ok(),
        )
    }

    fn build(
        builder: ConfigBuilder<DefaultState>,
        database_url: Option<String>,
        document_store_url: Option<String>,
    ) -> Result<Self> {
        let cfg = builder
            .set_override_option("database_url", database_url.filter(|v| !v.is_empty()))?
            .set_override_option(
                "document_store_url",
                document_store_url.filter(|v| !v.is_empty()),
            )?
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// The database location, or [`IngestError::MissingConfig`] when unset.
    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(IngestError::MissingConfig(DATABASE_URL))
    }
}

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;
use url::Url;

use crate::config::ScraperConfig;
use crate::error::{IngestError, Result};
use crate::scraper::{self, PageSource};

const DEFAULT_BASE_URL: &str = "https://www.vlr.gg";

/// Fetches pages from VLR.gg.
///
/// `VlrClient` wraps a [`reqwest::Client`] and resolves site paths such as
/// `/event/2004/slug` against a base URL.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> vlr_ingest::Result<()> {
/// use vlr_ingest::{PageSource, VlrClient};
///
/// let client = VlrClient::new();
/// let html = client.fetch_page("/vct-2024").await?;
/// println!("fetched {} bytes", html.len());
/// # Ok(())
/// # }
/// ```
pub struct VlrClient {
    http: reqwest::Client,
    base_url: String,
    request_delay: Duration,
}

impl VlrClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            http: client,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: Duration::ZERO,
        }
    }

    /// Create a client from the `[scraper]` configuration section.
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|e| IngestError::InvalidUrl {
            url: config.base_url.clone(),
            source: e,
        })?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| IngestError::Http {
                url: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            request_delay: Duration::from_millis(config.request_delay_ms),
        })
    }

    /// Absolute URL of a site path.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join(path))
            .map_err(|e| IngestError::InvalidUrl {
                url: path.to_owned(),
                source: e,
            })
    }
}

impl Default for VlrClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageSource for VlrClient {
    #[instrument(skip(self))]
    async fn fetch_page(&self, path: &str) -> Result<String> {
        let url = self.url_for(path)?;
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
        scraper::get_text(&self.http, url.as_str()).await
    }
}

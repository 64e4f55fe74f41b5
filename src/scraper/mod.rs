pub(crate) mod match_detail;
pub(crate) mod matchlist;
pub(crate) mod player;
pub(crate) mod split;
pub(crate) mod stats;
pub(crate) mod team;
pub(crate) mod tournament;

pub(crate) use ::scraper::Html;
use ::scraper::{ElementRef, Selector};
use async_trait::async_trait;
use itertools::Itertools;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Anything that can serve the HTML behind a site path.
///
/// [`crate::VlrClient`] fetches from vlr.gg; tests serve fixed pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the HTML body behind a site path such as `/event/2004/slug`.
    async fn fetch_page(&self, path: &str) -> Result<String>;
}

/// Fetch a URL and return the response body.
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    debug!(url, "fetching page");

    let response = client.get(url).send().await.map_err(|e| IngestError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(IngestError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    response.text().await.map_err(|e| IngestError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })
}

/// Extract trimmed text content from the first element matching `selector`
/// inside `element`. Returns an empty string if nothing matches.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .and_then(|d| d.text().map(|t| t.trim()).find(|t| !t.is_empty()))
        .unwrap_or_default()
        .trim()
        .replace(['\n', '\t'], "")
        .to_string()
}

/// All text of the first element matching `selector`, whitespace collapsed
/// to single spaces. Returns an empty string if nothing matches.
pub(crate) fn select_collapsed_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|e| collapse_whitespace(&e.text().join(" ")))
        .unwrap_or_default()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.replace('\u{a0}', " ").split_whitespace().join(" ")
}

/// Value of `attr` on the first element matching `selector`.
pub(crate) fn select_attr(element: &ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Distinct `href` values of every element matching `selector`, in page order.
pub(crate) fn select_hrefs(element: &ElementRef, selector: &Selector) -> Vec<String> {
    element
        .select(selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .unique()
        .collect()
}

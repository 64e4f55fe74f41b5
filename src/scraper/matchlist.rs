use ::scraper::Selector;
use tracing::{debug, warn};

use crate::error::Result;
use crate::ids;
use crate::model::SplitMatchList;
use crate::scraper::{select_hrefs, Html};

/// Site path of a split's match list when the page does not link it.
pub(crate) fn default_matches_path(split_id: u32) -> String {
    format!("/event/matches/{split_id}")
}

/// Extract the match links of a split's match list page.
pub(crate) fn parse_matches(document: &Html) -> Result<SplitMatchList> {
    let selector = Selector::parse("a.match-item")?;
    let (matches, unparsable): (Vec<String>, Vec<String>) =
        select_hrefs(&document.root_element(), &selector)
            .into_iter()
            .partition(|href| ids::match_id(href).is_some());

    for href in &unparsable {
        warn!(href, "skipping match link without an id");
    }
    debug!(count = matches.len(), "parsed match list");
    Ok(matches)
}

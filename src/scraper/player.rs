use ::scraper::Selector;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::ids;
use crate::model::PlayerPage;
use crate::scraper::{collapse_whitespace, select_attr, select_text, Html};

/// Extract the bio of a player profile page.
pub(crate) fn parse_player(document: &Html) -> Result<PlayerPage> {
    let header_selector = Selector::parse("div.player-header")?;
    let header = document
        .select(&header_selector)
        .next()
        .ok_or(IngestError::ElementNotFound {
            context: "player header",
        })?;

    let name_selector = Selector::parse("h1.wf-title")?;
    let name = select_text(&header, &name_selector);

    let real_name_selector = Selector::parse("h2.player-real-name")?;
    let real_name = Some(select_text(&header, &real_name_selector)).filter(|n| !n.is_empty());

    let avatar_selector = Selector::parse("img")?;
    let avatar_asset_id = select_attr(&header, &avatar_selector, "src")
        .map(|src| ids::asset_id(&src))
        .unwrap_or_default();

    // The country sits in the last light-text block next to the flag.
    let country_selector = Selector::parse("div.ge-text-light")?;
    let region = header
        .select(&country_selector)
        .map(|e| collapse_whitespace(&e.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .last()
        .unwrap_or_default();

    debug!(name, region, "parsed player page");

    Ok(PlayerPage {
        name,
        real_name,
        region,
        avatar_asset_id,
    })
}

use ::scraper::Selector;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::ids;
use crate::model::TeamPage;
use crate::scraper::{select_attr, select_collapsed_text, select_text, Html};

/// Extract name, region and logo of a team profile page.
pub(crate) fn parse_team(document: &Html) -> Result<TeamPage> {
    let header_selector = Selector::parse("div.team-header")?;
    let header = document
        .select(&header_selector)
        .next()
        .ok_or(IngestError::ElementNotFound {
            context: "team header",
        })?;

    let name_selector = Selector::parse("h1.wf-title")?;
    let name = select_text(&header, &name_selector);

    let country_selector = Selector::parse("div.team-header-country")?;
    let region = select_collapsed_text(&header, &country_selector);

    let logo_selector = Selector::parse("div.team-header-logo img")?;
    let logo_asset_id = select_attr(&header, &logo_selector, "src")
        .map(|src| ids::asset_id(&src))
        .unwrap_or_default();

    debug!(name, region, "parsed team page");

    Ok(TeamPage {
        name,
        region,
        logo_asset_id,
    })
}

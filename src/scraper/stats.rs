use ::scraper::Selector;
use itertools::Itertools;
use tracing::{debug, warn};

use crate::error::Result;
use crate::ids;
use crate::model::LeaderboardEntry;
use crate::scraper::{select_attr, select_text, Html};

/// Extract the player links of a `/stats` leaderboard table, first
/// occurrence of each link kept.
pub(crate) fn parse_leaderboard(document: &Html) -> Result<Vec<LeaderboardEntry>> {
    let row_selector = Selector::parse("div.wf-card.mod-table tbody tr")?;
    let link_selector = Selector::parse("td.mod-player a")?;
    let name_selector = Selector::parse("div.text-of")?;

    let (entries, unparsable): (Vec<LeaderboardEntry>, Vec<LeaderboardEntry>) = document
        .select(&row_selector)
        .filter_map(|row| {
            let href = select_attr(&row, &link_selector, "href")?;
            Some(LeaderboardEntry {
                href,
                name: select_text(&row, &name_selector),
            })
        })
        .unique_by(|entry| entry.href.clone())
        .partition(|entry| ids::player_id(&entry.href).is_some());

    for entry in &unparsable {
        warn!(href = entry.href, "skipping leaderboard row without a player id");
    }
    debug!(count = entries.len(), "parsed leaderboard");
    Ok(entries)
}

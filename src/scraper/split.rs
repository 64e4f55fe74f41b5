use ::scraper::Selector;
use tracing::debug;

use crate::error::Result;
use crate::model::{ParentRegion, SplitPage};
use crate::normalize::{parse_date_range, parse_prize_pool};
use crate::scraper::{select_collapsed_text, select_hrefs, select_text, Html};

/// Extract split metadata, the team roster and the match list link.
pub(crate) fn parse_split(document: &Html) -> Result<SplitPage> {
    let root = document.root_element();

    let title_selector = Selector::parse("div.event-header h1.wf-title")?;
    let name = select_text(&root, &title_selector);

    let item_selector = Selector::parse("div.event-desc-item")?;
    let label_selector = Selector::parse("div.event-desc-item-label")?;
    let value_selector = Selector::parse("div.event-desc-item-value")?;

    let mut dates = String::new();
    let mut prize = String::new();
    let mut location = String::new();
    for item in root.select(&item_selector) {
        let label = select_text(&item, &label_selector).to_lowercase();
        let value = select_collapsed_text(&item, &value_selector);
        if label.contains("date") {
            dates = value;
        } else if label.contains("prize") {
            prize = value;
        } else if label.contains("location") {
            location = value;
        }
    }
    let (start_date, end_date) = parse_date_range(&dates);

    let team_selector = Selector::parse("div.event-team a.event-team-name")?;
    let team_links = select_hrefs(&root, &team_selector);

    let matches_selector = Selector::parse("a.wf-nav-item[href^=\"/event/matches/\"]")?;
    let matches_link = select_hrefs(&root, &matches_selector).into_iter().next();

    debug!(
        name,
        teams = team_links.len(),
        has_matches_link = matches_link.is_some(),
        "parsed split page"
    );

    Ok(SplitPage {
        parent_region: ParentRegion::from_split_name(&name),
        name,
        start_date,
        end_date,
        prize_pool: parse_prize_pool(&prize),
        location: Some(location).filter(|l| !l.is_empty()),
        team_links,
        matches_link,
    })
}

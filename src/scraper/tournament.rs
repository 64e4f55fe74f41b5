use ::scraper::Selector;
use tracing::debug;

use crate::error::Result;
use crate::model::TournamentPage;
use crate::scraper::{select_hrefs, select_text, Html};

/// Extract the tour name and the links of its splits.
pub(crate) fn parse_tournament(document: &Html) -> Result<TournamentPage> {
    let root = document.root_element();

    let title_selector = Selector::parse("div.event-header .wf-title")?;
    let name = select_text(&root, &title_selector);

    let split_selector = Selector::parse("a.event-item")?;
    let split_links = select_hrefs(&root, &split_selector);

    debug!(name, splits = split_links.len(), "parsed tour page");

    Ok(TournamentPage { name, split_links })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_parse_tournament() {
        let html = testing::tour_page(
            "Champions Tour 2024",
            &["/event/2004/vct-2024-americas-stage-1", "/event/1998/vct-2024-emea-stage-1"],
        );
        let page = parse_tournament(&Html::parse_document(&html)).unwrap();
        assert_eq!(page.name, "Champions Tour 2024");
        assert_eq!(
            page.split_links,
            vec![
                "/event/2004/vct-2024-americas-stage-1".to_string(),
                "/event/1998/vct-2024-emea-stage-1".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_tournament_without_splits() {
        let page = parse_tournament(&Html::parse_document("<html><body></body></html>")).unwrap();
        assert!(page.name.is_empty());
        assert!(page.split_links.is_empty());
    }
}

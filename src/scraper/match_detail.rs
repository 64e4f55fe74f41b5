use ::scraper::{ElementRef, Selector};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::model::{GameSection, MatchPage, PlayerRow, PlayerStats, SideStat};
use crate::normalize::{element_text, normalize_map_name, parse_epoch, parse_side_stat};
use crate::scraper::{select_attr, select_hrefs, select_text, Html};

// Positions of the side-aware columns among a row's `td.mod-stat` cells:
// rating, ACS, K, D, A, +/-, KAST, ADR, HS%, FK, FD, FK +/-.
const ACS_COLUMN: usize = 1;
const KILLS_COLUMN: usize = 2;
const DEATHS_COLUMN: usize = 3;
const ASSISTS_COLUMN: usize = 4;
const KAST_COLUMN: usize = 6;
const ADR_COLUMN: usize = 7;
const HS_COLUMN: usize = 8;
const FIRST_KILLS_COLUMN: usize = 9;
const FIRST_DEATHS_COLUMN: usize = 10;

/// Extract header, games and scoreboards of a match page.
pub(crate) fn parse_match(id: u32, document: &Html) -> Result<MatchPage> {
    let root = document.root_element();

    let date_selector = Selector::parse("div.match-header-date div.moment-tz-convert")?;
    let date_played =
        select_attr(&root, &date_selector, "data-utc-ts").and_then(|ts| parse_epoch(&ts));

    let team_links_selector = Selector::parse("div.match-header-vs a.match-header-link")?;
    let team_links = select_hrefs(&root, &team_links_selector);

    let games_selector = Selector::parse("div.vm-stats-game:not([data-game-id='all'])")?;
    let games = root
        .select(&games_selector)
        .map(|g| parse_game(&g))
        .collect::<Result<Vec<_>>>()?;

    debug!(id, games = games.len(), "parsed match page");

    Ok(MatchPage {
        id,
        date_played,
        team_links,
        games,
    })
}

fn parse_game(game: &ElementRef) -> Result<GameSection> {
    let game_id = game
        .value()
        .attr("data-game-id")
        .and_then(|id| id.trim().parse().ok());

    let map_selector = Selector::parse("div.vm-stats-game-header div.map span")?;
    let map_name = game
        .select(&map_selector)
        .next()
        .map(|e| normalize_map_name(&element_text(&e)))
        .unwrap_or_default();

    let table_selector = Selector::parse("table.wf-table-inset.mod-overview")?;
    let row_selector = Selector::parse("tbody tr")?;
    let player_cell_selector = Selector::parse("td.mod-player")?;
    let teams = game
        .select(&table_selector)
        .map(|table| {
            table
                .select(&row_selector)
                .filter(|row| row.select(&player_cell_selector).next().is_some())
                .map(|row| parse_player_row(&row))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(GameSection {
        game_id,
        map_name,
        teams,
    })
}

fn parse_player_row(row: &ElementRef) -> Result<PlayerRow> {
    let name_column_selector = Selector::parse("td.mod-player")?;
    let name_column = row
        .select(&name_column_selector)
        .next()
        .ok_or(IngestError::ElementNotFound {
            context: "player name column (td.mod-player)",
        })?;

    let a_tag_selector = Selector::parse("a")?;
    let href = select_attr(&name_column, &a_tag_selector, "href").unwrap_or_default();

    let name_selector = Selector::parse("div.text-of")?;
    let name = select_text(&name_column, &name_selector);

    let agent_selector = Selector::parse("td.mod-agents img")?;
    let agent = select_attr(row, &agent_selector, "title")
        .or_else(|| select_attr(row, &agent_selector, "alt"))
        .unwrap_or_default();

    let stat_selector = Selector::parse("td.mod-stat")?;
    let cells = row
        .select(&stat_selector)
        .map(|cell| parse_side_stat(&cell))
        .collect::<Result<Vec<_>>>()?;

    Ok(PlayerRow {
        href,
        name,
        agent,
        stats: player_stats(&cells),
    })
}

fn player_stats(cells: &[(SideStat, bool)]) -> PlayerStats {
    let column = |index: usize| cells.get(index).map(|(stat, _)| *stat).unwrap_or_default();

    PlayerStats {
        side_data: cells.iter().any(|(_, has_sides)| *has_sides),
        kills: column(KILLS_COLUMN),
        deaths: column(DEATHS_COLUMN),
        assists: column(ASSISTS_COLUMN),
        acs: column(ACS_COLUMN),
        kast: column(KAST_COLUMN),
        adr: column(ADR_COLUMN),
        hs_pct: column(HS_COLUMN),
        first_kills: column(FIRST_KILLS_COLUMN),
        first_deaths: column(FIRST_DEATHS_COLUMN),
    }
}

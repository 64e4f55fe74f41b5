//! Synthetic vlr.gg pages and an in-memory page source for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use itertools::Itertools;

use crate::error::{IngestError, Result};
use crate::scraper::PageSource;

const STAT_COLUMNS: usize = 12;
const KILLS_COLUMN: usize = 2;

pub(crate) fn tour_page(name: &str, split_links: &[&str]) -> String {
    let items = split_links
        .iter()
        .map(|href| format!(r#"<a class="wf-card mod-flex event-item" href="{href}"><div class="event-item-title">{href}</div></a>"#))
        .join("\n");
    format!(
        r#"<html><body>
<div class="event-header"><div class="wf-title">{name}</div></div>
<div class="events-container">{items}</div>
</body></html>"#
    )
}

pub(crate) fn split_page(
    name: &str,
    dates: &str,
    prize: &str,
    location: &str,
    team_links: &[&str],
    matches_link: Option<&str>,
) -> String {
    let teams = team_links
        .iter()
        .map(|href| {
            format!(r#"<div class="wf-card event-team"><a class="event-team-name" href="{href}">{href}</a></div>"#)
        })
        .join("\n");
    let matches_nav = matches_link
        .map(|href| format!(r#"<a class="wf-nav-item" href="{href}"><div class="wf-nav-item-title">Matches</div></a>"#))
        .unwrap_or_default();
    format!(
        r#"<html><body>
<div class="event-header">
  <div class="event-desc">
    <h1 class="wf-title">{name}</h1>
    <div class="event-desc-items">
      <div class="event-desc-item"><div class="event-desc-item-label">Dates</div><div class="event-desc-item-value">{dates}</div></div>
      <div class="event-desc-item"><div class="event-desc-item-label">Prize pool</div><div class="event-desc-item-value">{prize}</div></div>
      <div class="event-desc-item"><div class="event-desc-item-label">Location</div><div class="event-desc-item-value"><i class="flag mod-us"></i>
        {location}</div></div>
    </div>
  </div>
</div>
<div class="wf-nav">
  <a class="wf-nav-item mod-active" href="/event/0/overview"><div class="wf-nav-item-title">Overview</div></a>
  {matches_nav}
</div>
<div class="event-teams-container">{teams}</div>
</body></html>"#
    )
}

pub(crate) fn match_list_page(match_links: &[&str]) -> String {
    let items = match_links
        .iter()
        .map(|href| format!(r#"<a class="wf-module-item match-item" href="{href}"><div class="match-item-time">3:00 PM</div></a>"#))
        .join("\n");
    format!(r#"<html><body><div class="wf-card">{items}</div></body></html>"#)
}

pub(crate) fn stats_page(players: &[(&str, &str)]) -> String {
    let rows = players
        .iter()
        .map(|(href, name)| {
            format!(
                r#"<tr><td class="mod-player mod-a"><a href="{href}"><div class="text-of">{name}</div><div class="stats-player-country">TM</div></a></td><td class="mod-color-sq"><div class="color-sq"><span>1.10</span></div></td></tr>"#
            )
        })
        .join("\n");
    format!(
        r#"<html><body>
<div class="wf-card mod-table mod-dark"><table class="wf-table mod-stats mod-scroll"><thead><tr><th>Player</th><th>R</th></tr></thead><tbody>{rows}</tbody></table></div>
</body></html>"#
    )
}

/// One scoreboard row of a match page.
pub(crate) struct PlayerFixture {
    pub id: u32,
    pub agent: &'static str,
    pub cells: Vec<String>,
    /// Replaces the generated `/player/<id>/player-<id>` link.
    pub link: Option<&'static str>,
}

impl PlayerFixture {
    pub fn href(&self) -> String {
        match self.link {
            Some(link) => link.to_string(),
            None => format!("/player/{}/player-{}", self.id, self.id),
        }
    }

    /// A row whose player link is `link` instead of a profile URL.
    pub fn linked(mut self, link: &'static str) -> Self {
        self.link = Some(link);
        self
    }

    /// Plain cells without attack/defense spans; `kills` is the raw kills cell.
    pub fn combined(id: u32, agent: &'static str, kills: &str) -> Self {
        let cells = (0..STAT_COLUMNS)
            .map(|column| {
                if column == KILLS_COLUMN {
                    kills.to_string()
                } else {
                    "1".to_string()
                }
            })
            .collect();
        Self {
            id,
            agent,
            cells,
            link: None,
        }
    }

    /// Every cell carries combined, attack and defense spans.
    pub fn sided(id: u32, agent: &'static str, (both, attack, defense): (&str, &str, &str)) -> Self {
        let cell = format!(
            r#"<span class="side mod-side mod-both">{both}</span><span class="side mod-side mod-t">{attack}</span><span class="side mod-side mod-ct">{defense}</span>"#
        );
        Self {
            id,
            agent,
            cells: vec![cell; STAT_COLUMNS],
            link: None,
        }
    }

    fn row(&self) -> String {
        let stats = self
            .cells
            .iter()
            .map(|cell| format!(r#"<td class="mod-stat">{cell}</td>"#))
            .join("");
        format!(
            r#"<tr><td class="mod-player"><div><a href="{href}"><div class="text-of">player-{id}</div><div class="ge-text-light">TM</div></a></div></td><td class="mod-agents"><div><span class="stats-sq mod-agent small"><img src="/img/vlr/game/agents/x.png" alt="{alt}" title="{agent}"></span></div></td>{stats}</tr>"#,
            href = self.href(),
            id = self.id,
            alt = self.agent.to_lowercase(),
            agent = self.agent,
        )
    }
}

/// One map section of a match page.
pub(crate) struct GameFixture {
    pub game_id: &'static str,
    pub map: &'static str,
    pub teams: [Vec<PlayerFixture>; 2],
}

impl GameFixture {
    fn section(&self, game_id: &str) -> String {
        let tables = self
            .teams
            .iter()
            .map(|players| {
                let rows = players.iter().map(PlayerFixture::row).join("\n");
                format!(
                    r#"<table class="wf-table-inset mod-overview"><thead><tr><th></th><th>R</th></tr></thead><tbody>{rows}</tbody></table>"#
                )
            })
            .join("\n");
        format!(
            r#"<div class="vm-stats-game" data-game-id="{game_id}">
  <div class="vm-stats-game-header"><div class="map"><div><span>{map}</span></div></div></div>
  {tables}
</div>"#,
            map = self.map,
        )
    }
}

pub(crate) fn match_page(utc_ts: &str, team_links: &[&str], games: &[GameFixture]) -> String {
    let teams = team_links
        .iter()
        .map(|href| format!(r#"<a class="match-header-link" href="{href}"><div class="wf-title-med">{href}</div></a>"#))
        .join(r#"<div class="match-header-vs-score"></div>"#);
    // vlr.gg prefixes the per-map sections with an aggregate one.
    let overview = games
        .first()
        .map(|game| game.section("all"))
        .unwrap_or_default();
    let sections = games
        .iter()
        .map(|game| game.section(game.game_id))
        .join("\n");
    format!(
        r#"<html><body>
<div class="match-header">
  <div class="match-header-date"><div class="moment-tz-convert" data-utc-ts="{utc_ts}" data-moment-format="dddd, MMMM Do">Saturday, April 13th</div></div>
  <div class="match-header-vs">{teams}</div>
</div>
<div class="vm-stats">
{overview}
{sections}
</div>
</body></html>"#
    )
}

pub(crate) fn team_page(name: &str, country: &str, logo_src: &str) -> String {
    format!(
        r#"<html><body>
<div class="wf-card mod-header team-header">
  <div class="wf-avatar team-header-logo"><div><img src="{logo_src}" alt="{name} team logo"></div></div>
  <div class="team-header-desc">
    <div class="team-header-name"><h1 class="wf-title">{name}</h1></div>
    <div class="team-header-country"><i class="flag mod-us"></i>
      {country}</div>
  </div>
</div>
</body></html>"#
    )
}

pub(crate) fn player_page(name: &str, real_name: Option<&str>, country: &str, avatar_src: &str) -> String {
    let real_name = real_name
        .map(|n| format!(r#"<h2 class="player-real-name ge-text-light">{n}</h2>"#))
        .unwrap_or_default();
    format!(
        r#"<html><body>
<div class="wf-card mod-header mod-full player-header">
  <div class="wf-avatar mod-player"><div><img src="{avatar_src}" alt="{name}"></div></div>
  <div class="player-header-desc">
    <h1 class="wf-title">{name}</h1>
    {real_name}
    <div class="ge-text-light"><i class="flag mod-ca"></i>
      {country}</div>
  </div>
</div>
</body></html>"#
    )
}

/// Serves a fixed set of pages by path and records every request.
#[derive(Default)]
pub(crate) struct FixtureSource {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FixtureSource {
    pub fn with_page(mut self, path: impl Into<String>, html: String) -> Self {
        self.pages.insert(path.into(), html);
        self
    }

    /// Every path requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests().iter().filter(|p| *p == path).count()
    }
}

#[async_trait]
impl PageSource for FixtureSource {
    async fn fetch_page(&self, path: &str) -> Result<String> {
        self.requests.lock().unwrap().push(path.to_string());
        self.pages
            .get(path)
            .cloned()
            .ok_or_else(|| IngestError::UnexpectedStatus {
                url: path.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

use serde::Serialize;

use super::reference::{Agent, GameMap};

/// One statistic split by round side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SideStat {
    pub attack: f64,
    pub defense: f64,
    pub both: f64,
}

/// Normalized scoreboard line of one player in one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlayerStats {
    /// Whether the page published attack/defense values at all.
    pub side_data: bool,
    pub kills: SideStat,
    pub deaths: SideStat,
    pub assists: SideStat,
    pub acs: SideStat,
    pub kast: SideStat,
    pub adr: SideStat,
    pub hs_pct: SideStat,
    pub first_kills: SideStat,
    pub first_deaths: SideStat,
}

/// Fields extracted from a match page.
#[derive(Debug, Clone, Serialize)]
pub struct MatchPage {
    pub id: u32,
    pub date_played: Option<String>,
    pub team_links: Vec<String>,
    pub games: Vec<GameSection>,
}

/// One per-map section of a match page.
#[derive(Debug, Clone, Serialize)]
pub struct GameSection {
    pub game_id: Option<u32>,
    pub map_name: String,
    /// Scoreboard rows per team, in header order.
    pub teams: Vec<Vec<PlayerRow>>,
}

/// One scoreboard row of a game section.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRow {
    pub href: String,
    pub name: String,
    pub agent: String,
    pub stats: PlayerStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct Match {
    pub id: u32,
    pub split_id: u32,
    pub team1_id: u32,
    pub team2_id: u32,
    /// Epoch seconds, as published in the match header.
    pub date_played: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Game {
    pub id: u32,
    pub match_id: u32,
    pub map: GameMap,
}

#[derive(Debug, Clone, Serialize)]
pub struct GamePlayer {
    pub game_id: u32,
    pub player_id: u32,
    pub team_id: u32,
    pub agent: Agent,
    pub stats: PlayerStats,
}

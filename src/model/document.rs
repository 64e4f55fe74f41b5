use serde::Serialize;

use super::match_detail::GamePlayer;
use super::reference::GameMap;

/// Semi-structured mirror of one fully processed match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchDocument {
    pub document_id: String,
    pub match_id: u32,
    pub split_id: u32,
    pub date_played: Option<String>,
    pub team_ids: Vec<u32>,
    pub games: Vec<GameDocument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameDocument {
    pub game_id: u32,
    pub map: GameMap,
    pub players: Vec<GamePlayer>,
}

impl MatchDocument {
    /// Document key of a match: `game_<matchId>`.
    pub fn document_id(match_id: u32) -> String {
        format!("game_{match_id}")
    }
}

use serde::Serialize;

/// Bio fields extracted from a player profile page.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerPage {
    pub name: String,
    pub real_name: Option<String>,
    pub region: String,
    pub avatar_asset_id: String,
}

/// A player row, keyed by the id in its `/player/<id>/<slug>` URL.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub real_name: Option<String>,
    pub region_id: Option<i64>,
    pub avatar_asset_id: String,
}

/// One row of a `/stats` leaderboard: the player link and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub href: String,
    pub name: String,
}

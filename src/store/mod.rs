//! Relational storage of crawled entities in DuckDB.
//!
//! Every `get_or_create_*` looks the key up first and only inserts on a miss:
//! the first write of an entity wins and nothing is ever updated.

pub mod documents;

use std::path::Path;

use duckdb::{params, Connection, Params};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::{
    Agent, Game, GameMap, GamePlayer, Match, ParentRegion, Player, Team, TournamentSplit,
};

// ── Schema ────────────────────────────────────────────────────────────────────

const DDL: &str = r#"
CREATE SEQUENCE IF NOT EXISTS region_id_seq START 1;
CREATE SEQUENCE IF NOT EXISTS tour_id_seq START 1;

CREATE TABLE IF NOT EXISTS regions (
    region_id    BIGINT PRIMARY KEY DEFAULT nextval('region_id_seq'),
    region_name  VARCHAR NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS parent_regions (
    parent_region_id    INTEGER PRIMARY KEY,
    parent_region_name  VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS maps (
    map_id    INTEGER PRIMARY KEY,
    map_name  VARCHAR NOT NULL,
    active    BOOLEAN NOT NULL DEFAULT TRUE
);

CREATE TABLE IF NOT EXISTS agents (
    agent_id    INTEGER PRIMARY KEY,
    agent_name  VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS teams (
    team_id    BIGINT PRIMARY KEY,
    team_name  VARCHAR NOT NULL,
    region_id  BIGINT REFERENCES regions (region_id),
    logo_id    VARCHAR NOT NULL DEFAULT '',
    active     BOOLEAN NOT NULL DEFAULT TRUE
);

CREATE TABLE IF NOT EXISTS players (
    player_id    BIGINT PRIMARY KEY,
    player_name  VARCHAR NOT NULL,
    real_name    VARCHAR,
    region_id    BIGINT REFERENCES regions (region_id),
    avatar_id    VARCHAR NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS tournaments (
    tour_id    BIGINT PRIMARY KEY DEFAULT nextval('tour_id_seq'),
    tour_name  VARCHAR NOT NULL UNIQUE,
    link       VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS tournament_splits (
    split_id          BIGINT PRIMARY KEY,
    tour_id           BIGINT NOT NULL REFERENCES tournaments (tour_id),
    parent_region_id  INTEGER REFERENCES parent_regions (parent_region_id),
    split_name        VARCHAR NOT NULL,
    link              VARCHAR NOT NULL,
    start_date        DATE,
    end_date          DATE,
    prize_pool        DOUBLE,
    location          VARCHAR
);

CREATE TABLE IF NOT EXISTS matches (
    match_id     BIGINT PRIMARY KEY,
    split_id     BIGINT NOT NULL REFERENCES tournament_splits (split_id),
    team1_id     BIGINT NOT NULL REFERENCES teams (team_id),
    team2_id     BIGINT NOT NULL REFERENCES teams (team_id),
    -- epoch seconds as published in the match header
    date_played  VARCHAR
);

CREATE TABLE IF NOT EXISTS games (
    game_id   BIGINT PRIMARY KEY,
    match_id  BIGINT NOT NULL REFERENCES matches (match_id),
    map_id    INTEGER NOT NULL REFERENCES maps (map_id)
);

CREATE TABLE IF NOT EXISTS game_players (
    game_id    BIGINT NOT NULL REFERENCES games (game_id),
    player_id  BIGINT NOT NULL REFERENCES players (player_id),
    team_id    BIGINT NOT NULL REFERENCES teams (team_id),
    agent_id   INTEGER NOT NULL REFERENCES agents (agent_id),
    side_data  BOOLEAN NOT NULL DEFAULT FALSE,
    -- t_ = attack, ct_ = defense, both_ = whole game
    t_kills DOUBLE NOT NULL DEFAULT 0, ct_kills DOUBLE NOT NULL DEFAULT 0, both_kills DOUBLE NOT NULL DEFAULT 0,
    t_deaths DOUBLE NOT NULL DEFAULT 0, ct_deaths DOUBLE NOT NULL DEFAULT 0, both_deaths DOUBLE NOT NULL DEFAULT 0,
    t_assists DOUBLE NOT NULL DEFAULT 0, ct_assists DOUBLE NOT NULL DEFAULT 0, both_assists DOUBLE NOT NULL DEFAULT 0,
    t_acs DOUBLE NOT NULL DEFAULT 0, ct_acs DOUBLE NOT NULL DEFAULT 0, both_acs DOUBLE NOT NULL DEFAULT 0,
    t_kast DOUBLE NOT NULL DEFAULT 0, ct_kast DOUBLE NOT NULL DEFAULT 0, both_kast DOUBLE NOT NULL DEFAULT 0,
    t_adr DOUBLE NOT NULL DEFAULT 0, ct_adr DOUBLE NOT NULL DEFAULT 0, both_adr DOUBLE NOT NULL DEFAULT 0,
    t_hs DOUBLE NOT NULL DEFAULT 0, ct_hs DOUBLE NOT NULL DEFAULT 0, both_hs DOUBLE NOT NULL DEFAULT 0,
    t_fk DOUBLE NOT NULL DEFAULT 0, ct_fk DOUBLE NOT NULL DEFAULT 0, both_fk DOUBLE NOT NULL DEFAULT 0,
    t_fd DOUBLE NOT NULL DEFAULT 0, ct_fd DOUBLE NOT NULL DEFAULT 0, both_fd DOUBLE NOT NULL DEFAULT 0,
    PRIMARY KEY (game_id, player_id)
);
"#;

const INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_matches_split ON matches (split_id);
CREATE INDEX IF NOT EXISTS idx_games_match   ON games (match_id);
"#;

/// Crawled tables, children before parents.
const CRAWLED_TABLES: [&str; 8] = [
    "game_players",
    "games",
    "matches",
    "tournament_splits",
    "tournaments",
    "players",
    "teams",
    "regions",
];

// ── Types ─────────────────────────────────────────────────────────────────────

/// Outcome of a `get_or_create_*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted<K = u32> {
    pub id: K,
    /// `false` when the key already existed and nothing was written.
    pub created: bool,
}

impl<K> Upserted<K> {
    fn created(id: K) -> Self {
        Self { id, created: true }
    }

    fn existing(id: K) -> Self {
        Self { id, created: false }
    }
}

/// Row counts of the crawled tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub regions: i64,
    pub teams: i64,
    pub players: i64,
    pub tournaments: i64,
    pub splits: i64,
    pub matches: i64,
    pub games: i64,
    pub game_players: i64,
}

// ── Store ─────────────────────────────────────────────────────────────────────

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Create tables, sequences and indexes that do not exist yet.
    pub fn run_migrations(&self) -> Result<()> {
        info!("running migrations");
        self.conn.execute_batch(DDL)?;
        self.conn.execute_batch(INDEXES)?;
        info!("migrations done");
        Ok(())
    }

    /// Insert the static parent regions, maps and agents.
    pub fn seed_reference_data(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for region in ParentRegion::iter() {
            tx.execute(
                "INSERT OR IGNORE INTO parent_regions (parent_region_id, parent_region_name) VALUES (?, ?)",
                params![region.id(), region.to_string()],
            )?;
        }
        for map in GameMap::iter() {
            tx.execute(
                "INSERT OR IGNORE INTO maps (map_id, map_name, active) VALUES (?, ?, ?)",
                params![map.id(), map.to_string(), map != GameMap::Unknown],
            )?;
        }
        for agent in Agent::iter() {
            tx.execute(
                "INSERT OR IGNORE INTO agents (agent_id, agent_name) VALUES (?, ?)",
                params![agent.id(), agent.to_string()],
            )?;
        }
        tx.commit()?;
        debug!("reference data seeded");
        Ok(())
    }

    /// `SELECT version()` of the underlying engine.
    pub fn version(&self) -> Result<String> {
        Ok(self.conn.query_row("SELECT version()", [], |r| r.get(0))?)
    }

    fn exists<P: Params>(&self, sql: &str, params: P) -> Result<bool> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        Ok(rows.next()?.is_some())
    }

    fn lookup_id<P: Params>(&self, sql: &str, params: P) -> Result<Option<i64>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    // ── Named entities ────────────────────────────────────────────────────────

    /// Id of the region called `name`, created on first sighting.
    /// An empty name means "no region".
    pub fn get_or_create_region(&self, name: &str) -> Result<Option<i64>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        if let Some(id) =
            self.lookup_id("SELECT region_id FROM regions WHERE region_name = ?", params![name])?
        {
            return Ok(Some(id));
        }
        let id: i64 = self.conn.query_row(
            "INSERT INTO regions (region_name) VALUES (?) RETURNING region_id",
            params![name],
            |r| r.get(0),
        )?;
        debug!(id, name, "region created");
        Ok(Some(id))
    }

    /// Id of the tour called `name`, created on first sighting.
    pub fn get_or_create_tournament(&self, name: &str, link: &str) -> Result<i64> {
        if let Some(id) =
            self.lookup_id("SELECT tour_id FROM tournaments WHERE tour_name = ?", params![name])?
        {
            return Ok(id);
        }
        let id: i64 = self.conn.query_row(
            "INSERT INTO tournaments (tour_name, link) VALUES (?, ?) RETURNING tour_id",
            params![name, link],
            |r| r.get(0),
        )?;
        debug!(id, name, "tournament created");
        Ok(id)
    }

    // ── Existence checks ──────────────────────────────────────────────────────

    pub fn team_exists(&self, id: u32) -> Result<bool> {
        self.exists("SELECT 1 FROM teams WHERE team_id = ?", params![id])
    }

    pub fn player_exists(&self, id: u32) -> Result<bool> {
        self.exists("SELECT 1 FROM players WHERE player_id = ?", params![id])
    }

    pub fn split_exists(&self, id: u32) -> Result<bool> {
        self.exists("SELECT 1 FROM tournament_splits WHERE split_id = ?", params![id])
    }

    pub fn match_exists(&self, id: u32) -> Result<bool> {
        self.exists("SELECT 1 FROM matches WHERE match_id = ?", params![id])
    }

    pub fn game_exists(&self, id: u32) -> Result<bool> {
        self.exists("SELECT 1 FROM games WHERE game_id = ?", params![id])
    }

    pub fn game_player_exists(&self, game_id: u32, player_id: u32) -> Result<bool> {
        self.exists(
            "SELECT 1 FROM game_players WHERE game_id = ? AND player_id = ?",
            params![game_id, player_id],
        )
    }

    // ── Keyed entities ────────────────────────────────────────────────────────

    pub fn get_or_create_team(&self, team: &Team) -> Result<Upserted> {
        if self.team_exists(team.id)? {
            return Ok(Upserted::existing(team.id));
        }
        self.conn.execute(
            "INSERT INTO teams (team_id, team_name, region_id, logo_id, active) VALUES (?, ?, ?, ?, ?)",
            params![team.id, team.name, team.region_id, team.logo_asset_id, team.active],
        )?;
        debug!(id = team.id, name = team.name, "team created");
        Ok(Upserted::created(team.id))
    }

    pub fn get_or_create_player(&self, player: &Player) -> Result<Upserted> {
        if self.player_exists(player.id)? {
            return Ok(Upserted::existing(player.id));
        }
        self.conn.execute(
            "INSERT INTO players (player_id, player_name, real_name, region_id, avatar_id) VALUES (?, ?, ?, ?, ?)",
            params![
                player.id,
                player.name,
                player.real_name,
                player.region_id,
                player.avatar_asset_id
            ],
        )?;
        debug!(id = player.id, name = player.name, "player created");
        Ok(Upserted::created(player.id))
    }

    pub fn get_or_create_split(&self, split: &TournamentSplit) -> Result<Upserted> {
        if self.split_exists(split.id)? {
            return Ok(Upserted::existing(split.id));
        }
        self.conn.execute(
            r#"INSERT INTO tournament_splits
                   (split_id, tour_id, parent_region_id, split_name, link,
                    start_date, end_date, prize_pool, location)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                split.id,
                split.tournament_id,
                split.parent_region.map(ParentRegion::id),
                split.name,
                split.link,
                split.start_date,
                split.end_date,
                split.prize_pool,
                split.location,
            ],
        )?;
        debug!(id = split.id, name = split.name, "split created");
        Ok(Upserted::created(split.id))
    }

    pub fn get_or_create_match(&self, m: &Match) -> Result<Upserted> {
        if self.match_exists(m.id)? {
            return Ok(Upserted::existing(m.id));
        }
        self.conn.execute(
            "INSERT INTO matches (match_id, split_id, team1_id, team2_id, date_played) VALUES (?, ?, ?, ?, ?)",
            params![m.id, m.split_id, m.team1_id, m.team2_id, m.date_played],
        )?;
        debug!(id = m.id, "match created");
        Ok(Upserted::created(m.id))
    }

    pub fn get_or_create_game(&self, game: &Game) -> Result<Upserted> {
        if self.game_exists(game.id)? {
            return Ok(Upserted::existing(game.id));
        }
        self.conn.execute(
            "INSERT INTO games (game_id, match_id, map_id) VALUES (?, ?, ?)",
            params![game.id, game.match_id, game.map.id()],
        )?;
        debug!(id = game.id, map = %game.map, "game created");
        Ok(Upserted::created(game.id))
    }

    pub fn get_or_create_game_player(&self, gp: &GamePlayer) -> Result<Upserted<(u32, u32)>> {
        let key = (gp.game_id, gp.player_id);
        if self.game_player_exists(gp.game_id, gp.player_id)? {
            return Ok(Upserted::existing(key));
        }
        let s = &gp.stats;
        self.conn.execute(
            r#"INSERT INTO game_players (
                   game_id, player_id, team_id, agent_id, side_data,
                   t_kills, ct_kills, both_kills,
                   t_deaths, ct_deaths, both_deaths,
                   t_assists, ct_assists, both_assists,
                   t_acs, ct_acs, both_acs,
                   t_kast, ct_kast, both_kast,
                   t_adr, ct_adr, both_adr,
                   t_hs, ct_hs, both_hs,
                   t_fk, ct_fk, both_fk,
                   t_fd, ct_fd, both_fd)
               VALUES (?, ?, ?, ?, ?,
                       ?, ?, ?, ?, ?, ?, ?, ?, ?,
                       ?, ?, ?, ?, ?, ?, ?, ?, ?,
                       ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                gp.game_id,
                gp.player_id,
                gp.team_id,
                gp.agent.id(),
                s.side_data,
                s.kills.attack,
                s.kills.defense,
                s.kills.both,
                s.deaths.attack,
                s.deaths.defense,
                s.deaths.both,
                s.assists.attack,
                s.assists.defense,
                s.assists.both,
                s.acs.attack,
                s.acs.defense,
                s.acs.both,
                s.kast.attack,
                s.kast.defense,
                s.kast.both,
                s.adr.attack,
                s.adr.defense,
                s.adr.both,
                s.hs_pct.attack,
                s.hs_pct.defense,
                s.hs_pct.both,
                s.first_kills.attack,
                s.first_kills.defense,
                s.first_kills.both,
                s.first_deaths.attack,
                s.first_deaths.defense,
                s.first_deaths.both,
            ],
        )?;
        Ok(Upserted::created(key))
    }

    // ── Maintenance ───────────────────────────────────────────────────────────

    fn count(&self, table: &str) -> Result<i64> {
        let mut s = self.conn.prepare(&format!("SELECT COUNT(*) FROM {table}"))?;
        Ok(s.query_row([], |r| r.get(0))?)
    }

    pub fn counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            regions: self.count("regions")?,
            teams: self.count("teams")?,
            players: self.count("players")?,
            tournaments: self.count("tournaments")?,
            splits: self.count("tournament_splits")?,
            matches: self.count("matches")?,
            games: self.count("games")?,
            game_players: self.count("game_players")?,
        })
    }

    /// Delete every crawled row; the static reference tables are kept.
    pub fn wipe(&self) -> Result<()> {
        // One statement per table: foreign keys are checked against committed rows.
        for table in CRAWLED_TABLES {
            self.conn.execute(&format!("DELETE FROM {table}"), [])?;
        }
        info!("crawled tables wiped");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn query_f64(&self, sql: &str) -> f64 {
        self.conn.query_row(sql, [], |r| r.get(0)).unwrap()
    }

    #[cfg(test)]
    pub(crate) fn query_string(&self, sql: &str) -> String {
        self.conn.query_row(sql, [], |r| r.get(0)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlayerStats, SideStat};

    fn store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.run_migrations().unwrap();
        store.seed_reference_data().unwrap();
        store
    }

    fn team(id: u32, name: &str) -> Team {
        Team {
            id,
            name: name.to_string(),
            region_id: None,
            logo_asset_id: String::new(),
            active: true,
        }
    }

    fn player(id: u32, name: &str) -> Player {
        Player {
            id,
            name: name.to_string(),
            real_name: None,
            region_id: None,
            avatar_asset_id: String::new(),
        }
    }

    fn split(store: &Store, id: u32) -> TournamentSplit {
        TournamentSplit {
            id,
            tournament_id: store.get_or_create_tournament("Champions Tour 2024", "/vct-2024").unwrap(),
            parent_region: Some(ParentRegion::Americas),
            name: "Champions Tour 2024 Americas: Stage 1".to_string(),
            link: format!("/event/{id}/vct-2024-americas-stage-1"),
            start_date: chrono::NaiveDate::from_ymd_opt(2024, 4, 13),
            end_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 26),
            prize_pool: Some(250_000.0),
            location: Some("Los Angeles".to_string()),
        }
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let store = store();
        store.run_migrations().unwrap();
        store.seed_reference_data().unwrap();
        assert_eq!(store.counts().unwrap(), TableCounts::default());
    }

    #[test]
    fn test_seeded_reference_ids() {
        let store = store();
        assert_eq!(
            store.query_f64("SELECT CAST(map_id AS DOUBLE) FROM maps WHERE map_name = 'Unknown'"),
            11.0
        );
        assert_eq!(
            store.query_f64("SELECT CAST(agent_id AS DOUBLE) FROM agents WHERE agent_name = 'KAY/O'"),
            13.0
        );
        assert_eq!(
            store.query_f64("SELECT CAST(COUNT(*) AS DOUBLE) FROM parent_regions"),
            4.0
        );
    }

    #[test]
    fn test_region_is_created_once() {
        let store = store();
        let first = store.get_or_create_region("United States").unwrap();
        let second = store.get_or_create_region(" United States ").unwrap();
        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(store.get_or_create_region("").unwrap(), None);
        assert_eq!(store.counts().unwrap().regions, 1);
    }

    #[test]
    fn test_tournament_is_deduplicated_by_name() {
        let store = store();
        let a = store.get_or_create_tournament("Champions Tour 2024", "/vct-2024").unwrap();
        let b = store.get_or_create_tournament("Champions Tour 2024", "/elsewhere").unwrap();
        let c = store.get_or_create_tournament("Game Changers 2024", "/gc-2024").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(
            store.query_string(&format!("SELECT link FROM tournaments WHERE tour_id = {a}")),
            "/vct-2024"
        );
    }

    #[test]
    fn test_first_write_wins() {
        let store = store();
        let created = store.get_or_create_team(&team(2, "Sentinels")).unwrap();
        assert_eq!(created, Upserted { id: 2, created: true });

        let again = store.get_or_create_team(&team(2, "Renamed")).unwrap();
        assert_eq!(again, Upserted { id: 2, created: false });
        assert!(store.team_exists(2).unwrap());
        assert!(!store.team_exists(3).unwrap());
        assert_eq!(store.counts().unwrap().teams, 1);
        assert_eq!(
            store.query_string("SELECT team_name FROM teams WHERE team_id = 2"),
            "Sentinels"
        );

        store.get_or_create_player(&player(9, "zekken")).unwrap();
        assert!(!store.get_or_create_player(&player(9, "renamed")).unwrap().created);
        assert_eq!(
            store.query_string("SELECT player_name FROM players WHERE player_id = 9"),
            "zekken"
        );
    }

    #[test]
    fn test_full_match_chain() {
        let store = store();
        store.get_or_create_team(&team(2, "Sentinels")).unwrap();
        store.get_or_create_team(&team(120, "100 Thieves")).unwrap();
        assert!(store.get_or_create_split(&split(&store, 2004)).unwrap().created);

        let m = Match {
            id: 353177,
            split_id: 2004,
            team1_id: 2,
            team2_id: 120,
            date_played: Some("1713020400".to_string()),
        };
        assert!(store.get_or_create_match(&m).unwrap().created);
        assert!(store.match_exists(353177).unwrap());

        let game = Game {
            id: 170001,
            match_id: 353177,
            map: GameMap::Ascent,
        };
        assert!(store.get_or_create_game(&game).unwrap().created);

        store.get_or_create_player(&player(9, "TenZ")).unwrap();
        let gp = GamePlayer {
            game_id: 170001,
            player_id: 9,
            team_id: 2,
            agent: Agent::Jett,
            stats: PlayerStats {
                kills: SideStat {
                    attack: 12.0,
                    defense: 8.0,
                    both: 20.0,
                },
                side_data: true,
                ..PlayerStats::default()
            },
        };
        let first = store.get_or_create_game_player(&gp).unwrap();
        assert_eq!(first, Upserted { id: (170001, 9), created: true });
        assert!(!store.get_or_create_game_player(&gp).unwrap().created);
        assert_eq!(store.query_f64("SELECT both_kills FROM game_players"), 20.0);

        let counts = store.counts().unwrap();
        assert_eq!(counts.splits, 1);
        assert_eq!(counts.matches, 1);
        assert_eq!(counts.games, 1);
        assert_eq!(counts.game_players, 1);
    }

    #[test]
    fn test_match_requires_existing_teams() {
        let store = store();
        store.get_or_create_split(&split(&store, 2004)).unwrap();
        let m = Match {
            id: 1,
            split_id: 2004,
            team1_id: 404,
            team2_id: 405,
            date_played: None,
        };
        assert!(store.get_or_create_match(&m).is_err());
        assert!(!store.match_exists(1).unwrap());
    }

    #[test]
    fn test_wipe_keeps_reference_data() {
        let store = store();
        store.get_or_create_team(&team(2, "Sentinels")).unwrap();
        store.get_or_create_region("Europe").unwrap();
        store.wipe().unwrap();

        assert_eq!(store.counts().unwrap(), TableCounts::default());
        assert_eq!(store.query_f64("SELECT CAST(COUNT(*) AS DOUBLE) FROM maps"), 11.0);
    }

    #[test]
    fn test_version() {
        assert!(store().version().unwrap().starts_with('v'));
    }
}

//! Depth-first traversal of tour → split → match list → match → team/player
//! pages, writing every entity to the store as it is discovered. Player
//! leaderboards under `/stats` are a second entry point that only fills the
//! players table.

use tracing::{debug, error, info, instrument, warn};

use crate::error::Result;
use crate::ids;
use crate::model::{
    Agent, Game, GameDocument, GameMap, GamePlayer, Match, MatchDocument, Player, Team,
    TournamentSplit,
};
use crate::scraper::{
    match_detail, matchlist, player, split, stats, team, tournament, Html, PageSource,
};
use crate::store::documents::DocumentStore;
use crate::store::Store;

/// Outcome of visiting one page of the traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// The page was fetched and its entities written.
    Processed,
    /// The entity was already stored; its page was not fetched.
    AlreadyKnown,
    /// The page could not be used, e.g. its link carries no id.
    Skipped(String),
}

/// Counters of one crawl run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub tours: usize,
    pub splits_processed: usize,
    pub splits_failed: usize,
    pub matches_processed: usize,
    pub matches_skipped: usize,
    pub teams_created: usize,
    pub players_created: usize,
    pub games_created: usize,
    pub game_players_created: usize,
}

/// Drives the traversal over a [`PageSource`] into a [`Store`].
pub struct Crawler<'a, S: PageSource> {
    source: &'a S,
    store: &'a Store,
    documents: Option<&'a DocumentStore>,
    stats: CrawlStats,
}

impl<'a, S: PageSource> Crawler<'a, S> {
    pub fn new(source: &'a S, store: &'a Store) -> Self {
        Self {
            source,
            store,
            documents: None,
            stats: CrawlStats::default(),
        }
    }

    /// Also mirror every processed match into `documents`.
    pub fn with_documents(mut self, documents: &'a DocumentStore) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn stats(&self) -> CrawlStats {
        self.stats
    }

    /// Crawl every tour in order.
    ///
    /// A failing split is logged and abandoned; only fatal errors end the run.
    pub async fn run(&mut self, tours: &[String]) -> Result<CrawlStats> {
        for tour in tours {
            match self.visit_tournament(tour).await {
                Ok(Visit::Processed) => self.stats.tours += 1,
                Ok(visit) => debug!(tour, ?visit, "tour not processed"),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => error!(tour, error = %e, "tour failed"),
            }
        }
        info!(stats = ?self.stats, "crawl finished");
        Ok(self.stats)
    }

    /// Store every player listed on the given `/stats` leaderboards.
    ///
    /// A failing leaderboard is logged and skipped; only fatal errors end the run.
    pub async fn run_leaderboards(&mut self, pages: &[String]) -> Result<CrawlStats> {
        for page in pages {
            match self.visit_player_leaderboard(page).await {
                Ok(visit) => debug!(page, ?visit, "leaderboard visited"),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => error!(page, error = %e, "leaderboard failed"),
            }
        }
        info!(stats = ?self.stats, "leaderboard crawl finished");
        Ok(self.stats)
    }

    /// Ensure every player linked from a `/stats` leaderboard page.
    ///
    /// A player whose profile cannot be stored is logged and the next row
    /// is tried.
    #[instrument(skip(self))]
    pub async fn visit_player_leaderboard(&mut self, path: &str) -> Result<Visit> {
        let body = self.source.fetch_page(path).await?;
        let entries = stats::parse_leaderboard(&Html::parse_document(&body))?;
        info!(players = entries.len(), "visiting leaderboard");

        for entry in &entries {
            match self.ensure_player(&entry.href, &entry.name).await {
                Ok(_) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => error!(href = entry.href, error = %e, "player failed"),
            }
        }
        Ok(Visit::Processed)
    }

    #[instrument(skip(self))]
    pub async fn visit_tournament(&mut self, path: &str) -> Result<Visit> {
        let body = self.source.fetch_page(path).await?;
        let page = tournament::parse_tournament(&Html::parse_document(&body))?;
        if page.name.is_empty() {
            warn!("tour page has no title");
            return Ok(Visit::Skipped(format!("no tour title at {path}")));
        }

        let tournament_id = self.store.get_or_create_tournament(&page.name, path)?;
        info!(tournament_id, name = page.name, splits = page.split_links.len(), "visiting tour");

        for link in &page.split_links {
            match self.visit_split(tournament_id, link).await {
                Ok(Visit::Processed) => self.stats.splits_processed += 1,
                Ok(visit) => debug!(split = link, ?visit, "split not processed"),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    self.stats.splits_failed += 1;
                    error!(split = link, error = %e, "abandoning split");
                }
            }
        }
        Ok(Visit::Processed)
    }

    #[instrument(skip(self))]
    pub async fn visit_split(&mut self, tournament_id: i64, link: &str) -> Result<Visit> {
        let Some(split_id) = ids::split_id(link) else {
            warn!("split link has no id");
            return Ok(Visit::Skipped(format!("no split id in {link}")));
        };

        let body = self.source.fetch_page(link).await?;
        let page = split::parse_split(&Html::parse_document(&body))?;
        self.store.get_or_create_split(&TournamentSplit {
            id: split_id,
            tournament_id,
            parent_region: page.parent_region,
            name: page.name.clone(),
            link: link.to_string(),
            start_date: page.start_date,
            end_date: page.end_date,
            prize_pool: page.prize_pool,
            location: page.location.clone(),
        })?;

        for team_link in &page.team_links {
            self.ensure_team(team_link).await?;
        }

        let matches_path = page
            .matches_link
            .clone()
            .unwrap_or_else(|| matchlist::default_matches_path(split_id));
        let body = self.source.fetch_page(&matches_path).await?;
        let matches = matchlist::parse_matches(&Html::parse_document(&body))?;
        info!(split_id, name = page.name, matches = matches.len(), "visiting split");

        for match_link in &matches {
            match self.visit_match(split_id, match_link).await? {
                Visit::Processed => self.stats.matches_processed += 1,
                Visit::AlreadyKnown | Visit::Skipped(_) => self.stats.matches_skipped += 1,
            }
        }
        Ok(Visit::Processed)
    }

    #[instrument(skip(self))]
    pub async fn visit_match(&mut self, split_id: u32, link: &str) -> Result<Visit> {
        let Some(match_id) = ids::match_id(link) else {
            warn!("match link has no id");
            return Ok(Visit::Skipped(format!("no match id in {link}")));
        };
        if self.store.match_exists(match_id)? {
            debug!(match_id, "match already stored");
            return Ok(Visit::AlreadyKnown);
        }

        let body = self.source.fetch_page(link).await?;
        let page = match_detail::parse_match(match_id, &Html::parse_document(&body))?;

        let team_ids: Vec<u32> = page
            .team_links
            .iter()
            .filter_map(|href| ids::team_id(href))
            .collect();
        let &[team1_id, team2_id] = team_ids.as_slice() else {
            warn!(match_id, teams = team_ids.len(), "match header does not name two teams");
            return Ok(Visit::Skipped(format!("match {match_id} has {} teams", team_ids.len())));
        };
        for team_link in &page.team_links {
            self.ensure_team(team_link).await?;
        }

        self.store.get_or_create_match(&Match {
            id: match_id,
            split_id,
            team1_id,
            team2_id,
            date_played: page.date_played.clone(),
        })?;

        let mut game_documents = Vec::with_capacity(page.games.len());
        for section in &page.games {
            let Some(game_id) = section.game_id else {
                warn!(match_id, map = section.map_name, "game section has no id");
                continue;
            };
            let game = Game {
                id: game_id,
                match_id,
                map: GameMap::from_name(&section.map_name),
            };
            if self.store.get_or_create_game(&game)?.created {
                self.stats.games_created += 1;
            }

            let mut players = Vec::new();
            for (team_id, rows) in [team1_id, team2_id].into_iter().zip(&section.teams) {
                for row in rows {
                    let Some(player_id) = ids::player_id(&row.href) else {
                        warn!(game_id, href = row.href, "skipping row without player id");
                        continue;
                    };
                    self.ensure_player(&row.href, &row.name).await?;

                    let game_player = GamePlayer {
                        game_id,
                        player_id,
                        team_id,
                        agent: Agent::from_name(&row.agent),
                        stats: row.stats,
                    };
                    if self.store.get_or_create_game_player(&game_player)?.created {
                        self.stats.game_players_created += 1;
                    }
                    players.push(game_player);
                }
            }
            game_documents.push(GameDocument {
                game_id,
                map: game.map,
                players,
            });
        }

        if let Some(documents) = self.documents {
            documents.insert(&MatchDocument {
                document_id: MatchDocument::document_id(match_id),
                match_id,
                split_id,
                date_played: page.date_played,
                team_ids: vec![team1_id, team2_id],
                games: game_documents,
            })?;
        }
        Ok(Visit::Processed)
    }

    /// Store the team behind `link`, fetching its page only on first sighting.
    #[instrument(skip(self))]
    pub async fn ensure_team(&mut self, link: &str) -> Result<Visit> {
        let Some(team_id) = ids::team_id(link) else {
            warn!("team link has no id");
            return Ok(Visit::Skipped(format!("no team id in {link}")));
        };
        if self.store.team_exists(team_id)? {
            return Ok(Visit::AlreadyKnown);
        }

        let body = self.source.fetch_page(link).await?;
        let page = team::parse_team(&Html::parse_document(&body))?;
        let region_id = self.store.get_or_create_region(&page.region)?;
        let team = Team {
            id: team_id,
            name: page.name,
            region_id,
            logo_asset_id: page.logo_asset_id,
            active: true,
        };
        if self.store.get_or_create_team(&team)?.created {
            self.stats.teams_created += 1;
        }
        Ok(Visit::Processed)
    }

    /// Store the player behind `link`, fetching its page only on first
    /// sighting. `scoreboard_name` stands in for a missing profile title.
    #[instrument(skip(self))]
    pub async fn ensure_player(&mut self, link: &str, scoreboard_name: &str) -> Result<Visit> {
        let Some(player_id) = ids::player_id(link) else {
            warn!("player link has no id");
            return Ok(Visit::Skipped(format!("no player id in {link}")));
        };
        if self.store.player_exists(player_id)? {
            return Ok(Visit::AlreadyKnown);
        }

        let body = self.source.fetch_page(link).await?;
        let page = player::parse_player(&Html::parse_document(&body))?;
        let region_id = self.store.get_or_create_region(&page.region)?;
        let name = if page.name.is_empty() {
            scoreboard_name.to_string()
        } else {
            page.name
        };
        let player = Player {
            id: player_id,
            name,
            real_name: page.real_name,
            region_id,
            avatar_asset_id: page.avatar_asset_id,
        };
        if self.store.get_or_create_player(&player)?.created {
            self.stats.players_created += 1;
        }
        Ok(Visit::Processed)
    }
}

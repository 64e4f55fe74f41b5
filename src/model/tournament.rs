use chrono::NaiveDate;
use serde::Serialize;

use super::reference::ParentRegion;

/// Fields extracted from a tour page (e.g. `/vct-2024`).
#[derive(Debug, Clone, Serialize)]
pub struct TournamentPage {
    pub name: String,
    pub split_links: Vec<String>,
}

/// Fields extracted from a split (event) page.
#[derive(Debug, Clone, Serialize)]
pub struct SplitPage {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub prize_pool: Option<f64>,
    pub location: Option<String>,
    pub parent_region: Option<ParentRegion>,
    pub team_links: Vec<String>,
    pub matches_link: Option<String>,
}

/// Links to every match of a split, in page order.
pub type SplitMatchList = Vec<String>;

/// A competitive stage of a tour, keyed by the event id in its URL.
#[derive(Debug, Clone, Serialize)]
pub struct TournamentSplit {
    pub id: u32,
    pub tournament_id: i64,
    pub parent_region: Option<ParentRegion>,
    pub name: String,
    pub link: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub prize_pool: Option<f64>,
    pub location: Option<String>,
}

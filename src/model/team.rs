use serde::Serialize;

/// Fields extracted from a team profile page.
#[derive(Debug, Clone, Serialize)]
pub struct TeamPage {
    pub name: String,
    pub region: String,
    pub logo_asset_id: String,
}

/// A team row, keyed by the id in its `/team/<id>/<slug>` URL.
#[derive(Debug, Clone, Serialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub region_id: Option<i64>,
    pub logo_asset_id: String,
    pub active: bool,
}

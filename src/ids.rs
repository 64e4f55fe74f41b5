//! Externally assigned identifiers scraped from site paths.
//!
//! The site uses two path shapes: marker-based (`/player/<id>/<slug>`) and
//! positional (`/team/<id>/<slug>`, `/event/<id>/<slug>`, `/<id>/<slug>`).
//! They are kept as separate extractors. All of them return `None` instead
//! of failing so callers can skip the record and keep crawling.

use url::Url;

/// Segment index of the id in `/team/<id>/<slug>` and `/event/<id>/<slug>`.
const ENTITY_ID_POSITION: usize = 2;
/// Segment index of the id in `/<id>/<slug>`.
const MATCH_ID_POSITION: usize = 1;

/// Path of an href, whether absolute or site-relative, without query or fragment.
fn path_of(href: &str) -> String {
    match Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => href
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Id in the segment following `marker`.
pub fn id_after_marker(path: &str, marker: &str) -> Option<u32> {
    let path = path_of(path);
    let mut segments = path.split('/');
    segments.find(|segment| *segment == marker)?;
    segments.next()?.parse().ok()
}

/// Id at a fixed segment index; the empty segment before the leading `/` is index 0.
pub fn id_at_position(path: &str, position: usize) -> Option<u32> {
    path_of(path).split('/').nth(position)?.parse().ok()
}

/// `/player/9/tenzz` → 9
pub fn player_id(path: &str) -> Option<u32> {
    id_after_marker(path, "player")
}

/// `/team/2/sentinels` → 2
pub fn team_id(path: &str) -> Option<u32> {
    id_at_position(path, ENTITY_ID_POSITION)
}

/// `/event/2004/champions-tour-2024-americas-stage-1` → 2004
pub fn split_id(path: &str) -> Option<u32> {
    id_at_position(path, ENTITY_ID_POSITION)
}

/// `/353177/sentinels-vs-100-thieves` → 353177
pub fn match_id(path: &str) -> Option<u32> {
    id_at_position(path, MATCH_ID_POSITION)
}

/// Asset id of a hosted image: the file stem of the single segment after `/img/`.
///
/// `//owcdn.net/img/62bbebb185a2f.png` → `62bbebb185a2f`; placeholder images
/// such as `/img/base/ph/sil.png` yield an empty string.
pub fn asset_id(image_url: &str) -> String {
    image_url
        .split_once("/img/")
        .and_then(|(_, rest)| rest.split(['?', '#']).next())
        .filter(|file| !file.contains('/'))
        .and_then(|file| file.rsplit_once('.'))
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty() && stem.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_default()
        .to_string()
}

use std::str::FromStr;

use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

/// Competitive map pool. Discriminants are the stored `map_id` values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
#[repr(u32)]
pub enum GameMap {
    Ascent = 1,
    Bind = 2,
    Breeze = 3,
    Fracture = 4,
    Haven = 5,
    Icebox = 6,
    Lotus = 7,
    Pearl = 8,
    Split = 9,
    Sunset = 10,
    Unknown = 11,
}

impl GameMap {
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Resolve a normalized map name; unlisted names map to [`GameMap::Unknown`].
    pub fn from_name(name: &str) -> Self {
        Self::from_str(name.trim()).unwrap_or(Self::Unknown)
    }
}

/// Playable agents. Discriminants are the stored `agent_id` values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
#[repr(u32)]
pub enum Agent {
    Astra = 1,
    Breach = 2,
    Brimstone = 3,
    Chamber = 4,
    Clove = 5,
    Cypher = 6,
    Deadlock = 7,
    Fade = 8,
    Gekko = 9,
    Harbor = 10,
    Iso = 11,
    Jett = 12,
    #[strum(to_string = "KAY/O", serialize = "kayo")]
    KayO = 13,
    Killjoy = 14,
    Neon = 15,
    Omen = 16,
    Phoenix = 17,
    Raze = 18,
    Reyna = 19,
    Sage = 20,
    Skye = 21,
    Sova = 22,
    Viper = 23,
    Yoru = 24,
    Unknown = 25,
}

impl Agent {
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Resolve an agent name; unlisted names map to [`Agent::Unknown`].
    pub fn from_name(name: &str) -> Self {
        Self::from_str(name.trim()).unwrap_or(Self::Unknown)
    }
}

/// Top-level competitive region a tournament split belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, EnumString,
)]
#[repr(u32)]
pub enum ParentRegion {
    Americas = 1,
    #[strum(to_string = "EMEA")]
    Emea = 2,
    Pacific = 3,
    China = 4,
}

impl ParentRegion {
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Infer the region from a keyword in a split name, e.g.
    /// "Champions Tour 2024 Americas: Stage 1" → Americas.
    pub fn from_split_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        [Self::Americas, Self::Emea, Self::Pacific, Self::China]
            .into_iter()
            .find(|region| name.contains(&region.to_string().to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_map_ids_follow_declared_order() {
        let maps: Vec<GameMap> = GameMap::iter().collect();
        assert_eq!(maps.first(), Some(&GameMap::Ascent));
        assert_eq!(GameMap::Ascent.id(), 1);
        assert_eq!(GameMap::Unknown.id(), maps.len() as u32);
        for (position, map) in maps.iter().enumerate() {
            assert_eq!(map.id(), position as u32 + 1);
        }
    }

    #[test]
    fn test_agent_ids_follow_declared_order() {
        let agents: Vec<Agent> = Agent::iter().collect();
        assert_eq!(Agent::Astra.id(), 1);
        assert_eq!(Agent::Unknown.id(), agents.len() as u32);
        for (position, agent) in agents.iter().enumerate() {
            assert_eq!(agent.id(), position as u32 + 1);
        }
    }

    #[test]
    fn test_unknown_names_fall_back() {
        assert_eq!(GameMap::from_name("ascent"), GameMap::Ascent);
        assert_eq!(GameMap::from_name("Abyss"), GameMap::Unknown);
        assert_eq!(Agent::from_name("KAY/O"), Agent::KayO);
        assert_eq!(Agent::from_name("kayo"), Agent::KayO);
        assert_eq!(Agent::from_name("jett"), Agent::Jett);
        assert_eq!(Agent::from_name(""), Agent::Unknown);
        assert_eq!(Agent::KayO.to_string(), "KAY/O");
    }

    #[test]
    fn test_parent_region_from_split_name() {
        assert_eq!(
            ParentRegion::from_split_name("Champions Tour 2024 Americas: Stage 1"),
            Some(ParentRegion::Americas)
        );
        assert_eq!(
            ParentRegion::from_split_name("Champions Tour 2024 EMEA: Kickoff"),
            Some(ParentRegion::Emea)
        );
        assert_eq!(
            ParentRegion::from_split_name("Champions Tour 2024: Masters Madrid"),
            None
        );
    }
}

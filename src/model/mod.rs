mod document;
mod match_detail;
mod player;
mod reference;
mod team;
mod tournament;

pub use document::*;
pub use match_detail::*;
pub use player::*;
pub use reference::*;
pub use team::*;
pub use tournament::*;

mod filter;
mod registry;
mod view;

pub use filter::GameFilter;
pub use registry::{RegistryChange, SessionRegistry};
pub use view::FilteredGameView;

use crate::identifiers::GameId;
use serde::{Deserialize, Serialize};

/// Lobby state of an announced session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Open,
    Playing,
    Closed,
}

/// One game session visible in the lobby. Records are owned by the
/// `SessionRegistry` and mutated in place as the server announces
/// changes; views observe them by id instead of copying.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub id: GameId,
    pub title: String,
    pub host: String,
    pub map_name: String,
    pub featured_mod: String,
    pub num_players: u32,
    pub max_players: u32,
    pub min_rating: i32,
    pub max_rating: i32,
    pub password_protected: bool,
    /// Team label to player names, in announce order.
    pub teams: Vec<(String, Vec<String>)>,
    pub status: GameStatus,
}

impl GameSession {
    pub fn is_full(&self) -> bool {
        self.num_players >= self.max_players
    }

    pub fn rating_in_bounds(&self, rating: i32) -> bool {
        rating >= self.min_rating && rating <= self.max_rating
    }
}

/// Widget style used to render the filtered game list. Persisted in
/// the client preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Table,
    Tiles,
}

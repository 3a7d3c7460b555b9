use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one announced game session. Assigned by the lobby
/// server; unique for the lifetime of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(u32);

impl GameId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for GameId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<GameId> for u32 {
    fn from(id: GameId) -> Self {
        id.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

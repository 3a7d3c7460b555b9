use common::ViewMode;
use common::config::Validate;
use serde::{Deserialize, Serialize};

/// Presentation choices of the games screen that survive restarts.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub struct GamesConfig {
    pub view_mode: ViewMode,
    pub show_private_games: bool,
}

impl Validate for GamesConfig {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Table,
            show_private_games: true,
        }
    }
}

use common::config::Validate;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    /// Installation directory of the game executable. Joining a game
    /// is blocked until this points at an existing directory.
    pub game_directory: Option<String>,
    pub maps_directory: String,
}

impl Validate for PathsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.maps_directory.is_empty() {
            return Err("maps directory must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            game_directory: None,
            maps_directory: "maps".to_string(),
        }
    }
}

use common::config::Validate;
use serde::{Deserialize, Serialize};

/// Last values entered in the create-game dialog, so hosting a second
/// game starts from the previous settings.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct NewGameConfig {
    pub title: String,
    pub map_name: String,
    pub featured_mod: String,
    pub max_players: u32,
    pub min_rating: i32,
    pub max_rating: i32,
}

impl Validate for NewGameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_players < 2 {
            return Err(format!(
                "max players must be at least 2, got {}",
                self.max_players
            ));
        }
        if self.min_rating > self.max_rating {
            return Err(format!(
                "rating bounds are inverted: {} > {}",
                self.min_rating, self.max_rating
            ));
        }
        Ok(())
    }
}

impl Default for NewGameConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            map_name: "canis_river".to_string(),
            featured_mod: "vanilla".to_string(),
            max_players: 8,
            min_rating: 0,
            max_rating: 3000,
        }
    }
}

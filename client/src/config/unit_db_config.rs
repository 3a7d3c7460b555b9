use common::config::Validate;
use serde::{Deserialize, Serialize};

/// Which unit database site the browser view opens.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitDbVariant {
    #[default]
    Primary,
    Alternate,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct UnitDbConfig {
    pub variant: UnitDbVariant,
    pub primary_url: String,
    pub alternate_url: String,
}

impl UnitDbConfig {
    pub fn url_for(&self, variant: UnitDbVariant) -> &str {
        match variant {
            UnitDbVariant::Primary => &self.primary_url,
            UnitDbVariant::Alternate => &self.alternate_url,
        }
    }
}

impl Validate for UnitDbConfig {
    fn validate(&self) -> Result<(), String> {
        if self.primary_url.is_empty() || self.alternate_url.is_empty() {
            return Err("unit database URLs must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for UnitDbConfig {
    fn default() -> Self {
        Self {
            variant: UnitDbVariant::Primary,
            primary_url: "https://unitdb.armada-game.org".to_string(),
            alternate_url: "https://armada.fandom.com/wiki/Units".to_string(),
        }
    }
}

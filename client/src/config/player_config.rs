use common::config::Validate;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default)]
pub struct PlayerConfig {
    /// Callsign shown to other players. Generated on first start and
    /// persisted so restarts keep the same identity.
    pub name: Option<String>,
}

impl Validate for PlayerConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("player name must not be blank".to_string());
            }
        }
        Ok(())
    }
}

use common::config::Validate;
use serde::{Deserialize, Serialize};

use super::{
    ConfigManager, FileConfigStore, GamesConfig, NewGameConfig, PathsConfig, PlayerConfig,
    UnitDbConfig, YamlConfigSerializer,
};

const DEFAULT_CONFIG_FILE: &str = "armada_client_config.yaml";

pub type ClientConfigManager = ConfigManager<FileConfigStore, Config, YamlConfigSerializer>;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub games: GamesConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub unit_db: UnitDbConfig,
    #[serde(default)]
    pub new_game: NewGameConfig,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.player.validate()?;
        self.games.validate()?;
        self.paths.validate()?;
        self.unit_db.validate()?;
        self.new_game.validate()?;
        Ok(())
    }
}

pub fn get_config_manager(config_file: Option<&str>) -> ClientConfigManager {
    ClientConfigManager::from_yaml_file(config_file.unwrap_or(DEFAULT_CONFIG_FILE))
}

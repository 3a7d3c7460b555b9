mod games_config;
mod main_config;
mod new_game_config;
mod paths_config;
mod player_config;
mod unit_db_config;

pub(crate) use common::config::{ConfigManager, FileConfigStore, YamlConfigSerializer};

pub use games_config::GamesConfig;
pub use main_config::{ClientConfigManager, Config, get_config_manager};
pub use new_game_config::NewGameConfig;
pub use paths_config::PathsConfig;
pub use player_config::PlayerConfig;
pub use unit_db_config::{UnitDbConfig, UnitDbVariant};

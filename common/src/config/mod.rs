mod manager;
mod storage;

pub use manager::ConfigManager;
pub use storage::{ConfigSerializer, ConfigStore, FileConfigStore, Validate, YamlConfigSerializer};

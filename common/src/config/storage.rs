use serde::{Deserialize, Serialize};
use std::io::ErrorKind;

/// Structural validation of a deserialized config section. Runs on
/// every load and before every store.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub trait ConfigStore {
    /// `Ok(None)` means the store has no content yet and defaults apply.
    fn load(&self) -> Result<Option<String>, String>;
    fn store(&self, content: &str) -> Result<(), String>;
}

pub struct FileConfigStore {
    file_path: String,
}

impl FileConfigStore {
    pub fn new(file_path: String) -> Self {
        Self { file_path }
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Option<String>, String> {
        match std::fs::read_to_string(self.file_path.as_str()) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("Failed to read config file: {}", err)),
        }
    }

    fn store(&self, content: &str) -> Result<(), String> {
        std::fs::write(self.file_path.as_str(), content)
            .map_err(|e| format!("Failed to write config file: {}", e))
    }
}

pub trait ConfigSerializer<TConfig> {
    fn serialize(&self, config: &TConfig) -> Result<String, String>;
    fn deserialize(&self, content: &str) -> Result<TConfig, String>;
}

#[derive(Default)]
pub struct YamlConfigSerializer;

impl YamlConfigSerializer {
    pub fn new() -> Self {
        Self {}
    }
}

impl<TConfig> ConfigSerializer<TConfig> for YamlConfigSerializer
where
    TConfig: for<'de> Deserialize<'de> + Serialize,
{
    fn serialize(&self, config: &TConfig) -> Result<String, String> {
        serde_yaml_ng::to_string(config).map_err(|e| format!("Failed to serialize config: {}", e))
    }

    fn deserialize(&self, content: &str) -> Result<TConfig, String> {
        serde_yaml_ng::from_str(content)
            .map_err(|e| format!("Failed to deserialize config: {}", e))
    }
}

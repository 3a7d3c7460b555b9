use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use super::{ConfigSerializer, ConfigStore, FileConfigStore, Validate, YamlConfigSerializer};

/// Cached, validated access to a single config value. Cheap to clone
/// handles are not provided; share via the owning service instead.
pub struct ConfigManager<TStore, TConfig, TSerializer = YamlConfigSerializer>
where
    TStore: ConfigStore,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TSerializer: ConfigSerializer<TConfig>,
{
    serializer: TSerializer,
    store: TStore,
    cached: Arc<Mutex<Option<TConfig>>>,
}

impl<TConfig> ConfigManager<FileConfigStore, TConfig, YamlConfigSerializer>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: &str) -> Self {
        Self {
            cached: Arc::new(Mutex::new(None)),
            store: FileConfigStore::new(file_path.to_string()),
            serializer: YamlConfigSerializer::new(),
        }
    }
}

impl<TStore, TConfig, TSerializer> ConfigManager<TStore, TConfig, TSerializer>
where
    TStore: ConfigStore,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(store: TStore, serializer: TSerializer) -> Self {
        Self {
            cached: Arc::new(Mutex::new(None)),
            store,
            serializer,
        }
    }

    pub fn get_config(&self) -> Result<TConfig, String> {
        let mut cached = self.cached.lock().unwrap();

        if let Some(config) = cached.as_ref() {
            return Ok(config.clone());
        }

        if let Some(content) = self.store.load()? {
            let config = self.serializer.deserialize(&content)?;
            config
                .validate()
                .map_err(|e| format!("Config validation error: {}", e))?;
            *cached = Some(config.clone());
            return Ok(config);
        }

        Ok(TConfig::default())
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let content = self.serializer.serialize(config)?;
        self.store.store(&content)?;

        let mut cached = self.cached.lock().unwrap();
        *cached = Some(config.clone());
        Ok(())
    }
}

use crate::config::ClientConfigManager;
use common::log;
use std::path::Path;

pub fn is_valid_game_directory(path: &str) -> bool {
    Path::new(path).is_dir()
}

/// Whether the configured game directory currently points at a real
/// directory. A stale path (uninstalled game, moved drive) counts as
/// unset.
pub fn game_directory_set(config_manager: &ClientConfigManager) -> bool {
    match config_manager.get_config() {
        Ok(config) => config
            .paths
            .game_directory
            .as_deref()
            .is_some_and(is_valid_game_directory),
        Err(e) => {
            log!("Failed to read config while checking game directory: {}", e);
            false
        }
    }
}

/// Opens the native directory chooser and persists the selection.
/// Returns `None` if the player cancelled, otherwise whether the
/// chosen path was accepted. Blocks the UI thread while open, same as
/// every other native dialog here.
pub fn choose_game_directory(config_manager: &ClientConfigManager) -> Option<bool> {
    let chosen = rfd::FileDialog::new()
        .set_title("Select game directory")
        .pick_folder()?;

    let path = chosen.to_string_lossy().to_string();
    if !is_valid_game_directory(&path) {
        log!("Rejected game directory {}", path);
        return Some(false);
    }

    let mut config = match config_manager.get_config() {
        Ok(config) => config,
        Err(e) => {
            log!("Failed to read config while storing game directory: {}", e);
            return Some(false);
        }
    };
    config.paths.game_directory = Some(path.clone());
    match config_manager.set_config(&config) {
        Ok(()) => {
            log!("Game directory set to {}", path);
            Some(true)
        }
        Err(e) => {
            log!("Failed to persist game directory: {}", e);
            Some(false)
        }
    }
}

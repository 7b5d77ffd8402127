//! Settings persistence
//!
//! Saves and loads [`GameSettings`] to/from a JSON file.
//!
//! # File Location
//!
//! Settings live in `settings.json` in the user's configuration directory,
//! e.g. `~/.config/kfchess/settings.json`. When no configuration directory
//! can be determined the working directory is used instead. `--config`
//! overrides both.
//!
//! # Error Handling
//!
//! [`load_or_default`] never fails: a missing or unreadable file falls back
//! to defaults with a warning. [`load_settings`] and [`save_settings`] return
//! [`CoreResult`] for callers that need to know.

use crate::core::error::CoreResult;
use crate::input::KeyBindings;
use directories::ProjectDirs;
use kfchess_engine::{EngineConfig, LayoutKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// Default `tracing` filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// User preferences for a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub engine: EngineConfig,
    pub layout: LayoutKind,
    pub log_filter: String,
    pub keys: KeyBindings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            layout: LayoutKind::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            keys: KeyBindings::default(),
        }
    }
}

/// Resolve the default settings file path
///
/// Falls back to a local `settings.json` if the system config dir cannot be
/// found.
pub fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "kfchess", "KFChess") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        PathBuf::from(SETTINGS_FILENAME)
    }
}

/// Strict load: I/O and parse errors are returned
pub fn load_settings(path: &Path) -> CoreResult<GameSettings> {
    let contents = fs::read_to_string(path)?;
    let settings = serde_json::from_str(&contents)?;
    info!("[SETTINGS] Loaded settings from {:?}", path);
    Ok(settings)
}

/// Load settings, using defaults when the file is missing or invalid
pub fn load_or_default(path: &Path) -> GameSettings {
    if !path.exists() {
        info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path);
        return GameSettings::default();
    }
    match load_settings(path) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(
                "[SETTINGS] Failed to load settings file at {:?}: {}. Using defaults.",
                path, e
            );
            GameSettings::default()
        }
    }
}

/// Write `settings` as pretty JSON, creating the parent directory if needed
pub fn save_settings(settings: &GameSettings, path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    info!("[SETTINGS] Saved settings to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CoreError;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("kfchess-settings-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path(SETTINGS_FILENAME);
        let mut settings = GameSettings::default();
        settings.layout = LayoutKind::BackRank;
        settings.engine.slowdown_factor = 1;

        save_settings(&settings, &path).expect("save should create the directory");
        let loaded = load_settings(&path).expect("load saved file");
        assert_eq!(loaded, settings);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = temp_path("absent.json");
        assert_eq!(load_or_default(&path), GameSettings::default());
        assert!(matches!(load_settings(&path), Err(CoreError::Io(_))));
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        //! A corrupt file is reported by the strict loader and ignored by the
        //! lenient one
        let path = temp_path(SETTINGS_FILENAME);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_settings(&path),
            Err(CoreError::SettingsSerialization(_))
        ));
        assert_eq!(load_or_default(&path), GameSettings::default());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings: GameSettings =
            serde_json::from_str(r#"{"layout": "back_rank", "engine": {"tick_interval_ms": 16}}"#)
                .unwrap();
        assert_eq!(settings.layout, LayoutKind::BackRank);
        assert_eq!(settings.engine.tick_interval_ms, 16);
        assert_eq!(settings.engine.move_duration_ms, 2000);
        assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
    }
}

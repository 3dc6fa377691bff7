//! Settings file for screen-spots.
//!
//! Stored as YAML in `~/.config/screen-spots/config.yaml` (platform config
//! directory elsewhere). Every field has a serde default, so a partial or
//! empty file is valid.

use crate::error::ConfigError;
use crate::types::LogLevel;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "screen-spots";
const CONFIG_FILE: &str = "config.yaml";

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the per-profile spot files.
    /// `None` means the config directory itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spots_dir: Option<PathBuf>,

    /// Heatmap dot colour as `AARRGGBB` or `RRGGBB` hex
    #[serde(default = "crate::defaults::heatmap_color")]
    pub heatmap_color: String,

    /// Heatmap dot radius in pixels
    #[serde(default = "crate::defaults::heatmap_size")]
    pub heatmap_size: u32,

    /// Move the cursor in small steps instead of jumping.
    /// Some games do not register instant cursor warps.
    #[serde(default = "crate::defaults::bool_false")]
    pub slow_move_enabled: bool,

    #[serde(default = "crate::defaults::slow_move_distance")]
    pub slow_move_distance: u32,

    #[serde(default = "crate::defaults::slow_move_tick_ms")]
    pub slow_move_tick_ms: u64,

    #[serde(default = "crate::defaults::click_hold_us")]
    pub click_hold_us: u64,

    /// Pause between reaching the target and releasing the button on swipe
    #[serde(default = "crate::defaults::drag_release_delay_ms")]
    pub drag_release_delay_ms: u64,

    #[serde(default = "crate::defaults::watch_debounce_ms")]
    pub watch_debounce_ms: u64,

    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spots_dir: None,
            heatmap_color: crate::defaults::heatmap_color(),
            heatmap_size: crate::defaults::heatmap_size(),
            slow_move_enabled: crate::defaults::bool_false(),
            slow_move_distance: crate::defaults::slow_move_distance(),
            slow_move_tick_ms: crate::defaults::slow_move_tick_ms(),
            click_hold_us: crate::defaults::click_hold_us(),
            drag_release_delay_ms: crate::defaults::drag_release_delay_ms(),
            watch_debounce_ms: crate::defaults::watch_debounce_ms(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        log::info!(
            "Config file not found, creating default at {:?}",
            config_path
        );
        let config = Self::default();
        if let Err(e) = config.save_to(&config_path) {
            log::error!("Failed to save default config: {}", e);
            return Err(e);
        }
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if contents.trim().is_empty() {
            log::info!("Config file {:?} is empty, using defaults", path);
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml_ng::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(io_err)?;
        fs::rename(&temp_path, path).map_err(io_err)?;

        Ok(())
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.slow_move_distance == 0 {
            return Err(ConfigError::Validation(
                "slow_move_distance must be greater than 0".to_string(),
            ));
        }
        let color = self.heatmap_color.trim_start_matches('#');
        if !matches!(color.len(), 6 | 8) || !color.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::Validation(format!(
                "heatmap_color must be 6 or 8 hex digits, got {:?}",
                self.heatmap_color
            )));
        }
        Ok(())
    }

    /// Directory holding the config file and, by default, the spot files
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    /// Directory the spot files live in
    pub fn spots_dir(&self) -> PathBuf {
        self.spots_dir.clone().unwrap_or_else(Self::config_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.heatmap_color, "ff0F9D58");
        assert_eq!(config.heatmap_size, 5);
        assert!(!config.slow_move_enabled);
        assert_eq!(config.slow_move_distance, 200);
        assert_eq!(config.click_hold_us, 16_000);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "slow_move_enabled: true\nheatmap_size: 9\n";
        let config: Config = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(config.slow_move_enabled);
        assert_eq!(config.heatmap_size, 9);
        assert_eq!(config.slow_move_distance, 200);
        assert_eq!(config.drag_release_delay_ms, 50);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        let config = Config {
            spots_dir: Some(PathBuf::from("/srv/spots")),
            slow_move_enabled: true,
            log_level: LogLevel::Debug,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("yaml.tmp").exists());
    }

    #[test]
    fn test_load_empty_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_corrupt_file_returns_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "heatmap_size: [[[").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            slow_move_distance: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));

        let config = Config {
            heatmap_color: "green".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            heatmap_color: "#0F9D58".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_spots_dir_override() {
        let config = Config {
            spots_dir: Some(PathBuf::from("/data/spots")),
            ..Config::default()
        };
        assert_eq!(config.spots_dir(), PathBuf::from("/data/spots"));
        assert_eq!(Config::default().spots_dir(), Config::config_dir());
    }
}

// Application settings persisted between runs
// I/O preferences only: sequence data does not survive a restart

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No config directory available on this platform")]
    NoConfigDir,
}

/// I/O preferences and timing defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// MIDI port names to reconnect to; first available port when absent.
    pub midi_input_port: Option<String>,
    pub midi_output_port: Option<String>,

    /// 1-based MIDI channel for note output.
    pub channel: u8,

    /// Gate length for emitted notes, in milliseconds.
    pub note_length_ms: u64,

    /// How long the current-step indicator lights after a pulse.
    pub blink_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            midi_input_port: None,
            midi_output_port: None,
            channel: 1,
            note_length_ms: 500,
            blink_ms: 100,
        }
    }
}

impl AppConfig {
    /// Load from the default location; a missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&contents)?;
        config.sanitize();
        Ok(config)
    }

    /// Save to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default settings file location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("stepcycle").join("config.json"))
    }

    /// Force loaded values back into range.
    fn sanitize(&mut self) {
        self.channel = self.channel.clamp(1, 16);
        self.note_length_ms = self.note_length_ms.min(1000);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.channel, 1);
        assert_eq!(config.note_length_ms, 500);
        assert_eq!(config.blink_ms, 100);
        assert!(config.midi_input_port.is_none());
        assert!(config.midi_output_port.is_none());
    }

    #[test]
    fn test_save_load_cycle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig {
            midi_input_port: Some("Clock In".to_string()),
            midi_output_port: Some("Synth Out".to_string()),
            channel: 10,
            note_length_ms: 250,
            blink_ms: 80,
        };

        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.json");

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("config.json");

        AppConfig::default().save_to(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_out_of_range_values_sanitized_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{"channel": 42, "note_length_ms": 9999}"#).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();

        assert_eq!(loaded.channel, 16);
        assert_eq!(loaded.note_length_ms, 1000);
    }

    #[test]
    fn test_unknown_fields_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{"channel": 2, "legacy_field": true}"#).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();

        assert_eq!(loaded.channel, 2);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, "not json").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}

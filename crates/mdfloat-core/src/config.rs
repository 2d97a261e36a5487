//! Configuration management for mdfloat.
//!
//! The config file doubles as the persistence collaborator for the global
//! shortcut: the last successfully registered binding is stored as two plain
//! integers so it survives restarts.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::APP_NAME;
use crate::binding::HotkeyBinding;
use crate::registry::BindingStore;

/// Configuration structure for the application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Virtual key code of the global shortcut
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey_key_code: Option<u32>,

    /// Modifier mask of the global shortcut (Carbon bit values)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey_modifiers: Option<u32>,

    /// Length of the show animation in milliseconds
    #[serde(
        default = "default_show_duration_ms",
        skip_serializing_if = "is_default_show_duration_ms"
    )]
    pub show_duration_ms: u64,

    /// Length of the hide animation in milliseconds
    #[serde(
        default = "default_hide_duration_ms",
        skip_serializing_if = "is_default_hide_duration_ms"
    )]
    pub hide_duration_ms: u64,
}

fn default_show_duration_ms() -> u64 {
    120
}

fn is_default_show_duration_ms(v: &u64) -> bool {
    *v == default_show_duration_ms()
}

fn default_hide_duration_ms() -> u64 {
    80
}

fn is_default_hide_duration_ms(v: &u64) -> bool {
    *v == default_hide_duration_ms()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkey_key_code: None,
            hotkey_modifiers: None,
            show_duration_ms: default_show_duration_ms(),
            hide_duration_ms: default_hide_duration_ms(),
        }
    }
}

impl Config {
    /// The persisted shortcut. A stored key code without modifiers reads as
    /// an empty mask, which the validator then refuses.
    pub fn hotkey(&self) -> Option<HotkeyBinding> {
        self.hotkey_key_code
            .map(|key_code| HotkeyBinding::from_raw(key_code, self.hotkey_modifiers.unwrap_or(0)))
    }

    pub fn set_hotkey(&mut self, binding: HotkeyBinding) {
        self.hotkey_key_code = Some(binding.key_code);
        self.hotkey_modifiers = Some(binding.modifiers.bits());
    }

    pub fn show_duration(&self) -> Duration {
        Duration::from_millis(self.show_duration_ms)
    }

    pub fn hide_duration(&self) -> Duration {
        Duration::from_millis(self.hide_duration_ms)
    }
}

/// Manages loading and saving the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new ConfigManager with the default configuration directory.
    pub fn new() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    /// Creates a new ConfigManager with a specified configuration directory.
    pub fn with_config_dir<P: AsRef<std::path::Path>>(dir: P) -> Self {
        let config_path = dir.as_ref().join(format!("{}.toml", APP_NAME));
        Self { config_path }
    }

    /// Returns the default path to the configuration file.
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to retrieve configuration directory")?;
        Ok(config_dir.join(APP_NAME).join(format!("{}.toml", APP_NAME)))
    }

    /// Loads the configuration from the config file or returns default.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let config_content = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config file at {:?}", self.config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file at {:?}", self.config_path))?;

        Ok(config)
    }

    /// Saves the configuration to the config file, only writing non-default fields.
    pub fn save(&self, config: &Config) -> Result<()> {
        let config_dir = self
            .config_path
            .parent()
            .with_context(|| format!("Failed to get parent directory of {:?}", self.config_path))?;

        fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config directory at {:?}", config_dir))?;

        let serialized =
            toml::to_string_pretty(&config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, serialized)
            .with_context(|| format!("Failed to write config file at {:?}", self.config_path))?;

        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path(&self) -> &std::path::Path {
        &self.config_path
    }
}

impl BindingStore for ConfigManager {
    fn load_binding(&self) -> Result<Option<HotkeyBinding>> {
        Ok(self.load()?.hotkey())
    }

    /// Rewrites only the shortcut, keeping whatever else is in the file.
    fn save_binding(&mut self, binding: HotkeyBinding) -> Result<()> {
        let mut config = self.load()?;
        config.set_hotkey(binding);
        self.save(&config)?;
        debug!(binding = %binding, path = ?self.config_path, "shortcut persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::binding::Modifiers;

    #[test]
    fn test_load_default_config() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.hotkey(), None);
        assert_eq!(config.show_duration(), Duration::from_millis(120));
        assert_eq!(config.hide_duration(), Duration::from_millis(80));
    }

    #[test]
    fn test_save_creates_config_file() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path().join("nested"));
        manager.save(&Config::default()).unwrap();
        assert!(manager.config_path().exists());
    }

    #[test]
    fn test_default_config_serializes_empty() {
        let serialized = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(serialized.trim().is_empty());
    }

    #[test]
    fn test_binding_store_round_trip() {
        let temp = tempdir().expect("Failed to create temp dir");
        let mut manager = ConfigManager::with_config_dir(temp.path());
        assert_eq!(manager.load_binding().unwrap(), None);

        let binding = HotkeyBinding::new(0x28, Modifiers::CONTROL | Modifiers::OPTION);
        manager.save_binding(binding).unwrap();
        assert_eq!(manager.load_binding().unwrap(), Some(binding));

        let raw = fs::read_to_string(manager.config_path()).unwrap();
        assert!(raw.contains("hotkey_key_code = 40"));
        assert!(raw.contains("hotkey_modifiers = 6144"));
    }

    #[test]
    fn test_save_binding_keeps_other_settings() {
        let temp = tempdir().expect("Failed to create temp dir");
        let mut manager = ConfigManager::with_config_dir(temp.path());
        let config = Config {
            show_duration_ms: 200,
            ..Default::default()
        };
        manager.save(&config).unwrap();

        manager.save_binding(HotkeyBinding::DEFAULT).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.show_duration_ms, 200);
        assert_eq!(loaded.hotkey(), Some(HotkeyBinding::DEFAULT));
    }

    #[test]
    fn test_key_code_without_modifiers() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());
        fs::write(manager.config_path(), "hotkey_key_code = 46\n").unwrap();

        let binding = manager.load_binding().unwrap().unwrap();
        assert_eq!(binding.key_code, 0x2E);
        assert!(binding.modifiers.is_empty());
    }

    #[test]
    fn test_unparseable_config_is_an_error() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());
        fs::write(manager.config_path(), "hotkey_key_code = \"M\"\n").unwrap();
        assert!(manager.load().is_err());
    }
}

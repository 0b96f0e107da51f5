//! Engine settings: bridge address, application key, API port.
//!
//! Stored as JSON in the OS config directory; the environment variables
//! `HUE_BRIDGE_IP` and `HUE_APPLICATION_KEY` override the file. There is
//! a development fallback for the bridge IP but none for the key.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Development fallback bridge address.
pub const DEFAULT_BRIDGE_IP: &str = "192.168.87.51";

const SETTINGS_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub version: u32,
    pub bridge_ip: String,
    /// The `hue-application-key` value. Required to start; never logged.
    #[serde(default)]
    pub application_key: Option<String>,
    /// Port for the HTTP tool surface. 0 picks a random port.
    #[serde(default)]
    pub api_port: u16,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            bridge_ip: DEFAULT_BRIDGE_IP.to_string(),
            application_key: None,
            api_port: 0,
        }
    }
}

impl AppSettings {
    /// Overlay explicit values (usually from the environment) onto the
    /// loaded settings.
    pub fn with_overrides(
        mut self,
        bridge_ip: Option<String>,
        application_key: Option<String>,
    ) -> Self {
        if let Some(ip) = bridge_ip.filter(|s| !s.is_empty()) {
            self.bridge_ip = ip;
        }
        if let Some(key) = application_key.filter(|s| !s.is_empty()) {
            self.application_key = Some(key);
        }
        self
    }

    /// Apply `HUE_BRIDGE_IP` / `HUE_APPLICATION_KEY` from the process
    /// environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("HUE_BRIDGE_IP").ok(),
            std::env::var("HUE_APPLICATION_KEY").ok(),
        )
    }
}

/// `$XDG_CONFIG_HOME/hue-conductor`, falling back to `~/.config`.
pub fn default_config_dir() -> PathBuf {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("hue-conductor")
}

fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.json")
}

/// Load settings from the config directory. Returns None when no
/// settings file exists or it cannot be parsed.
pub fn load_settings(config_dir: &Path) -> Option<AppSettings> {
    let raw = std::fs::read_to_string(settings_path(config_dir)).ok()?;
    serde_json::from_str(&raw).ok()
}

pub fn save_settings(config_dir: &Path, settings: &AppSettings) -> Result<(), AppError> {
    std::fs::create_dir_all(config_dir).map_err(|e| AppError::state(e.to_string()))?;
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(settings_path(config_dir), json).map_err(|e| AppError::state(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let dir = std::env::temp_dir().join("hue_conductor_test_settings");
        let _ = std::fs::remove_dir_all(&dir);

        let settings = AppSettings {
            bridge_ip: "10.0.0.2".to_string(),
            application_key: Some("abc123".to_string()),
            api_port: 8484,
            ..AppSettings::default()
        };
        save_settings(&dir, &settings).unwrap();

        let loaded = load_settings(&dir).expect("should load");
        assert_eq!(loaded.bridge_ip, "10.0.0.2");
        assert_eq!(loaded.application_key.as_deref(), Some("abc123"));
        assert_eq!(loaded.api_port, 8484);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_missing_returns_none() {
        let dir = std::env::temp_dir().join("hue_conductor_test_no_settings");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(load_settings(&dir).is_none());
    }

    #[test]
    fn overrides_win_but_empty_values_do_not() {
        let settings = AppSettings::default()
            .with_overrides(Some("10.1.1.1".to_string()), Some(String::new()));
        assert_eq!(settings.bridge_ip, "10.1.1.1");
        assert!(settings.application_key.is_none());

        let settings = settings.with_overrides(None, Some("key".to_string()));
        assert_eq!(settings.bridge_ip, "10.1.1.1");
        assert_eq!(settings.application_key.as_deref(), Some("key"));
    }
}

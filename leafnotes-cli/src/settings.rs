//! Application settings persistence for the Leafnotes CLI.
//!
//! Stores user preferences (workspace location, log level, autosave timing)
//! in a JSON file at an OS-appropriate location.

use leafnotes_core::AutosaveConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// SQLite file holding the note tree.
    pub workspace_path: String,
    /// One of `trace`, `debug`, `info`, `warn`, `error`, `off`.
    pub log_level: String,
    pub autosave_delay_ms: u64,
    pub saved_indicator_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        let autosave = AutosaveConfig::default();
        Self {
            workspace_path: default_workspace_path().to_string_lossy().to_string(),
            log_level: "info".to_string(),
            autosave_delay_ms: autosave.quiet_period.as_millis() as u64,
            saved_indicator_ms: autosave.saved_display.as_millis() as u64,
        }
    }
}

impl AppSettings {
    pub fn autosave_config(&self) -> AutosaveConfig {
        AutosaveConfig {
            quiet_period: Duration::from_millis(self.autosave_delay_ms),
            saved_display: Duration::from_millis(self.saved_indicator_ms),
        }
    }
}

/// Returns the path to the settings JSON file.
///
/// - macOS / Linux: `~/.config/leafnotes/settings.json`
/// - Windows: `%APPDATA%/Leafnotes/settings.json`
pub fn settings_file_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("Leafnotes").join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("leafnotes").join("settings.json")
    }
}

/// Returns the default database location: `<data dir>/leafnotes/notes.db`.
pub fn default_workspace_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local")
                .join("share")
        })
        .join("leafnotes")
        .join("notes.db")
}

/// Loads settings from the default location.
pub fn load_settings() -> Result<AppSettings, String> {
    load_settings_from(&settings_file_path())
}

/// Loads settings from `path`. A missing file gives defaults; a file that
/// does not parse is an error so the caller can report it once logging is up.
pub fn load_settings_from(path: &Path) -> Result<AppSettings, String> {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content)
            .map_err(|e| format!("Ignoring unreadable settings at {}: {e}", path.display())),
        Err(_) => Ok(AppSettings::default()),
    }
}

/// Saves settings to the default location.
pub fn save_settings(settings: &AppSettings) -> Result<(), String> {
    save_settings_to(&settings_file_path(), settings)
}

/// Saves settings to `path`, creating parent directories as needed.
pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create settings directory: {e}"))?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, json).map_err(|e| format!("Failed to write settings: {e}"))?;
    Ok(())
}

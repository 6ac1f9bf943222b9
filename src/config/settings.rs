//! Application settings and TOML persistence.
//!
//! The settings record is deliberately small: the folder holding the
//! synthesized audio files and the most recently used word-list file.
//! Both default to empty strings on first run or when the file on disk
//! is missing or unreadable; the file is rewritten in full on every
//! change.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// User-visible application settings, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use spelling_trainer::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Folder where synthesized audio artifacts are cached.
    ///
    /// Empty until the user picks one; the app then falls back to the
    /// platform data directory (see [`AppPaths::audio_dir`]).
    pub audio_folder: String,

    /// Path of the last word-list file the user loaded or saved.
    ///
    /// Restored on startup so the previous list reappears in the setup
    /// screen; empty when no file has been used yet.
    pub last_words_file: String,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

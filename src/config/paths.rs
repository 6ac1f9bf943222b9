//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings + statistics):
//!   Windows: %APPDATA%\spelling-trainer\
//!   macOS:   ~/Library/Application Support/spelling-trainer/
//!   Linux:   ~/.config/spelling-trainer/
//!
//! Data dir (default audio cache when no folder is configured):
//!   Windows: %LOCALAPPDATA%\spelling-trainer\
//!   macOS:   ~/Library/Application Support/spelling-trainer/
//!   Linux:   ~/.local/share/spelling-trainer/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `stats.json`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to `stats.json`.
    pub stats_file: PathBuf,
    /// Default directory for synthesized audio files, used until the user
    /// picks an explicit folder in the setup screen.
    pub audio_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "spelling-trainer";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let stats_file = config_dir.join("stats.json");
        let audio_dir = data_dir.join("audio");

        Self {
            config_dir,
            settings_file,
            stats_file,
            audio_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

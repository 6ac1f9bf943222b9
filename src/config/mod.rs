//! Configuration module for the spelling trainer.
//!
//! Provides `AppConfig` (user-visible settings), `AppPaths` for
//! cross-platform config/data directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::AppConfig;

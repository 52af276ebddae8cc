//! Configuration module for repo-scout
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "REPO_SCOUT_SETTINGS_PATH";

/// Candidate settings file locations, in lookup order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("repo-scout/settings.yml"));
    }
    paths
}

/// First existing settings file: the explicit path, then the defaults
pub fn locate() -> Option<PathBuf> {
    let explicit = std::env::var(SETTINGS_PATH_ENV).ok().map(PathBuf::from);

    explicit
        .into_iter()
        .chain(default_paths())
        .find(|path| path.exists())
}

/// Load settings from `path` (or defaults), then apply env overrides and validate
pub fn load_from(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let mut settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

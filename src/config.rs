//! User settings stored in `settings.toml`.
//!
//! The directory is resolved in this order: the `--config-dir` flag, the
//! `SHADER_GALLERY_CONFIG_DIR` environment variable, then the platform
//! config directory. A missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::theme::ThemeMode;

const APP_DIR: &str = "shader-gallery";
const CONFIG_FILE: &str = "settings.toml";

pub const ENV_CONFIG_DIR: &str = "SHADER_GALLERY_CONFIG_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Last theme picked by the user; unset means follow the system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// JSON array of image paths, takes priority over the manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_root: Option<PathBuf>,

    /// TTF with Devanagari coverage for the ink background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph_font: Option<PathBuf>,
}

pub fn config_dir(cli_override: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = cli_override {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(ENV_CONFIG_DIR) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(ConfigError::NoConfigDir)
}

pub fn settings_path(cli_override: Option<&Path>) -> Result<PathBuf, ConfigError> {
    Ok(config_dir(cli_override)?.join(CONFIG_FILE))
}

pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    Ok(toml::from_str(&text)?)
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io { path: parent.to_path_buf(), source })?;
    }
    let text = toml::to_string_pretty(config)?;
    fs::write(path, text).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })
}

/// Loads settings, falling back to defaults (with a warning) on any error.
pub fn load_or_default(path: &Path) -> Config {
    load_from_path(path).unwrap_or_else(|e| {
        warn!("Ignoring settings at {:?}: {}", path, e);
        Config::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from_path(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let mut config = Config::default();
        config.general.theme = Some(ThemeMode::Dark);
        config.gallery.manifest = Some("assets/images/gallery.json".into());

        save_to_path(&config, &path).unwrap();
        assert_eq!(load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[general]\ntheme = \"light\"\n").unwrap();

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.general.theme, Some(ThemeMode::Light));
        assert_eq!(config.gallery, GalleryConfig::default());
    }

    #[test]
    fn broken_file_is_reported_then_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[general\ntheme = ").unwrap();

        assert!(matches!(load_from_path(&path), Err(ConfigError::Parse(_))));
        assert_eq!(load_or_default(&path), Config::default());
    }

    #[test]
    fn cli_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(config_dir(Some(dir.path())).unwrap(), dir.path());
        assert_eq!(settings_path(Some(dir.path())).unwrap(), dir.path().join(CONFIG_FILE));
    }
}

//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info, warn};
use thiserror::Error;

use filecascade::{FileCascadeError, builtin::is_supported_encoding, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for FileCascadeError {
    fn from(err: ConfigError) -> Self {
        FileCascadeError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (filecascade/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path to config file
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or is invalid
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, FileCascadeError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("filecascade/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "filecascade", "filecascade") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load and validate configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
/// - The configuration is rejected by [`validate_config`]
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, FileCascadeError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    validate_config(&config)?;

    Ok(config)
}

/// Check the parsing settings against what the stock parsers support.
///
/// An unreadable encoding is rejected up front, so that no item gets
/// discovered or planned before failing. Background parsing of collection
/// items is accepted but logged, as collections will refuse it.
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let parsing = config.parsing();

    let encoding = parsing.encoding().trim();
    if encoding.is_empty() {
        return Err(ConfigError::Validation("parsing.encoding must not be empty".to_string()));
    }
    if !is_supported_encoding(encoding) {
        return Err(ConfigError::Validation(format!(
            "parsing.encoding '{encoding}' cannot be decoded, only utf-8 is supported"
        )));
    }

    if parsing.background_children() {
        warn!("parsing.background_children is set, collections will fail to parse");
    }

    debug!(
        strict_matching = parsing.strict_matching(),
        encoding = encoding;
        "Configuration validated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[parsing]\nstrict_matching = true\nencoding = \"UTF-8\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert!(config.parsing().strict_matching());
        assert_eq!(config.parsing().encoding(), "UTF-8");
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = TempDir::new().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml"))).unwrap_err();

        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[parsing]\nencoding = \"\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();

        assert!(err.to_string().contains("Validation error"));
    }

    #[test]
    fn test_unsupported_encoding_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[parsing]\nencoding = \"latin-1\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();

        assert!(err.to_string().contains("'latin-1' cannot be decoded"));
    }

    #[test]
    fn test_background_children_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[parsing]\nbackground_children = true\n").unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert!(config.parsing().background_children());
    }

    #[test]
    fn test_malformed_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[parsing\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();

        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }
}

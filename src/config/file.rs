//! Configuration file loading.
//!
//! This module handles loading configuration from TOML files at
//! XDG-compliant locations.

use crate::config::types::ActionsConfig;
use crate::error::ActionError;
use std::path::{Path, PathBuf};

/// Default configuration file name for project-local config.
const LOCAL_CONFIG_NAME: &str = "acton-actions.toml";

/// Default configuration file name within XDG config directory.
const XDG_CONFIG_NAME: &str = "config.toml";

/// Application name for XDG directory lookup.
const APP_NAME: &str = "acton-actions";

/// Loads configuration from the default search paths.
///
/// Search order:
/// 1. `./acton-actions.toml` (project-local)
/// 2. `~/.config/acton-actions/config.toml` (XDG config)
///
/// Returns the default configuration if no config file is found.
///
/// # Errors
///
/// Returns a `Configuration` error if a config file exists but cannot be
/// read, parsed, or validated.
pub fn load() -> Result<ActionsConfig, ActionError> {
    match search_paths().into_iter().find(|path| path.exists()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading configuration");
            from_path(&path)
        }
        None => Ok(ActionsConfig::default()),
    }
}

/// Loads configuration from a specific file path.
///
/// # Errors
///
/// Returns a `Configuration` error if:
/// - The file cannot be read
/// - The file contains invalid TOML
/// - The TOML doesn't match the expected schema
pub fn from_path(path: &Path) -> Result<ActionsConfig, ActionError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ActionError::configuration(
            "config_file",
            format!("failed to read '{}': {}", path.display(), e),
        )
    })?;

    from_str(&contents).map_err(|e| {
        ActionError::configuration(
            "config_file",
            format!("failed to load '{}': {}", path.display(), e.envelope_message()),
        )
    })
}

/// Parses configuration from a TOML string.
///
/// # Errors
///
/// Returns a `Configuration` error if the TOML is invalid, doesn't match
/// the schema, or fails validation.
///
/// # Example
///
/// ```rust
/// use acton_actions::config::from_str;
///
/// let config = from_str(r#"
/// exclude_actions = ["search_google"]
///
/// [validation]
/// unknown_fields = "ignore"
/// "#).unwrap();
///
/// assert_eq!(config.exclude_actions, vec!["search_google"]);
/// ```
pub fn from_str(toml_str: &str) -> Result<ActionsConfig, ActionError> {
    let config: ActionsConfig = toml::from_str(toml_str)
        .map_err(|e| ActionError::configuration("config", format!("invalid TOML: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Returns the paths that would be searched for configuration files.
#[must_use]
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_NAME)];

    if let Some(dir) = xdg_config_dir() {
        paths.push(dir.join(XDG_CONFIG_NAME));
    }

    paths
}

/// Returns the XDG config directory for this crate.
///
/// This is `~/.config/acton-actions` on most systems.
#[must_use]
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME))
}

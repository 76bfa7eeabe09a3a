//! XDG Base Directory paths for bolt.
//!
//! CLI tools should use XDG paths for cross-platform consistency,
//! not platform-native paths.

use std::path::PathBuf;

/// Application directory name under the XDG base directories.
const APP_DIR: &str = "bolt";

/// Environment variable that relocates the project config directory.
pub const PROJECT_CONFIG_DIR_ENV: &str = "BOLT_PROJECT_CONFIG_DIR";

/// Get the bolt config directory.
///
/// Returns `$XDG_CONFIG_HOME/bolt` if set, otherwise `~/.config/bolt`.
///
/// # Examples
///
/// ```
/// use bolt_paths::config_dir;
///
/// let config = config_dir();
/// assert!(config.ends_with("bolt"));
/// ```
pub fn config_dir() -> PathBuf {
    xdg_dir(std::env::var("XDG_CONFIG_HOME").ok(), ".config")
}

/// Path of the user-level `config.toml`.
pub fn user_config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Path of the project-level `config.toml`.
///
/// Defaults to `.bolt/config.toml` relative to the working directory. Can be
/// overridden with `BOLT_PROJECT_CONFIG_DIR` (useful for isolated tests).
pub fn project_config_file() -> PathBuf {
    project_config_file_from(std::env::var(PROJECT_CONFIG_DIR_ENV).ok())
}

fn project_config_file_from(override_dir: Option<String>) -> PathBuf {
    match override_dir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir).join("config.toml"),
        _ => PathBuf::from(".bolt").join("config.toml"),
    }
}

fn xdg_dir(xdg_base: Option<String>, home_relative: &str) -> PathBuf {
    match xdg_base {
        Some(base) if !base.is_empty() => PathBuf::from(base).join(APP_DIR),
        _ => match dirs::home_dir() {
            Some(home) => home.join(home_relative).join(APP_DIR),
            None => PathBuf::from(home_relative).join(APP_DIR),
        },
    }
}

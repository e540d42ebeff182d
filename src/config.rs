//! Runtime configuration for the command-line front end.
//!
//! Everything comes from command-line flags; the only thing read from the
//! environment is the platform's data location when no directory is given.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

const APP_DIR: &str = "moneymate";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Data directory is not a directory: {0}")]
    NotADirectory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding loans.json and expenses.json
    pub data_dir: PathBuf,

    /// Fallback tracing filter when RUST_LOG is not set
    pub log_filter: String,
}

impl Config {
    pub fn new(data_dir: Option<PathBuf>, verbose: bool) -> Result<Self, ConfigError> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        if data_dir.exists() && !data_dir.is_dir() {
            return Err(ConfigError::NotADirectory(data_dir));
        }

        Ok(Self {
            data_dir,
            log_filter: if verbose { "debug" } else { "warn" }.to_string(),
        })
    }
}

/// `$XDG_DATA_HOME/moneymate`, else `$HOME/.local/share/moneymate`, else
/// `./.moneymate`.
pub fn default_data_dir() -> PathBuf {
    data_dir_from(env::var_os("XDG_DATA_HOME"), env::var_os("HOME"))
}

fn data_dir_from(xdg_data_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    // Relative XDG paths are invalid per the base directory spec and are ignored
    if let Some(xdg) = xdg_data_home.map(PathBuf::from).filter(|p| p.is_absolute()) {
        return xdg.join(APP_DIR);
    }
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(".local/share").join(APP_DIR),
        None => PathBuf::from(".").join(format!(".{}", APP_DIR)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_xdg_data_home_wins() {
        let dir = data_dir_from(Some("/data".into()), Some("/home/sam".into()));
        assert_eq!(dir, PathBuf::from("/data/moneymate"));
    }

    #[test]
    fn test_relative_xdg_is_ignored() {
        let dir = data_dir_from(Some("data".into()), Some("/home/sam".into()));
        assert_eq!(dir, PathBuf::from("/home/sam/.local/share/moneymate"));
    }

    #[test]
    fn test_falls_back_to_working_directory() {
        let dir = data_dir_from(None, None);
        assert_eq!(dir, PathBuf::from("./.moneymate"));
    }

    #[test]
    fn test_verbose_sets_debug_filter() {
        let temp = TempDir::new().unwrap();
        let config = Config::new(Some(temp.path().to_path_buf()), true).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.data_dir, temp.path());
    }

    #[test]
    fn test_rejects_file_as_data_dir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("loans.json");
        std::fs::write(&file, "[]").unwrap();

        assert!(matches!(
            Config::new(Some(file), false),
            Err(ConfigError::NotADirectory(_))
        ));
    }
}

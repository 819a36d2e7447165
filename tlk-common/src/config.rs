//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TOML configuration file contents (`~/.config/tutorlink/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root data folder (database lives here)
    pub root_folder: Option<String>,
    /// Log filter directive, e.g. "info" or "tlk_fl=debug"
    pub log_filter: Option<String>,
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config) = load_toml_config() {
        if let Some(root_folder) = config.root_folder {
            return PathBuf::from(root_folder);
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Load the TOML config file for the platform, if present
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read config failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse config failed: {}", e)))
}

/// Get configuration file path for the platform
fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("tutorlink").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/tutorlink/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/tutorlink (or /var/lib/tutorlink for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("tutorlink"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/tutorlink"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("tutorlink"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/tutorlink"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("tutorlink"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\tutorlink"))
    } else {
        PathBuf::from("./tutorlink_data")
    }
}

/// Create the root folder if missing and return the database path inside it
pub fn ensure_root_folder(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root)
        .map_err(|e| Error::Config(format!("Failed to create root folder {:?}: {}", root, e)))?;
    Ok(root.join("tlk.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn cli_arg_wins_over_env() {
        std::env::set_var("TLK_TEST_ROOT", "/from/env");
        let resolved = resolve_root_folder(Some("/from/cli"), "TLK_TEST_ROOT");
        assert_eq!(resolved, PathBuf::from("/from/cli"));
        std::env::remove_var("TLK_TEST_ROOT");
    }

    #[test]
    #[serial]
    fn env_used_when_no_cli_arg() {
        std::env::set_var("TLK_TEST_ROOT", "/from/env");
        let resolved = resolve_root_folder(None, "TLK_TEST_ROOT");
        assert_eq!(resolved, PathBuf::from("/from/env"));
        std::env::remove_var("TLK_TEST_ROOT");
    }

    #[test]
    #[serial]
    fn empty_env_falls_through() {
        std::env::set_var("TLK_TEST_ROOT", "  ");
        let resolved = resolve_root_folder(None, "TLK_TEST_ROOT");
        assert_ne!(resolved, PathBuf::from("  "));
        std::env::remove_var("TLK_TEST_ROOT");
    }

    #[test]
    fn ensure_root_folder_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nested").join("data");
        let db_path = ensure_root_folder(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(db_path, root.join("tlk.db"));
    }
}

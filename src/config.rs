//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$CONVLIST_CONFIG` (environment variable)
//! 2. `~/.config/convlist/config.toml` (Linux/macOS)
//!    `%APPDATA%\convlist\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConvlistError, Result};
use crate::model::folder::FolderId;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Conversation view settings.
    pub threading: ThreadingConfig,
    /// Listing output settings.
    pub display: DisplayConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// `strftime` format string for dates in listings.
    pub date_format: String,
}

/// Conversation view settings, read-only inputs to the threading engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadingConfig {
    /// User setting: group the primary folder by conversation.
    pub enable_conversation_view: bool,
    /// User setting: continuous (live-scroll) loading instead of pages.
    pub enable_live_scroll: bool,
    /// Identity of the only folder rendered as conversations.
    pub primary_folder_id: FolderId,
    /// Folder label carried by records stored in the primary folder.
    pub primary_folder_label: String,
}

/// Listing output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Maximum subject width in columns.
    pub subject_width: usize,
    /// Indentation in columns for conversation items.
    pub indent: usize,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            cache_dir: None,
            date_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self {
            enable_conversation_view: true,
            enable_live_scroll: true,
            primary_folder_id: FolderId::new("inbox"),
            primary_folder_label: "inbox".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            subject_width: 50,
            indent: 2,
        }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match load_config_from(&path) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "Loaded config");
                    return cfg;
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to load config, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Read and parse a configuration file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConvlistError::io(path, e))?;
    toml::from_str::<Config>(&contents).map_err(|e| ConvlistError::InvalidConfig {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Save configuration to the standard location.
pub fn save_config(config: &Config) -> anyhow::Result<()> {
    let path = config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("CONVLIST_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("convlist").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("convlist")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("convlist.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.general.log_level, "warn");
        assert!(cfg.threading.enable_conversation_view);
        assert!(cfg.threading.enable_live_scroll);
        assert_eq!(cfg.threading.primary_folder_label, "inbox");
        assert_eq!(cfg.display.indent, 2);
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.threading.primary_folder_id, cfg.threading.primary_folder_id);
        assert_eq!(parsed.display.subject_width, cfg.display.subject_width);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[threading]
enable_live_scroll = false
primary_folder_id = "00AB12"
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert!(!cfg.threading.enable_live_scroll);
        assert_eq!(cfg.threading.primary_folder_id, FolderId::new("00ab12"));
        // Other fields use defaults
        assert!(cfg.threading.enable_conversation_view);
        assert_eq!(cfg.general.log_level, "warn");
    }

    #[test]
    fn test_load_config_from_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[display]\nsubject_width = 30\n").expect("write");

        let cfg = load_config_from(&path).expect("load");
        assert_eq!(cfg.display.subject_width, 30);
    }

    #[test]
    fn test_load_config_from_rejects_garbage() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[threading\nnot toml").expect("write");

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConvlistError::InvalidConfig { .. }));
    }

    #[test]
    fn test_log_file_path_honors_cache_dir() {
        let mut cfg = Config::default();
        cfg.general.cache_dir = Some(PathBuf::from("/tmp/convlist-test"));
        assert_eq!(
            log_file_path(&cfg),
            PathBuf::from("/tmp/convlist-test/convlist.log")
        );
    }
}

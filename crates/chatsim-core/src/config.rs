//! Configuration management for chatsim.
//!
//! Loads configuration from ${CHATSIM_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::content::PlaybackDefaults;
use crate::core::sequencer::StartBehavior;

/// Returns the default config template.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for chatsim configuration and log directories.
    //!
    //! CHATSIM_HOME resolution order:
    //! 1. CHATSIM_HOME environment variable (if set)
    //! 2. ~/.config/chatsim (default)
    //! 3. ./.chatsim when no home directory can be found

    use std::path::PathBuf;

    pub fn chatsim_home() -> PathBuf {
        if let Ok(home) = std::env::var("CHATSIM_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".chatsim"),
            |h| h.join(".config").join("chatsim"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        chatsim_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        chatsim_home().join("logs")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Start behavior for content that does not set one.
    pub start_behavior: StartBehavior,
    /// Always show the navigation bar, even when content hides it.
    pub show_navigation_bar: bool,
    /// Log filter used when RUST_LOG is unset.
    pub log_filter: String,
    /// File that screen-reader announcements are appended to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announce_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_behavior: StartBehavior::Auto,
            show_navigation_bar: false,
            log_filter: Self::DEFAULT_LOG_FILTER.to_string(),
            announce_file: None,
        }
    }
}

impl Config {
    const DEFAULT_LOG_FILTER: &str = "info";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    /// Fallbacks handed to the content sanitizer.
    pub fn playback_defaults(&self) -> PlaybackDefaults {
        PlaybackDefaults {
            start_behavior: self.start_behavior,
            force_navigation_bar: self.show_navigation_bar,
            start_override: None,
        }
    }
}

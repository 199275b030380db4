//! Configuration loading and management
//!
//! Handles parsing of `.ondone.toml` files at the vault root. All settings
//! have defaults; a missing file yields the default configuration, a
//! malformed one is an error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration file name at the vault root
pub const CONFIG_FILE: &str = ".ondone.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Archive action defaults
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Canvas board layout settings
    #[serde(default)]
    pub board: BoardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive: ArchiveConfig::default(),
            board: BoardConfig::default(),
        }
    }
}

/// Defaults used by the archive action when the config names no target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Archive document path, relative to the vault root
    #[serde(default = "default_archive_file")]
    pub default_file: String,

    /// Section heading inside the archive document
    #[serde(default = "default_archive_section")]
    pub default_section: String,
}

fn default_archive_file() -> String {
    "Archive/Completed Tasks.md".to_string()
}

fn default_archive_section() -> String {
    "Completed Tasks".to_string()
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            default_file: default_archive_file(),
            default_section: default_archive_section(),
        }
    }
}

/// Layout settings for text nodes synthesized into Canvas boards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Horizontal spacing between synthesized nodes
    #[serde(default = "default_node_spacing")]
    pub node_spacing: i64,

    /// Width of synthesized text nodes
    #[serde(default = "default_node_width")]
    pub node_width: i64,

    /// Height of synthesized text nodes
    #[serde(default = "default_node_height")]
    pub node_height: i64,
}

fn default_node_spacing() -> i64 {
    400
}

fn default_node_width() -> i64 {
    250
}

fn default_node_height() -> i64 {
    280
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            node_spacing: default_node_spacing(),
            node_width: default_node_width(),
            node_height: default_node_height(),
        }
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a vault root, falling back to defaults when
    /// no `.ondone.toml` exists
    pub fn load_from_vault(vault_root: &Path) -> Result<Self> {
        let path = vault_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.archive.default_file, "Archive/Completed Tasks.md");
        assert_eq!(config.archive.default_section, "Completed Tasks");
        assert_eq!(config.board.node_spacing, 400);
    }
}

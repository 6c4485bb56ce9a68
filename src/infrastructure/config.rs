//! Configuration file handling.
//!
//! Settings are read from a TOML file (`calltree.toml` by default). Every
//! section and key is optional; anything left out falls back to defaults.
//!
//! ```toml
//! [export]
//! graph_name = "CallTree"
//! rankdir = "LR"
//! rich_edge_labels = true
//!
//! [depth]
//! parallel = true
//! jobs = 4
//! ```

use crate::ports::DotStyle;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "calltree.toml";

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalltreeConfig {
    pub export: DotStyle,
    pub depth: DepthConfig,
}

/// How call depths are computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Spread per-source passes over a thread pool.
    pub parallel: bool,
    /// Worker count for the pool; 0 picks half of the available cores.
    pub jobs: usize,
}

impl CalltreeConfig {
    /// Load configuration from `path`. A missing file yields the defaults;
    /// an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

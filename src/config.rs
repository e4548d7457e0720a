//! Graph-building options loaded from TOML.
//!
//! ```toml
//! tables = ["nibrs_offense", "nibrs_offender", "nibrs_incident"]
//! compress = true
//! detail = "pk"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::builder::DetailLevel;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Tables to include, in key order. Empty means every table.
    #[serde(default)]
    pub tables: Vec<String>,
    /// Materialise per-label transitive edges after building.
    #[serde(default)]
    pub compress: bool,
    #[serde(default = "default_detail")]
    pub detail: String,
}

fn default_detail() -> String {
    "all".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            compress: false,
            detail: default_detail(),
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if DetailLevel::from_str(&self.detail).is_none() {
            return Err(ConfigError::UnknownDetail(self.detail.clone()));
        }
        let mut seen = HashSet::new();
        for table in &self.tables {
            if !seen.insert(table.to_lowercase()) {
                return Err(ConfigError::DuplicateTable(table.clone()));
            }
        }
        Ok(())
    }

    pub fn detail_level(&self) -> DetailLevel {
        DetailLevel::from_str(&self.detail).unwrap_or_default()
    }
}

//! Editor configuration
//!
//! Settings that shape an editing session: how node ids are minted, where
//! the viewport starts, and how saved documents are formatted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coords::Viewport;
use crate::error::ConfigError;
use crate::ingest::IdStrategy;

pub mod defaults {
    /// Indentation used when saving documents
    pub const SAVE_INDENT: usize = 2;
}

fn default_save_indent() -> usize {
    defaults::SAVE_INDENT
}

/// Configuration for an editor session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// How ids for dropped nodes are generated
    #[serde(default)]
    pub id_strategy: IdStrategy,
    /// Initial pan/zoom of the canvas
    #[serde(default)]
    pub viewport: Viewport,
    /// Spaces per indentation level in saved documents
    #[serde(default = "default_save_indent")]
    pub save_indent: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::default(),
            viewport: Viewport::default(),
            save_indent: defaults::SAVE_INDENT,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No editor config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        log::info!("Loaded editor config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport.validate()
    }
}

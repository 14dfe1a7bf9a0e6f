//! Pipeline configuration loaded from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level pipeline configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Rules deciding which files skip analysis entirely
    #[serde(default)]
    pub exclusion: ExclusionConfig,
}

impl PipelineConfig {
    /// Load configuration from a TOML file and normalize its rules
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let mut config: PipelineConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;
        config.exclusion.normalize();
        log::debug!("loaded pipeline config from {}", path.display());
        Ok(config)
    }
}

/// Rules for the default exclusion policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExclusionConfig {
    /// File extensions to skip, matched case-insensitively; leading dots are
    /// accepted and stripped
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Case-insensitive substrings of file names to skip
    #[serde(default)]
    pub name_contains: Vec<String>,

    /// Skip files larger than this many bytes
    #[serde(default)]
    pub max_file_size: Option<u64>,
}

impl ExclusionConfig {
    /// Normalize rules: strip leading dots, lowercase, drop empty entries
    pub fn normalize(&mut self) {
        self.extensions = std::mem::take(&mut self.extensions)
            .into_iter()
            .filter_map(|ext| {
                let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
                if ext.is_empty() {
                    log::warn!("ignoring empty extension rule in exclusion config");
                    None
                } else {
                    Some(ext)
                }
            })
            .collect();

        self.name_contains = std::mem::take(&mut self.name_contains)
            .into_iter()
            .filter_map(|needle| {
                let needle = needle.trim().to_ascii_lowercase();
                if needle.is_empty() {
                    log::warn!("ignoring empty name rule in exclusion config");
                    None
                } else {
                    Some(needle)
                }
            })
            .collect();

        if self.max_file_size == Some(0) {
            log::warn!("exclusion config max_file_size of 0 excludes every file");
        }
    }

    /// True when no rule can match anything
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty() && self.name_contains.is_empty() && self.max_file_size.is_none()
    }
}

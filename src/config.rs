// SPDX-License-Identifier: GPL-3.0-or-later
// src/config.rs
//
// Editor configuration, read from a TOML file in the user config directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::constant::{
    COMPOSITE_GAP, CONFIG_DIR, CONFIG_FILE, DEFAULT_REGION_HEIGHT, DEFAULT_REGION_WIDTH,
    HANDLE_HIT_SIZE, PAGE_PATTERN,
};

/// Global configuration for the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Width of a region created with "add region" (image pixels).
    pub default_region_width: f64,
    /// Height of a region created with "add region" (image pixels).
    pub default_region_height: f64,
    /// Gap between stacked crops in the composite (pixels).
    pub composite_gap: u32,
    /// Grab area around a corner handle (screen pixels).
    pub handle_hit_size: f64,
    /// File name pattern for page images; `{page}` is replaced by the page index.
    pub page_pattern: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_region_width: DEFAULT_REGION_WIDTH,
            default_region_height: DEFAULT_REGION_HEIGHT,
            composite_gap: COMPOSITE_GAP,
            handle_hit_size: HANDLE_HIT_SIZE,
            page_pattern: PAGE_PATTERN.to_string(),
        }
    }
}

impl EditorConfig {
    /// Location of the user config file, if a config directory exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("Failed to parse editor config")
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// Load from an explicit path, or from the user config directory.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// File name of the image for `page`.
    #[must_use]
    pub fn page_file_name(&self, page: u32) -> String {
        self.page_pattern.replace("{page}", &page.to_string())
    }
}

//! Configuration for the viewer pipeline.
//!
//! `ViewerConfig` gathers the presentation knobs (page size, marker literals,
//! column width hints, toggle label) so the rendering code carries no
//! hardcoded presentation constants of its own.

use crate::highlight::MarkerSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Marker literals emphasized in the rendered table, applied in this order.
pub const DEFAULT_MARKERS: [&str; 10] = [
    "<｜fim▁begin｜>",
    "<｜fim▁hole｜>",
    "<｜fim▁end｜>",
    "<|fim_prefix|>",
    "<|fim_suffix|>",
    "<|fim_middle|>",
    "- **Left Code Snippet Context `left_context`:**  ",
    "- **Right Code Snippet Context `right_context`:**  ",
    "- **Retreived Code Snippets from Related Files:** ",
    "**Instructions:** ",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub page_size: usize,
    pub markers: Vec<String>,
    pub toggle_label: String,
    /// Header width hints in pixels, keyed by output column name.
    pub column_widths: BTreeMap<String, u32>,
    /// Number of spaces each tab character expands to in the final markup.
    pub tab_width: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let column_widths = [("task_id", 100), ("prompt_html", 500), ("em", 50), ("es", 50)]
            .into_iter()
            .map(|(name, width)| (name.to_string(), width))
            .collect();

        Self {
            page_size: 10,
            markers: DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect(),
            toggle_label: "Show/Hide".to_string(),
            column_widths,
            tab_width: 4,
        }
    }
}

impl ViewerConfig {
    pub fn builder() -> ViewerConfigBuilder {
        ViewerConfigBuilder {
            inner: ViewerConfig::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_zero(self.page_size, "page_size")?;
        ensure_non_zero(self.tab_width, "tab_width")?;

        if let Some(index) = self.markers.iter().position(|m| m.is_empty()) {
            return Err(ConfigError::EmptyMarker { index });
        }

        Ok(())
    }

    pub fn marker_set(&self) -> MarkerSet {
        MarkerSet::emphasize(&self.markers)
    }

    pub fn column_width(&self, column: &str) -> Option<u32> {
        self.column_widths.get(column).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    NonPositiveValue { field: &'static str },
    #[error("marker {index} is empty")]
    EmptyMarker { index: usize },
    #[error("failed to read config '{path}': {reason}")]
    Io { path: String, reason: String },
    #[error("invalid config JSON: {0}")]
    Parse(String),
}

fn ensure_non_zero(value: usize, field: &'static str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::NonPositiveValue { field });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ViewerConfigBuilder {
    inner: ViewerConfig,
}

impl Default for ViewerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerConfigBuilder {
    pub fn new() -> Self {
        ViewerConfig::builder()
    }

    pub fn page_size(mut self, value: usize) -> Self {
        self.inner.page_size = value;
        self
    }

    pub fn markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.markers = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn toggle_label(mut self, value: impl Into<String>) -> Self {
        self.inner.toggle_label = value.into();
        self
    }

    pub fn column_width(mut self, column: impl Into<String>, width: u32) -> Self {
        self.inner.column_widths.insert(column.into(), width);
        self
    }

    pub fn tab_width(mut self, value: usize) -> Self {
        self.inner.tab_width = value;
        self
    }

    pub fn build(self) -> Result<ViewerConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

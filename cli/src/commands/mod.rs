pub mod render;
pub mod serve;

use anyhow::{Context, Result};
use eval_viewer::ViewerConfig;
use std::path::Path;

/// Loads the viewer configuration, falling back to defaults without a path.
pub(crate) fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    match path {
        Some(path) => ViewerConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(ViewerConfig::default()),
    }
}

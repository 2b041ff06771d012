use crate::commands::load_config;
use crate::output::document::render_document;
use anyhow::{Context, Result};
use eval_viewer::render_view;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};

/// Renders one page. Exit code 0 when a table was produced, 1 when only a
/// status message came back.
pub fn run(
    file: &Path,
    page: usize,
    page_size: Option<usize>,
    config_path: Option<&Path>,
    output: Option<&Path>,
    document: bool,
) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let page_size = page_size.unwrap_or(config.page_size);

    info!(file = %file.display(), page, page_size, "rendering page");
    let outcome = render_view(Some(file), page, page_size, &config);
    eprintln!("{}", outcome.status);

    if outcome.markup.is_none() {
        warn!(status = %outcome.status, "no table produced");
        return Ok(ExitCode::from(1));
    }

    let body = if document {
        render_document(&outcome, None)
    } else {
        outcome.markup.unwrap_or_default()
    };

    match output {
        Some(path) => {
            fs::write(path, &body)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!(output = %path.display(), bytes = body.len(), "wrote markup");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(body.as_bytes())?;
            writeln!(handle)?;
        }
    }

    Ok(ExitCode::from(0))
}

//! The end-to-end view pipeline: workbook path to status text and markup.
//!
//! Every call re-reads the source and recomputes every row; nothing is
//! cached between calls. Failures are typed as [`ViewError`] and turned into
//! status text only at this boundary.

use crate::config::ViewerConfig;
use crate::excel_open_xml::{PackageError, open_first_sheet_path};
use crate::output::html::render_fragment;
use crate::paginate::{Page, PageError, paginate};
use crate::records::{Record, SchemaError, load_records};
use crate::rows::transform_rows;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Please upload a valid Excel file.")]
    MissingInput,
    #[error("Rows per page must be greater than zero.")]
    InvalidPageSize,
    #[error("Page numbers start at 1.")]
    InvalidPageNumber,
    #[error("Failed to read workbook: {0}")]
    Package(#[from] PackageError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl From<PageError> for ViewError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::ZeroPageSize => ViewError::InvalidPageSize,
            PageError::ZeroPageNumber => ViewError::InvalidPageNumber,
        }
    }
}

/// Status text plus the rendered fragment, if one was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOutcome {
    pub status: String,
    pub markup: Option<String>,
}

impl ViewOutcome {
    pub fn from_error(err: &ViewError) -> ViewOutcome {
        ViewOutcome {
            status: err.to_string(),
            markup: None,
        }
    }

    pub fn has_table(&self) -> bool {
        self.markup.is_some()
    }
}

/// One rendered page of a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub markup: String,
}

impl PageView {
    pub fn status(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

impl From<PageView> for ViewOutcome {
    fn from(view: PageView) -> Self {
        ViewOutcome {
            status: view.status(),
            markup: Some(view.markup),
        }
    }
}

/// Renders page `page` of the workbook at `source`.
pub fn render_view(
    source: Option<&Path>,
    page: usize,
    page_size: usize,
    config: &ViewerConfig,
) -> ViewOutcome {
    match try_render_view(source, page, page_size, config) {
        Ok(view) => view.into(),
        Err(err) => ViewOutcome::from_error(&err),
    }
}

pub fn try_render_view(
    source: Option<&Path>,
    page: usize,
    page_size: usize,
    config: &ViewerConfig,
) -> Result<PageView, ViewError> {
    let source = source.ok_or(ViewError::MissingInput)?;
    let page = Page::new(page, page_size)?;
    let grid = open_first_sheet_path(source)?;
    let records = load_records(&grid)?;
    Ok(render_page(&records, page, config))
}

/// Renders page `page` of already loaded records.
pub fn render_records(
    records: &[Record],
    page: usize,
    page_size: usize,
    config: &ViewerConfig,
) -> ViewOutcome {
    match Page::new(page, page_size) {
        Ok(page) => render_page(records, page, config).into(),
        Err(err) => ViewOutcome::from_error(&err.into()),
    }
}

fn render_page(records: &[Record], page: Page, config: &ViewerConfig) -> PageView {
    // Rows are transformed over the whole set so indices stay global.
    let rows = transform_rows(records, &config.toggle_label);
    let (window, total_pages) = paginate(&rows, page);

    PageView {
        page: page.number(),
        total_pages,
        total_rows: rows.len(),
        markup: render_fragment(window, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::from_text(&format!("t{i}"), "p", "a\n", "b\n", 0.0, 0.5))
            .collect()
    }

    #[test]
    fn missing_source_reports_upload_prompt() {
        let outcome = render_view(None, 1, 10, &ViewerConfig::default());
        assert_eq!(outcome.status, "Please upload a valid Excel file.");
        assert_eq!(outcome.markup, None);
    }

    #[test]
    fn zero_page_size_reports_status() {
        let outcome = render_records(&records(3), 1, 0, &ViewerConfig::default());
        assert_eq!(outcome.status, "Rows per page must be greater than zero.");
        assert!(!outcome.has_table());
    }

    #[test]
    fn second_page_keeps_global_indices() {
        let outcome = render_records(&records(25), 2, 10, &ViewerConfig::default());
        assert_eq!(outcome.status, "Page 2 of 3");
        let markup = outcome.markup.expect("table markup");
        assert!(markup.contains(r#"id="prompt_10""#));
        assert!(markup.contains(r#"id="prompt_19""#));
        assert!(!markup.contains(r#"id="prompt_9""#));
        assert!(!markup.contains(r#"id="prompt_20""#));
        assert!(markup.contains("getElementById('prompt_15')"));
    }

    #[test]
    fn page_past_the_end_renders_empty_table() {
        let outcome = render_records(&records(3), 7, 10, &ViewerConfig::default());
        assert_eq!(outcome.status, "Page 7 of 1");
        let markup = outcome.markup.expect("header-only table");
        assert!(markup.contains("<thead>"));
        assert!(!markup.contains("<td>"));
    }

    #[test]
    fn unreadable_source_is_a_status_not_a_panic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("results.xlsx");
        std::fs::write(&path, b"not a workbook").expect("write file");
        let outcome = render_view(Some(&path), 1, 10, &ViewerConfig::default());
        assert!(outcome.status.starts_with("Failed to read workbook:"));
        assert_eq!(outcome.markup, None);
    }
}

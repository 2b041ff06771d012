//! Eval Viewer: a library for browsing evaluation-result workbooks.
//!
//! This crate provides functionality for:
//! - Reading the first sheet of an `.xlsx` workbook into a grid of cells
//! - Loading `task_id`/`prompt`/`pred`/`target`/`em`/`es` records
//! - Rendering line diffs between predictions and targets as colored markup
//! - Paginating rows into an HTML table with toggleable prompt blocks
//!
//! # Quick Start
//!
//! ```ignore
//! use eval_viewer::{SessionState, ViewerConfig};
//!
//! let config = ViewerConfig::default();
//! let path = std::path::Path::new("results.xlsx");
//! let (state, outcome) = SessionState::load(Some(path), config.page_size, &config);
//! println!("{}", outcome.status);
//! let (state, outcome) = state.next(Some(path), &config);
//! ```

mod addressing;
mod config;
mod container;
mod excel_open_xml;
mod grid_parser;
mod highlight;
mod line_diff;
mod output;
mod paginate;
mod records;
mod rows;
mod session;
mod view;
mod workbook;

pub use addressing::address_to_index;
pub use config::{ConfigError, DEFAULT_MARKERS, ViewerConfig, ViewerConfigBuilder};
pub use container::{ContainerError, ContainerLimits, XlsxContainer};
pub use excel_open_xml::{
    PackageError, first_sheet_from_container, open_first_sheet, open_first_sheet_path,
};
pub use grid_parser::{GridParseError, SheetDescriptor};
pub use highlight::{Marker, MarkerSet, line_breaks, render, strip_markup};
pub use line_diff::{DiffSegment, SegmentKind, diff};
pub use output::html::{COLUMNS, TOGGLE_SCRIPT, render_fragment, serialize_table};
pub use paginate::{Page, PageError, next_page, paginate, prev_page, total_pages};
pub use records::{REQUIRED_COLUMNS, Record, SchemaError, load_records};
pub use rows::{RenderedRow, prompt_element_id, transform_row, transform_rows};
pub use session::SessionState;
pub use view::{PageView, ViewError, ViewOutcome, render_records, render_view, try_render_view};
pub use workbook::{CellValue, Grid, display_cell};

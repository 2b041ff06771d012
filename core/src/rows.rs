//! Per-row display fields derived from records.

use crate::highlight::{line_breaks, render};
use crate::line_diff::diff;
use crate::records::Record;

/// A record plus the markup shown for it.
///
/// `index` is the record's position in the full, unpaginated sequence; the
/// prompt block id and the toggle control both refer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub index: usize,
    pub task_id: String,
    pub prompt_block: String,
    pub highlighted_diff: String,
    pub target_display: String,
    pub em: String,
    pub es: String,
    pub toggle_control: String,
}

pub fn prompt_element_id(index: usize) -> String {
    format!("prompt_{index}")
}

pub fn transform_row(index: usize, record: &Record, toggle_label: &str) -> RenderedRow {
    let id = prompt_element_id(index);
    let highlighted_diff = render(&diff(&record.pred_text(), &record.target_text()));

    RenderedRow {
        index,
        task_id: record.task_id_text(),
        prompt_block: format!(
            r#"<div id="{id}" style="display:none;">{}</div>"#,
            line_breaks(&record.prompt_text())
        ),
        highlighted_diff,
        target_display: line_breaks(&record.target_text()),
        em: record.em_text(),
        es: record.es_text(),
        toggle_control: format!(
            "<button onclick=\"document.getElementById('{id}').style.display = \
             (document.getElementById('{id}').style.display === 'none' ? 'block' : 'none')\">\
             {toggle_label}</button>"
        ),
    }
}

/// Transforms every record, indexing by position in `records`.
pub fn transform_rows(records: &[Record], toggle_label: &str) -> Vec<RenderedRow> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| transform_row(index, record, toggle_label))
        .collect()
}

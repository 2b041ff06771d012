//! Evaluation records loaded from the header-keyed first sheet.

use crate::workbook::{CellValue, Grid, display_cell};
use thiserror::Error;

/// Column names every result workbook must carry, in display order.
pub const REQUIRED_COLUMNS: [&str; 6] = ["task_id", "prompt", "pred", "target", "em", "es"];

/// One evaluation result row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub task_id: Option<CellValue>,
    pub prompt: Option<CellValue>,
    pub pred: Option<CellValue>,
    pub target: Option<CellValue>,
    /// Exact-match score.
    pub em: Option<CellValue>,
    /// Edit-similarity score.
    pub es: Option<CellValue>,
}

impl Record {
    /// Convenience constructor for text-only rows.
    pub fn from_text(
        task_id: &str,
        prompt: &str,
        pred: &str,
        target: &str,
        em: f64,
        es: f64,
    ) -> Record {
        Record {
            task_id: Some(CellValue::Text(task_id.to_string())),
            prompt: Some(CellValue::Text(prompt.to_string())),
            pred: Some(CellValue::Text(pred.to_string())),
            target: Some(CellValue::Text(target.to_string())),
            em: Some(CellValue::Number(em)),
            es: Some(CellValue::Number(es)),
        }
    }

    pub fn task_id_text(&self) -> String {
        display_cell(self.task_id.as_ref())
    }

    pub fn prompt_text(&self) -> String {
        display_cell(self.prompt.as_ref())
    }

    pub fn pred_text(&self) -> String {
        display_cell(self.pred.as_ref())
    }

    pub fn target_text(&self) -> String {
        display_cell(self.target.as_ref())
    }

    pub fn em_text(&self) -> String {
        display_cell(self.em.as_ref())
    }

    pub fn es_text(&self) -> String {
        display_cell(self.es.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("File must contain the following columns: {}", REQUIRED_COLUMNS.join(", "))]
pub struct SchemaError {
    /// Required columns absent from the header row.
    pub missing: Vec<&'static str>,
}

/// Converts a sheet grid into records, keyed by the header row.
///
/// Extra columns are ignored, the first header cell wins for duplicated
/// names and rows without any populated cell are skipped.
pub fn load_records(grid: &Grid) -> Result<Vec<Record>, SchemaError> {
    let column_of = |name: &str| {
        grid.row_cells(0)
            .find(|(_, value)| value.to_display() == name)
            .map(|(col, _)| col)
    };

    let mut positions = [0u32; REQUIRED_COLUMNS.len()];
    let mut missing = Vec::new();
    for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        match column_of(name) {
            Some(col) => *slot = col,
            None => missing.push(name),
        }
    }
    if !missing.is_empty() {
        return Err(SchemaError { missing });
    }

    let [task_id, prompt, pred, target, em, es] = positions;
    let records = grid
        .populated_rows()
        .filter(|&row| row > 0)
        .map(|row| {
            let cell = |col: u32| grid.get(row, col).cloned();
            Record {
                task_id: cell(task_id),
                prompt: cell(prompt),
                pred: cell(pred),
                target: cell(target),
                em: cell(em),
                es: cell(es),
            }
        })
        .collect();

    Ok(records)
}

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use eval_viewer::Record;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HEADER: [&str; 6] = ["task_id", "prompt", "pred", "target", "em", "es"];

/// A cell written into a generated workbook.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Writes `rows` to the first sheet of a new workbook at `path`.
pub fn write_workbook(path: &Path, rows: &[Vec<Cell>]) {
    write_workbook_with(path, rows, &[]);
}

/// Like [`write_workbook`], plus cells placed at explicit `(row, col)`
/// coordinates.
pub fn write_workbook_with(path: &Path, rows: &[Vec<Cell>], placed: &[(u32, u16, Cell)]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let positional = rows.iter().enumerate().flat_map(|(r, row)| {
        row.iter()
            .enumerate()
            .map(move |(c, cell)| (r as u32, c as u16, cell))
    });
    let explicit = placed.iter().map(|(r, c, cell)| (*r, *c, cell));
    for (r, c, cell) in positional.chain(explicit) {
        match cell {
            Cell::Text(text) => {
                sheet.write_string(r, c, text).expect("write string cell");
            }
            Cell::Number(n) => {
                sheet.write_number(r, c, *n).expect("write number cell");
            }
            Cell::Empty => {}
        }
    }
    workbook
        .save(path)
        .unwrap_or_else(|e| panic!("failed to save {}: {e}", path.display()));
}

pub fn header_row(columns: &[&str]) -> Vec<Cell> {
    columns.iter().map(|name| Cell::from(*name)).collect()
}

pub fn result_row(task_id: &str, prompt: &str, pred: &str, target: &str, em: f64, es: f64) -> Vec<Cell> {
    vec![
        task_id.into(),
        prompt.into(),
        pred.into(),
        target.into(),
        em.into(),
        es.into(),
    ]
}

/// A workbook in a temporary directory that lives as long as the fixture.
pub struct Fixture {
    _dir: TempDir,
    path: PathBuf,
}

impl Fixture {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a companion file next to the workbook.
    pub fn sibling(&self, name: &str, contents: &str) -> PathBuf {
        let path = self._dir.path().join(name);
        std::fs::write(&path, contents).expect("write sibling file");
        path
    }
}

pub fn fixture(rows: &[Vec<Cell>]) -> Fixture {
    fixture_with(rows, &[])
}

pub fn fixture_with(rows: &[Vec<Cell>], placed: &[(u32, u16, Cell)]) -> Fixture {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("results.xlsx");
    write_workbook_with(&path, rows, placed);
    Fixture { _dir: dir, path }
}

/// A results workbook with `n` rows whose task ids are `task-0`, `task-1`, ...
pub fn results_fixture(n: usize) -> Fixture {
    let mut rows = vec![header_row(&HEADER)];
    for i in 0..n {
        rows.push(result_row(
            &format!("task-{i}"),
            &format!("prompt {i}"),
            "same\npred\n",
            "same\ntarget\n",
            0.0,
            0.5,
        ));
    }
    fixture(&rows)
}

pub fn record(task_id: &str, pred: &str, target: &str) -> Record {
    Record::from_text(task_id, "prompt", pred, target, 1.0, 1.0)
}

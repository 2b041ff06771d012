//! Sheet grid data structures.
//!
//! A [`Grid`] is the sparse, row-major view of a single worksheet that the
//! record loader consumes. Cells keep their Excel value kind so display
//! coercion happens in one place ([`CellValue::to_display`]).

use std::collections::BTreeMap;
use std::fmt;

/// A worksheet cell value as stored in the package.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Error literal such as `#DIV/0!`.
    Error(String),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        if let CellValue::Text(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        if let CellValue::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn to_display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            // f64's Display drops the fractional part of integral values.
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
            CellValue::Error(code) => f.write_str(code),
        }
    }
}

/// Display text for an optional cell; absent cells render as the empty string.
pub fn display_cell(cell: Option<&CellValue>) -> String {
    cell.map(CellValue::to_display).unwrap_or_default()
}

/// A sparse grid of populated cells.
///
/// `nrows`/`ncols` describe the bounding rectangle; only populated cells are
/// stored, keyed by `(row, col)` in row-major order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    nrows: u32,
    ncols: u32,
    cells: BTreeMap<(u32, u32), CellValue>,
}

impl Grid {
    pub fn new(nrows: u32, ncols: u32) -> Grid {
        Grid {
            nrows,
            ncols,
            cells: BTreeMap::new(),
        }
    }

    pub fn nrows(&self) -> u32 {
        self.nrows
    }

    pub fn ncols(&self) -> u32 {
        self.ncols
    }

    pub fn is_empty(&self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Stores `value` at `(row, col)`, clearing the cell for `None`. Cells
    /// outside the bounding rectangle are ignored.
    pub fn insert_cell(&mut self, row: u32, col: u32, value: Option<CellValue>) {
        debug_assert!(
            row < self.nrows && col < self.ncols,
            "cell coordinates must lie within the grid bounds"
        );
        if row >= self.nrows || col >= self.ncols {
            return;
        }
        match value {
            Some(value) => {
                self.cells.insert((row, col), value);
            }
            None => {
                self.cells.remove(&(row, col));
            }
        }
    }

    /// Populated cells of `row` as `(col, value)`, in column order.
    pub fn row_cells(&self, row: u32) -> impl Iterator<Item = (u32, &CellValue)> {
        self.cells
            .range((row, 0)..=(row, u32::MAX))
            .map(|(&(_, col), value)| (col, value))
    }

    /// Indices of rows holding at least one populated cell, ascending.
    pub fn populated_rows(&self) -> impl Iterator<Item = u32> + '_ {
        let mut last = None;
        self.cells.keys().filter_map(move |&(row, _)| {
            (last != Some(row)).then(|| {
                last = Some(row);
                row
            })
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Builds a grid from literal rows; `None` entries stay empty.
    pub fn from_rows(rows: Vec<Vec<Option<CellValue>>>) -> Grid {
        let ncols = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut grid = Grid::new(rows.len() as u32, ncols);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                grid.insert_cell(r as u32, c as u32, value);
            }
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_coerces_each_kind() {
        assert_eq!(CellValue::Text("a\nb".into()).to_display(), "a\nb");
        assert_eq!(CellValue::Number(1.0).to_display(), "1");
        assert_eq!(CellValue::Number(0.875).to_display(), "0.875");
        assert_eq!(CellValue::Number(-3.0).to_display(), "-3");
        assert_eq!(CellValue::Bool(true).to_display(), "TRUE");
        assert_eq!(CellValue::Error("#N/A".into()).to_display(), "#N/A");
        assert_eq!(display_cell(None), "");
    }

    #[test]
    fn insert_and_get_within_bounds() {
        let mut grid = Grid::new(2, 3);
        grid.insert_cell(1, 2, Some(CellValue::Number(4.0)));
        assert_eq!(grid.get(1, 2), Some(&CellValue::Number(4.0)));
        assert_eq!(grid.get(0, 0), None);
        assert_eq!(grid.get(5, 5), None);
        assert_eq!(grid.cell_count(), 1);
    }

    #[test]
    fn from_rows_keeps_only_populated_cells() {
        let grid = Grid::from_rows(vec![
            vec![Some(CellValue::Text("a".into()))],
            vec![None, None, None],
            vec![None, None, Some(CellValue::Bool(false))],
        ]);
        assert_eq!(grid.nrows(), 3);
        assert_eq!(grid.ncols(), 3);
        assert_eq!(grid.cell_count(), 2);
        assert_eq!(grid.populated_rows().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(
            grid.row_cells(2).collect::<Vec<_>>(),
            vec![(2, &CellValue::Bool(false))]
        );
        assert_eq!(grid.row_cells(1).count(), 0);
    }

    #[test]
    fn far_corner_cell_is_stored_sparsely() {
        let mut grid = Grid::new(1_048_576, 16_384);
        grid.insert_cell(0, 0, Some(CellValue::Text("task_id".into())));
        grid.insert_cell(1_048_575, 16_383, Some(CellValue::Text("note".into())));
        assert_eq!(grid.cell_count(), 2);
        assert_eq!(grid.populated_rows().collect::<Vec<_>>(), vec![0, 1_048_575]);
        assert_eq!(
            grid.get(1_048_575, 16_383),
            Some(&CellValue::Text("note".into()))
        );
    }
}

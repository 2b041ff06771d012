//! Excel Open XML file reading.
//!
//! Opens `.xlsx` files and loads the first worksheet into a [`Grid`].

use crate::container::{ContainerError, XlsxContainer};
use crate::grid_parser::{
    GridParseError, parse_relationships, parse_sheet_xml, parse_shared_strings,
    parse_workbook_xml, resolve_sheet_target,
};
use crate::workbook::Grid;
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PackageError {
    #[error("container error: {0}")]
    Container(#[from] ContainerError),
    #[error("grid parse error: {0}")]
    GridParse(#[from] GridParseError),
    #[error("workbook.xml missing or unreadable")]
    WorkbookXmlMissing,
    #[error("worksheet XML missing for sheet {sheet_name}")]
    WorksheetXmlMissing { sheet_name: String },
}

/// Loads the first worksheet (in workbook order) of an open container.
///
/// A workbook without sheets yields an empty grid.
pub fn first_sheet_from_container(container: &mut XlsxContainer) -> Result<Grid, PackageError> {
    let shared_strings = match container.read_part_optional("xl/sharedStrings.xml")? {
        Some(bytes) => parse_shared_strings(&bytes)?,
        None => Vec::new(),
    };

    let workbook_bytes = container
        .read_part("xl/workbook.xml")
        .map_err(|_| PackageError::WorkbookXmlMissing)?;
    let sheets = parse_workbook_xml(&workbook_bytes)?;

    let Some(sheet) = sheets.first() else {
        return Ok(Grid::default());
    };

    let relationships = match container.read_part_optional("xl/_rels/workbook.xml.rels")? {
        Some(bytes) => parse_relationships(&bytes)?,
        None => HashMap::new(),
    };

    let target = resolve_sheet_target(sheet, &relationships, 0);
    let sheet_bytes = container
        .read_part(&target)
        .map_err(|_| PackageError::WorksheetXmlMissing {
            sheet_name: sheet.name.clone(),
        })?;

    Ok(parse_sheet_xml(&sheet_bytes, &shared_strings)?)
}

pub fn open_first_sheet<R: Read + Seek + 'static>(reader: R) -> Result<Grid, PackageError> {
    let mut container = XlsxContainer::open_from_reader(reader)?;
    first_sheet_from_container(&mut container)
}

pub fn open_first_sheet_path(path: impl AsRef<Path>) -> Result<Grid, PackageError> {
    let mut container = XlsxContainer::open_from_path(path)?;
    first_sheet_from_container(&mut container)
}

//! XML parsing for result worksheets.
//!
//! Reads the parts of a workbook needed to locate and load its first sheet:
//! the shared string table, the sheet list, the workbook relationships and
//! the worksheet cells themselves.

use crate::addressing::address_to_index;
use crate::workbook::{CellValue, Grid};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GridParseError {
    #[error("XML parse error: {0}")]
    XmlError(String),
    #[error("invalid cell address: {0}")]
    InvalidAddress(String),
    #[error("shared string index {0} out of bounds")]
    SharedStringOutOfBounds(usize),
}

fn xml_err(err: impl Display) -> GridParseError {
    GridParseError::XmlError(err.to_string())
}

/// A `<sheet>` entry of `xl/workbook.xml`, in workbook order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetDescriptor {
    pub name: String,
    pub rel_id: Option<String>,
    pub sheet_id: Option<u32>,
}

/// Calls `visit` for every start or empty element named `tag`.
fn for_each_element(
    xml: &[u8],
    tag: &[u8],
    mut visit: impl FnMut(&BytesStart<'_>) -> Result<(), GridParseError>,
) -> Result<(), GridParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == tag => visit(&e)?,
            Event::Eof => return Ok(()),
            _ => {}
        }
        buf.clear();
    }
}

/// Flattens every `<si>` entry, rich-text runs included, into one string.
pub fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>, GridParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut entry: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) => match e.name().as_ref() {
                b"si" => entry = Some(String::new()),
                b"t" => {
                    let text = read_text(&mut reader, &e)?;
                    if let Some(entry) = entry.as_mut() {
                        entry.push_str(&text);
                    }
                }
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"si" => strings.push(String::new()),
            Event::End(e) if e.name().as_ref() == b"si" => {
                strings.push(entry.take().unwrap_or_default());
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

pub fn parse_workbook_xml(xml: &[u8]) -> Result<Vec<SheetDescriptor>, GridParseError> {
    let mut sheets = Vec::new();
    for_each_element(xml, b"sheet", |e| {
        if let Some(name) = attr(e, b"name")? {
            sheets.push(SheetDescriptor {
                name,
                rel_id: attr(e, b"r:id")?,
                sheet_id: attr(e, b"sheetId")?.and_then(|v| v.parse().ok()),
            });
        }
        Ok(())
    })?;
    Ok(sheets)
}

/// Maps worksheet relationship ids to their part targets. Relationships of
/// other types (styles, themes, shared strings) are skipped.
pub fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, GridParseError> {
    let mut targets = HashMap::new();
    for_each_element(xml, b"Relationship", |e| {
        let is_worksheet = attr(e, b"Type")?.is_some_and(|t| t.ends_with("/worksheet"));
        if is_worksheet
            && let (Some(id), Some(target)) = (attr(e, b"Id")?, attr(e, b"Target")?)
        {
            targets.insert(id, target);
        }
        Ok(())
    })?;
    Ok(targets)
}

/// Part name of `sheet`, from its relationship when present and from the
/// conventional `sheetN.xml` name otherwise.
pub fn resolve_sheet_target(
    sheet: &SheetDescriptor,
    relationships: &HashMap<String, String>,
    index: usize,
) -> String {
    let target = sheet
        .rel_id
        .as_ref()
        .and_then(|id| relationships.get(id))
        .cloned()
        .unwrap_or_else(|| {
            let n = sheet.sheet_id.map_or(index + 1, |id| id as usize);
            format!("worksheets/sheet{n}.xml")
        });

    let target = target.trim_start_matches('/');
    if target.starts_with("xl/") {
        target.to_string()
    } else {
        format!("xl/{target}")
    }
}

/// Where the next cell lands when it carries no `r` attribute.
#[derive(Debug, Default, Clone, Copy)]
struct CellCursor {
    row: Option<u32>,
    next_col: u32,
}

impl CellCursor {
    fn start_row(&mut self, explicit: Option<u32>) {
        self.row = Some(explicit.unwrap_or_else(|| self.row.map_or(0, |r| r + 1)));
        self.next_col = 0;
    }

    fn place(&mut self, start: &BytesStart<'_>) -> Result<(u32, u32), GridParseError> {
        let (row, col) = match attr(start, b"r")? {
            Some(address) => {
                address_to_index(&address).ok_or(GridParseError::InvalidAddress(address))?
            }
            None => (self.row.unwrap_or(0), self.next_col),
        };
        self.row = Some(row);
        self.next_col = col + 1;
        Ok((row, col))
    }
}

/// Parses worksheet XML into a grid sized to the populated cells.
///
/// Cells without an `r` attribute take the column after the previous cell in
/// the same row; rows without one follow the previous row.
pub fn parse_sheet_xml(xml: &[u8], shared_strings: &[String]) -> Result<Grid, GridParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut cursor = CellCursor::default();
    let mut cells: Vec<(u32, u32, CellValue)> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"row" => {
                let explicit = attr(&e, b"r")?
                    .and_then(|r| r.trim().parse::<u32>().ok())
                    .and_then(|r| r.checked_sub(1));
                cursor.start_row(explicit);
            }
            Event::Start(e) if e.name().as_ref() == b"c" => {
                let (row, col) = cursor.place(&e)?;
                let kind = CellKind::from_attr(attr(&e, b"t")?.as_deref());
                if let Some(value) = read_cell(&mut reader, kind, shared_strings)? {
                    cells.push((row, col, value));
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"c" => {
                cursor.place(&e)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let nrows = cells.iter().map(|&(r, _, _)| r + 1).max().unwrap_or(0);
    let ncols = cells.iter().map(|&(_, c, _)| c + 1).max().unwrap_or(0);
    let mut grid = Grid::new(nrows, ncols);
    for (row, col, value) in cells {
        grid.insert_cell(row, col, Some(value));
    }

    Ok(grid)
}

/// The `t` attribute of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    SharedString,
    Bool,
    Error,
    Formula,
    Inline,
    Number,
}

impl CellKind {
    fn from_attr(t: Option<&str>) -> CellKind {
        match t {
            Some("s") => CellKind::SharedString,
            Some("b") => CellKind::Bool,
            Some("e") => CellKind::Error,
            Some("str") => CellKind::Formula,
            Some("inlineStr") => CellKind::Inline,
            _ => CellKind::Number,
        }
    }
}

/// Reads the body of a `<c>` element through its end tag.
fn read_cell(
    reader: &mut Reader<&[u8]>,
    kind: CellKind,
    shared_strings: &[String],
) -> Result<Option<CellValue>, GridParseError> {
    let mut buf = Vec::new();
    let mut value: Option<CellValue> = None;

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) if e.name().as_ref() == b"v" => {
                let raw = read_text(reader, &e)?;
                value = convert_value(&raw, kind, shared_strings)?;
            }
            Event::Start(e) if e.name().as_ref() == b"is" => {
                value = Some(CellValue::Text(read_inline_string(reader)?));
            }
            Event::End(e) if e.name().as_ref() == b"c" => return Ok(value),
            Event::Eof => return Err(xml_err("unexpected EOF inside cell")),
            _ => {}
        }
        buf.clear();
    }
}

fn read_inline_string(reader: &mut Reader<&[u8]>) -> Result<String, GridParseError> {
    let mut buf = Vec::new();
    let mut value = String::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) if e.name().as_ref() == b"t" => {
                value.push_str(&read_text(reader, &e)?);
            }
            Event::End(e) if e.name().as_ref() == b"is" => return Ok(value),
            Event::Eof => return Err(xml_err("unexpected EOF inside inline string")),
            _ => {}
        }
        buf.clear();
    }
}

/// Reads the text content of `start` up to its end tag, resolving entities.
fn read_text(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<String, GridParseError> {
    let raw = reader.read_text(start.name()).map_err(xml_err)?;
    quick_xml::escape::unescape(&raw)
        .map(|text| text.into_owned())
        .map_err(xml_err)
}

/// Converts the text of a `<v>` element. Blank values are empty cells except
/// for formula strings, which may legitimately be empty.
fn convert_value(
    raw: &str,
    kind: CellKind,
    shared_strings: &[String],
) -> Result<Option<CellValue>, GridParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() && kind != CellKind::Formula {
        return Ok(None);
    }

    let value = match kind {
        CellKind::SharedString => {
            let idx = trimmed.parse::<usize>().map_err(xml_err)?;
            let text = shared_strings
                .get(idx)
                .ok_or(GridParseError::SharedStringOutOfBounds(idx))?;
            CellValue::Text(text.clone())
        }
        CellKind::Bool => match trimmed {
            "1" => CellValue::Bool(true),
            "0" => CellValue::Bool(false),
            _ => return Ok(None),
        },
        CellKind::Error => CellValue::Error(trimmed.to_string()),
        CellKind::Formula | CellKind::Inline => CellValue::Text(raw.to_string()),
        CellKind::Number => match trimmed.parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(trimmed.to_string()),
        },
    };
    Ok(Some(value))
}

fn attr(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, GridParseError> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(xml_err)?;
        if attribute.key.as_ref() == key {
            return Ok(Some(attribute.unescape_value().map_err(xml_err)?.into_owned()));
        }
    }
    Ok(None)
}

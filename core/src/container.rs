//! Result workbook archive access.
//!
//! A result `.xlsx` is a ZIP archive of XML parts. [`XlsxContainer`] opens the
//! archive, refuses anything that is not an Office package and hands out part
//! bytes while keeping decompressed output inside a [`ContainerLimits`]
//! budget.

use std::io::{Read, Seek};
use std::path::Path;
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Decompression budget for one opened workbook.
#[derive(Debug, Clone, Copy)]
pub struct ContainerLimits {
    pub max_entries: usize,
    pub max_part_bytes: u64,
    pub max_total_bytes: u64,
}

impl Default for ContainerLimits {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_part_bytes: 100 * 1024 * 1024,
            max_total_bytes: 500 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContainerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a ZIP container")]
    NotZipContainer,
    #[error("not an Office package (missing [Content_Types].xml)")]
    NotOpcPackage,
    #[error("archive has {entries} entries (limit: {limit})")]
    TooManyEntries { entries: usize, limit: usize },
    #[error("part '{path}' is {size} bytes (limit: {limit} bytes)")]
    PartTooLarge { path: String, size: u64, limit: u64 },
    #[error("workbook parts exceed {limit} bytes in total")]
    TotalTooLarge { limit: u64 },
    #[error("failed to read part '{path}': {reason}")]
    ZipRead { path: String, reason: String },
    #[error("part not found in archive: {path}")]
    FileNotFound { path: String },
}

impl ContainerError {
    fn from_part(path: &str, err: ZipError) -> Self {
        match err {
            ZipError::FileNotFound => ContainerError::FileNotFound {
                path: path.to_string(),
            },
            other => ContainerError::ZipRead {
                path: path.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

pub struct XlsxContainer {
    archive: ZipArchive<Box<dyn ReadSeek>>,
    limits: ContainerLimits,
    consumed: u64,
}

impl XlsxContainer {
    pub fn open_from_reader<R: Read + Seek + 'static>(
        reader: R,
    ) -> Result<XlsxContainer, ContainerError> {
        Self::open_from_reader_with_limits(reader, ContainerLimits::default())
    }

    pub fn open_from_reader_with_limits<R: Read + Seek + 'static>(
        reader: R,
        limits: ContainerLimits,
    ) -> Result<XlsxContainer, ContainerError> {
        let archive = ZipArchive::new(Box::new(reader) as Box<dyn ReadSeek>).map_err(
            |err| match err {
                ZipError::Io(e) => ContainerError::Io(e),
                _ => ContainerError::NotZipContainer,
            },
        )?;

        if archive.len() > limits.max_entries {
            return Err(ContainerError::TooManyEntries {
                entries: archive.len(),
                limit: limits.max_entries,
            });
        }
        if archive.index_for_name(CONTENT_TYPES_PART).is_none() {
            return Err(ContainerError::NotOpcPackage);
        }

        Ok(XlsxContainer {
            archive,
            limits,
            consumed: 0,
        })
    }

    pub fn open_from_path(path: impl AsRef<Path>) -> Result<XlsxContainer, ContainerError> {
        let file = std::fs::File::open(path)?;
        Self::open_from_reader(std::io::BufReader::new(file))
    }

    /// Reads a part in full, charging its declared size against the budget.
    pub fn read_part(&mut self, name: &str) -> Result<Vec<u8>, ContainerError> {
        let mut entry = self
            .archive
            .by_name(name)
            .map_err(|e| ContainerError::from_part(name, e))?;

        let size = entry.size();
        if size > self.limits.max_part_bytes {
            return Err(ContainerError::PartTooLarge {
                path: name.to_string(),
                size,
                limit: self.limits.max_part_bytes,
            });
        }
        let consumed = self.consumed.saturating_add(size);
        if consumed > self.limits.max_total_bytes {
            return Err(ContainerError::TotalTooLarge {
                limit: self.limits.max_total_bytes,
            });
        }

        // The declared size may lie; never read past the part limit.
        let mut buf = Vec::with_capacity(size as usize);
        (&mut entry)
            .take(self.limits.max_part_bytes)
            .read_to_end(&mut buf)
            .map_err(|e| ContainerError::ZipRead {
                path: name.to_string(),
                reason: e.to_string(),
            })?;

        self.consumed = consumed;
        Ok(buf)
    }

    pub fn read_part_optional(&mut self, name: &str) -> Result<Option<Vec<u8>>, ContainerError> {
        match self.read_part(name) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(ContainerError::FileNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn zip_with(parts: &[(&str, &[u8])]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            for (name, body) in parts {
                writer
                    .start_file(*name, SimpleFileOptions::default())
                    .expect("start zip entry");
                writer.write_all(body).expect("write zip entry");
            }
            writer.finish().expect("finish zip");
        }
        cursor.into_inner()
    }

    #[test]
    fn rejects_non_zip_bytes() {
        let err = XlsxContainer::open_from_reader(Cursor::new(b"task_id,prompt\n".to_vec()))
            .err()
            .expect("plain text must not open");
        assert!(matches!(err, ContainerError::NotZipContainer));
    }

    #[test]
    fn rejects_zip_without_content_types() {
        let bytes = zip_with(&[("hello.txt", b"hi")]);
        let err = XlsxContainer::open_from_reader(Cursor::new(bytes))
            .err()
            .expect("zip without content types must not open");
        assert!(matches!(err, ContainerError::NotOpcPackage));
    }

    #[test]
    fn optional_part_missing_is_none() {
        let bytes = zip_with(&[(CONTENT_TYPES_PART, b"<Types/>")]);
        let mut container =
            XlsxContainer::open_from_reader(Cursor::new(bytes)).expect("container should open");
        assert_eq!(container.len(), 1);
        assert!(
            container
                .read_part_optional("xl/sharedStrings.xml")
                .expect("missing optional part is not an error")
                .is_none()
        );
        let err = container
            .read_part("xl/workbook.xml")
            .expect_err("required part is missing");
        assert!(matches!(err, ContainerError::FileNotFound { .. }));
    }

    #[test]
    fn part_and_total_budgets_enforced() {
        let bytes = zip_with(&[
            (CONTENT_TYPES_PART, b"<Types/>"),
            ("xl/a.xml", &[b'x'; 12]),
            ("xl/b.xml", &[b'y'; 12]),
            ("xl/big.xml", &[b'z'; 64]),
        ]);
        let limits = ContainerLimits {
            max_part_bytes: 16,
            max_total_bytes: 20,
            ..ContainerLimits::default()
        };
        let mut container = XlsxContainer::open_from_reader_with_limits(Cursor::new(bytes), limits)
            .expect("container should open");

        let err = container
            .read_part("xl/big.xml")
            .expect_err("oversized part should be rejected");
        assert!(matches!(err, ContainerError::PartTooLarge { size: 64, .. }));

        assert_eq!(container.read_part("xl/a.xml").expect("first part").len(), 12);
        let err = container
            .read_part("xl/b.xml")
            .expect_err("budget is spent");
        assert!(matches!(err, ContainerError::TotalTooLarge { limit: 20 }));
    }
}

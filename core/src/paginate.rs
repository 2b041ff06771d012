//! Fixed-size page windows over the full row sequence.

use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    #[error("page numbers start at 1")]
    ZeroPageNumber,
}

/// A 1-based page number with a non-zero page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: usize,
    size: usize,
}

impl Page {
    pub fn new(number: usize, size: usize) -> Result<Page, PageError> {
        if size == 0 {
            return Err(PageError::ZeroPageSize);
        }
        if number == 0 {
            return Err(PageError::ZeroPageNumber);
        }
        Ok(Page { number, size })
    }

    pub fn first(size: usize) -> Result<Page, PageError> {
        Page::new(1, size)
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The following page; there is no upper bound.
    pub fn next(self) -> Page {
        Page {
            number: next_page(self.number),
            ..self
        }
    }

    /// The preceding page, never below page 1.
    pub fn prev(self) -> Page {
        Page {
            number: prev_page(self.number),
            ..self
        }
    }

    /// Index range of this page within `total` rows, clipped to the rows that
    /// exist. Pages past the end yield an empty range.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.number - 1).saturating_mul(self.size).min(total);
        let end = start.saturating_add(self.size).min(total);
        start..end
    }
}

pub fn next_page(page: usize) -> usize {
    page.saturating_add(1)
}

pub fn prev_page(page: usize) -> usize {
    page.saturating_sub(1).max(1)
}

/// `ceil(total / page_size)`, and at least 1 so an empty set still has a page.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Returns the rows on `page` and the total page count.
pub fn paginate<T>(rows: &[T], page: Page) -> (&[T], usize) {
    (&rows[page.range(rows.len())], total_pages(rows.len(), page.size()))
}

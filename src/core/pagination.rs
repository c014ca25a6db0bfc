//! Pagination slicer
//!
//! The page index is clamped into `[0, total_pages - 1]` after every change to
//! the row count or page size, so it can never point past the last page.

use thiserror::Error;

/// Page sizes offered by the "Rows per page" selector
pub const PAGE_SIZES: [usize; 5] = [10, 20, 30, 40, 50];

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Invalid page size: {0}. Use one of 10, 20, 30, 40 or 50")]
    InvalidPageSize(usize),
}

/// Number of pages for `len` rows; never less than one
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a requested page index into the valid range
pub fn clamp_page_index(requested: isize, total_pages: usize) -> usize {
    let last = total_pages.saturating_sub(1);
    if requested < 0 {
        0
    } else {
        (requested as usize).min(last)
    }
}

/// The page window over `rows` and the total page count
pub fn slice<T>(rows: &[T], page_index: isize, page_size: usize) -> (&[T], usize) {
    let size = page_size.max(1);
    let pages = total_pages(rows.len(), size);
    let index = clamp_page_index(page_index, pages);
    let start = (index * size).min(rows.len());
    let end = (start + size).min(rows.len());
    (&rows[start..end], pages)
}

/// Current page index and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_index: usize,
    page_size: usize,
    row_count: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            row_count: 0,
        }
    }
}

impl Pagination {
    /// Start on the first page with the given size
    pub fn new(page_size: usize) -> Result<Self, PaginationError> {
        if !PAGE_SIZES.contains(&page_size) {
            return Err(PaginationError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_size,
            ..Self::default()
        })
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        total_pages(self.row_count, self.page_size)
    }

    /// Record a new row count and re-clamp the page index
    pub fn clamp(&mut self, row_count: usize) {
        self.row_count = row_count;
        self.page_index = clamp_page_index(self.page_index as isize, self.page_count());
    }

    /// Jump to a page, clamping out-of-range requests
    pub fn set_page_index(&mut self, requested: isize) {
        self.page_index = clamp_page_index(requested, self.page_count());
    }

    /// Change the page size and re-clamp the page index
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), PaginationError> {
        if !PAGE_SIZES.contains(&page_size) {
            return Err(PaginationError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.clamp(self.row_count);
        Ok(())
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    pub fn first(&mut self) {
        self.page_index = 0;
    }

    pub fn previous(&mut self) {
        self.set_page_index(self.page_index as isize - 1);
    }

    pub fn next(&mut self) {
        self.set_page_index(self.page_index as isize + 1);
    }

    pub fn last(&mut self) {
        self.page_index = self.page_count() - 1;
    }

    /// The current page window over `rows`
    pub fn window<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        slice(rows, self.page_index as isize, self.page_size).0
    }
}

use shared::protocol::ContentPage;

use crate::error::BrowseError;
use crate::query::PageRequest;

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Zero-based page cursor plus the last-known totals reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    page_index: u32,
    page_size: u32,
    total_pages: u32,
    total_elements: u64,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            total_pages: 0,
            total_elements: 0,
        }
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Out-of-range indices are clamped to the last known page, never
    /// rejected. With no known total yet the index is taken as-is and the
    /// server's answer corrects it.
    pub fn set_page(&mut self, index: u32) {
        self.page_index = if self.total_pages > 0 {
            index.min(self.total_pages - 1)
        } else {
            index
        };
    }

    /// A new page size invalidates the current position; the index resets.
    pub fn set_page_size(&mut self, size: u32) -> Result<(), BrowseError> {
        if size == 0 {
            return Err(BrowseError::PageOutOfRange);
        }
        self.page_size = size;
        self.page_index = 0;
        Ok(())
    }

    pub fn reset_index(&mut self) {
        self.page_index = 0;
    }

    /// Overwrites totals and current page from a successful query. A shrunk
    /// result set can therefore pull the index back before the next dispatch.
    pub fn apply(&mut self, page: &ContentPage) {
        self.total_pages = page.total_pages;
        self.total_elements = page.total_elements;
        self.page_index = page.current_page();
    }

    pub fn request(&self) -> PageRequest {
        PageRequest {
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }
}

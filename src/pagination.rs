// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Page/per-page state shared by every table.
//!
//! Pages are 1-based. The page is always within `1..=total_pages()`, and an
//! empty list still has one (empty) page.

pub const DEFAULT_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    per_page: usize,
    total: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl Pagination {
    /// `per_page` of zero is treated as one.
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            total: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// Move to `page`, clamped into range. Returns the resulting page.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.total_pages());
        self.page
    }

    /// Change the page size. Goes back to the first page.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    /// Record a new total (e.g. the count reported by the server).
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.set_page(self.page);
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Index of the first row of the current page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }

    /// Rows of the current page out of a fully fetched list.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = (start + self.per_page).min(items.len());
        &items[start..end]
    }
}

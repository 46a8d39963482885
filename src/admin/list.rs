// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin tables.
//!
//! The server paginates; search only filters the rows of the page already
//! fetched and never triggers a request.

use tokio::sync::watch;
use tracing::debug;

use crate::{
    api::{admin::AdminListEndpoint, ApiClient},
    error::{describe, ApiError},
    models::{AdminUserItem, CardRequestItem},
    pagination::{Pagination, DEFAULT_PER_PAGE},
};

/// Row types that can be matched against the search box.
pub trait Searchable {
    /// `needle` is already trimmed and lowercased.
    fn matches(&self, needle: &str) -> bool;
}

fn contains(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(needle))
}

impl Searchable for AdminUserItem {
    fn matches(&self, needle: &str) -> bool {
        self.id.to_string().contains(needle)
            || contains(self.phone.as_deref(), needle)
            || contains(self.email.as_deref(), needle)
    }
}

impl Searchable for CardRequestItem {
    fn matches(&self, needle: &str) -> bool {
        self.id.to_string().contains(needle)
            || self.user_id.to_string().contains(needle)
            || contains(self.phone.as_deref(), needle)
            || contains(self.email.as_deref(), needle)
    }
}

pub type UserList = AdminList<AdminUserItem>;
pub type CardRequestList = AdminList<CardRequestItem>;

#[derive(Debug)]
pub struct AdminList<T> {
    items: Vec<T>,
    pagination: Pagination,
    search: String,
    error: Option<String>,
}

impl<T: AdminListEndpoint + Searchable> Default for AdminList<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl<T: AdminListEndpoint + Searchable> AdminList<T> {
    pub fn new(per_page: usize) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::new(per_page),
            search: String::new(),
            error: None,
        }
    }

    /// Fetch the current page. If the reported total no longer reaches the
    /// current page, the page is clamped and fetched again.
    pub async fn refresh(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        let result = self.fetch(client).await;
        self.error = result.as_ref().err().map(describe);
        result
    }

    async fn fetch(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        let requested = self.pagination.page();
        let page = client
            .admin_page::<T>(requested, self.pagination.per_page())
            .await?;
        self.pagination.set_total(page.total);
        self.items = page.items;

        if self.pagination.page() != requested {
            match client
                .admin_page::<T>(self.pagination.page(), self.pagination.per_page())
                .await
            {
                Ok(page) => {
                    self.pagination.set_total(page.total);
                    self.items = page.items;
                }
                Err(e) => {
                    // The fetched rows belong to a page that no longer exists.
                    self.items.clear();
                    return Err(e);
                }
            }
        }
        debug!(
            path = T::PATH,
            page = self.pagination.page(),
            total = self.pagination.total(),
            "admin list loaded"
        );
        Ok(())
    }

    /// Go to `page` (clamped) and fetch it. Returns the resulting page.
    pub async fn set_page(&mut self, client: &ApiClient, page: usize) -> Result<usize, ApiError> {
        self.pagination.set_page(page);
        self.refresh(client).await?;
        Ok(self.pagination.page())
    }

    /// Change the page size; goes back to page 1 and fetches it.
    pub async fn set_per_page(&mut self, client: &ApiClient, per_page: usize) -> Result<(), ApiError> {
        self.pagination.set_per_page(per_page);
        self.refresh(client).await
    }

    /// Update the search text. Filters locally only.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Rows of the fetched page that match the search text.
    pub fn visible(&self) -> Vec<&T> {
        let needle = self.search.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| needle.is_empty() || item.matches(&needle))
            .collect()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Re-fetch when the refresh signal moved since the last call. Returns
    /// whether a fetch happened.
    pub async fn sync_with(
        &mut self,
        client: &ApiClient,
        signal: &mut watch::Receiver<u64>,
    ) -> Result<bool, ApiError> {
        if !signal.has_changed().unwrap_or(false) {
            return Ok(false);
        }
        signal.borrow_and_update();
        self.refresh(client).await?;
        Ok(true)
    }
}

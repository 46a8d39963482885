// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction history table.
//!
//! The full history is fetched page by page from the server, then filtered,
//! sorted and paginated locally. Changing the filter goes back to page 1.

use chrono::NaiveDate;
use tracing::debug;

use crate::{
    api::ApiClient,
    error::{describe, ApiError},
    models::{OperationType, Transaction},
    pagination::{Pagination, DEFAULT_PER_PAGE},
};

/// Page size used when pulling history from the server.
const FETCH_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedAt,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Every set field must match. Dates are inclusive, in UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub currency: Option<String>,
    pub operation: Option<OperationType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Case-insensitive match on id or description.
    pub search: String,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(currency) = &self.currency {
            if !tx.currency.eq_ignore_ascii_case(currency) {
                return false;
            }
        }
        if self.operation.is_some_and(|op| op != tx.operation) {
            return false;
        }
        let day = tx.created_at.date_naive();
        if self.from.is_some_and(|from| day < from) || self.to.is_some_and(|to| day > to) {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || tx.id.to_string().contains(&needle)
            || tx
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

#[derive(Debug)]
pub struct TransactionTable {
    rows: Vec<Transaction>,
    filter: TransactionFilter,
    sort: (SortKey, SortOrder),
    pagination: Pagination,
    error: Option<String>,
}

impl Default for TransactionTable {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl TransactionTable {
    pub fn new(per_page: usize) -> Self {
        Self {
            rows: Vec::new(),
            filter: TransactionFilter::default(),
            sort: (SortKey::default(), SortOrder::default()),
            pagination: Pagination::new(per_page),
            error: None,
        }
    }

    /// Pull the whole history. Returns the number of rows fetched.
    pub async fn load(&mut self, client: &ApiClient) -> Result<usize, ApiError> {
        let result = fetch_all(client).await;
        match result {
            Ok(rows) => {
                debug!(count = rows.len(), "transactions loaded");
                self.error = None;
                self.set_rows(rows);
                Ok(self.rows.len())
            }
            Err(e) => {
                self.error = Some(describe(&e));
                Err(e)
            }
        }
    }

    pub fn set_rows(&mut self, rows: Vec<Transaction>) {
        self.rows = rows;
        self.refresh_total();
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn filter(&self) -> &TransactionFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: TransactionFilter) {
        self.filter = filter;
        self.pagination.set_page(1);
        self.refresh_total();
    }

    pub fn set_sort(&mut self, key: SortKey, order: SortOrder) {
        self.sort = (key, order);
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn set_page(&mut self, page: usize) -> usize {
        self.pagination.set_page(page)
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.pagination.set_per_page(per_page);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Rows matching the filter, sorted.
    pub fn filtered(&self) -> Vec<&Transaction> {
        let mut rows: Vec<&Transaction> =
            self.rows.iter().filter(|tx| self.filter.matches(tx)).collect();
        let (key, order) = self.sort;
        rows.sort_by(|a, b| {
            let ordering = match key {
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::Amount => a.amount.cmp(&b.amount),
            }
            .then_with(|| a.id.cmp(&b.id));
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        rows
    }

    /// Rows of the current page.
    pub fn visible(&self) -> Vec<&Transaction> {
        self.pagination.slice(&self.filtered()).to_vec()
    }

    fn refresh_total(&mut self) {
        let total = self
            .rows
            .iter()
            .filter(|tx| self.filter.matches(tx))
            .count();
        self.pagination.set_total(total);
    }
}

async fn fetch_all(client: &ApiClient) -> Result<Vec<Transaction>, ApiError> {
    let mut rows = Vec::new();
    let mut page = 1;
    loop {
        let batch = client.transactions(page, FETCH_PAGE_SIZE).await?;
        let fetched = batch.items.len();
        rows.extend(batch.items);
        if fetched == 0 || rows.len() >= batch.total {
            return Ok(rows);
        }
        page += 1;
    }
}

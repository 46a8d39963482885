// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Balances
//!
//! - [`BalanceView`] - the user's balances per currency
//! - [`transactions::TransactionTable`] - filtered, sorted, paginated history
//! - [`top_up`] - payment intent creation and the confirmation poller

pub mod top_up;
pub mod transactions;

pub use top_up::{parse_amount, PaymentStatus, PaymentWatcher, QrSource, TopUp};
pub use transactions::{SortKey, SortOrder, TransactionFilter, TransactionTable};

use rust_decimal::Decimal;

use crate::{
    api::ApiClient,
    error::{describe, ApiError},
    models::Balance,
};

/// Amount held in `currency`, zero when the currency is not listed.
pub(crate) fn amount_in(balances: &[Balance], currency: &str) -> Decimal {
    balances
        .iter()
        .find(|b| b.currency.eq_ignore_ascii_case(currency))
        .map(|b| b.amount)
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Default)]
pub struct BalanceView {
    balances: Vec<Balance>,
    error: Option<String>,
}

impl BalanceView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch balances. On failure the previous values stay visible.
    pub async fn load(&mut self, client: &ApiClient) -> Result<&[Balance], ApiError> {
        match client.balances().await {
            Ok(balances) => {
                self.balances = balances;
                self.error = None;
                Ok(&self.balances)
            }
            Err(e) => {
                self.error = Some(describe(&e));
                Err(e)
            }
        }
    }

    pub fn balances(&self) -> &[Balance] {
        &self.balances
    }

    pub fn amount_of(&self, currency: &str) -> Option<Decimal> {
        self.balances
            .iter()
            .find(|b| b.currency.eq_ignore_ascii_case(currency))
            .map(|b| b.amount)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

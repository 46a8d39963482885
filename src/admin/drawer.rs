// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User detail drawer.
//!
//! Opening loads three independent sections concurrently; one failing does
//! not hide the others. Each action has its own state so a failed ban does
//! not mark the tariff form as failed.

use std::{collections::HashMap, str::FromStr};

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::RefreshSignal;
use crate::{
    api::{admin::CreateTransactionRequest, ApiClient},
    error::{describe, ApiError},
    models::{Balance, OperationType, Page, TariffType, Transaction, User},
};

/// Transactions shown in the drawer.
const DRAWER_TRANSACTIONS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Section<T> {
    fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Section::Loaded(value),
            Err(e) => Section::Failed(describe(&e)),
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Section::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawerAction {
    Ban,
    GrantAdmin,
    CreateTransaction,
    SetTariff,
    SendEmail,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    Running,
    Done,
    Failed(String),
}

#[derive(Debug)]
pub struct UserDrawer {
    client: ApiClient,
    user_id: u64,
    user: Section<User>,
    balances: Section<Vec<Balance>>,
    transactions: Section<Page<Transaction>>,
    actions: HashMap<DrawerAction, ActionState>,
    refresh: RefreshSignal,
}

impl UserDrawer {
    /// Open the drawer for `user_id` and load every section.
    pub async fn open(client: ApiClient, user_id: u64, refresh: RefreshSignal) -> Self {
        let mut drawer = Self {
            client,
            user_id,
            user: Section::Loading,
            balances: Section::Loading,
            transactions: Section::Loading,
            actions: HashMap::new(),
            refresh,
        };
        drawer.reload().await;
        drawer
    }

    /// Re-fetch detail, balances and transactions concurrently.
    pub async fn reload(&mut self) {
        let (user, balances, transactions) = tokio::join!(
            self.client.admin_user(self.user_id),
            self.client.admin_user_balances(self.user_id),
            self.client
                .admin_user_transactions(self.user_id, 1, DRAWER_TRANSACTIONS),
        );
        for (section, result) in [
            ("user", user.as_ref().err()),
            ("balances", balances.as_ref().err()),
            ("transactions", transactions.as_ref().err()),
        ] {
            if let Some(e) = result {
                warn!(user_id = self.user_id, section, error = %e, "drawer section failed to load");
            }
        }
        self.user = Section::from_result(user);
        self.balances = Section::from_result(balances);
        self.transactions = Section::from_result(transactions);
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn user(&self) -> &Section<User> {
        &self.user
    }

    pub fn balances(&self) -> &Section<Vec<Balance>> {
        &self.balances
    }

    pub fn transactions(&self) -> &Section<Page<Transaction>> {
        &self.transactions
    }

    pub fn action(&self, action: DrawerAction) -> &ActionState {
        static IDLE: ActionState = ActionState::Idle;
        self.actions.get(&action).unwrap_or(&IDLE)
    }

    pub async fn ban(&mut self, reason: Option<&str>) -> Result<(), ApiError> {
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        self.begin(DrawerAction::Ban);
        let result = self.client.ban_user(self.user_id, reason).await;
        self.finish(DrawerAction::Ban, result).await
    }

    pub async fn grant_admin(&mut self) -> Result<(), ApiError> {
        self.begin(DrawerAction::GrantAdmin);
        let result = self.client.grant_admin(self.user_id).await;
        self.finish(DrawerAction::GrantAdmin, result).await
    }

    /// Manual balance adjustment. `amount` may be negative but not zero.
    pub async fn create_transaction(
        &mut self,
        currency: &str,
        amount: &str,
        operation: OperationType,
        description: Option<&str>,
    ) -> Result<(), ApiError> {
        let request = match transaction_request(currency, amount, operation, description) {
            Ok(request) => request,
            Err(e) => return self.reject(DrawerAction::CreateTransaction, e),
        };
        self.begin(DrawerAction::CreateTransaction);
        let result = self
            .client
            .create_user_transaction(self.user_id, &request)
            .await;
        self.finish(DrawerAction::CreateTransaction, result).await
    }

    pub async fn set_tariff(&mut self, tariff: TariffType) -> Result<(), ApiError> {
        self.begin(DrawerAction::SetTariff);
        let result = self.client.set_user_tariff(self.user_id, tariff).await;
        self.finish(DrawerAction::SetTariff, result).await
    }

    pub async fn send_email(&mut self, subject: &str, body: &str) -> Result<(), ApiError> {
        let (subject, body) = (subject.trim(), body.trim());
        if subject.is_empty() || body.is_empty() {
            return self.reject(
                DrawerAction::SendEmail,
                ApiError::validation("Subject and message are required"),
            );
        }
        self.begin(DrawerAction::SendEmail);
        let result = self.client.send_user_email(self.user_id, subject, body).await;
        self.finish(DrawerAction::SendEmail, result).await
    }

    fn begin(&mut self, action: DrawerAction) {
        self.actions.insert(action, ActionState::Running);
    }

    fn reject(&mut self, action: DrawerAction, error: ApiError) -> Result<(), ApiError> {
        self.actions
            .insert(action, ActionState::Failed(describe(&error)));
        Err(error)
    }

    async fn finish(&mut self, action: DrawerAction, result: Result<(), ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(()) => {
                info!(user_id = self.user_id, action = ?action, "admin action completed");
                self.actions.insert(action, ActionState::Done);
                self.refresh.bump();
                self.reload().await;
                Ok(())
            }
            Err(e) => {
                warn!(user_id = self.user_id, action = ?action, error = %e, "admin action failed");
                self.reject(action, e)
            }
        }
    }
}

fn transaction_request(
    currency: &str,
    amount: &str,
    operation: OperationType,
    description: Option<&str>,
) -> Result<CreateTransactionRequest, ApiError> {
    let currency = currency.trim().to_ascii_uppercase();
    if currency.is_empty() {
        return Err(ApiError::validation("Choose a currency"));
    }
    let amount = Decimal::from_str(&amount.trim().replace(',', "."))
        .map_err(|_| ApiError::validation("Enter a valid amount"))?;
    if amount.is_zero() {
        return Err(ApiError::validation("Amount cannot be zero"));
    }
    if amount.scale() > 2 {
        return Err(ApiError::validation(
            "Amount must have at most 2 decimal places",
        ));
    }
    Ok(CreateTransactionRequest {
        currency,
        amount,
        operation,
        description: description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    })
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Plain records mirrored from API responses. Nothing here is mutated by
//! client logic beyond replacing a value with a freshly fetched one.
//!
//! ## Model Categories
//!
//! - **Users**: the signed-in user and admin list rows
//! - **Money**: balances and transactions (amounts are [`Decimal`])
//! - **Documents**: generated documents and their signing state
//! - **Paging**: the `{ items, total }` page shape used by list endpoints

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PLACEHOLDER;

// =============================================================================
// User Models
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Individual,
    Legal,
    Admin,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Individual => write!(f, "individual"),
            AccountType::Legal => write!(f, "legal"),
            AccountType::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TariffType {
    Basic,
    Standard,
    Premium,
}

impl std::fmt::Display for TariffType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TariffType::Basic => write!(f, "basic"),
            TariffType::Standard => write!(f, "standard"),
            TariffType::Premium => write!(f, "premium"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Banned,
    /// Registered but phone/email not yet confirmed.
    PendingVerification,
}

/// Name fields of a user profile. Both may be absent before KYC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub tariff: Option<TariffType>,
    pub account_type: AccountType,
    pub status: UserStatus,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.account_type == AccountType::Admin
    }

    pub fn is_banned(&self) -> bool {
        self.status == UserStatus::Banned
    }

    /// "First Last", whichever parts exist, or the placeholder.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [&self.profile.first_name, &self.profile.last_name]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            parts.join(" ")
        }
    }
}

// =============================================================================
// Money Models
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// ISO code or ticker, e.g. `USD`, `USDT`.
    pub currency: String,
    pub currency_id: u32,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Deposit,
    Withdrawal,
    Transfer,
    Fee,
    Adjustment,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationType::Deposit => write!(f, "deposit"),
            OperationType::Withdrawal => write!(f, "withdrawal"),
            OperationType::Transfer => write!(f, "transfer"),
            OperationType::Fee => write!(f, "fee"),
            OperationType::Adjustment => write!(f, "adjustment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    pub amount: Decimal,
    pub currency: String,
    pub operation: OperationType,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// Document Models
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub signed_at: Option<DateTime<Utc>>,
}

impl Document {
    pub fn is_signed(&self) -> bool {
        self.signed_at.is_some()
    }
}

// =============================================================================
// Admin Models
// =============================================================================

/// Row of the admin user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUserItem {
    pub id: u64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardRequestStatus {
    New,
    InProgress,
    Issued,
    Rejected,
}

/// Row of the admin card-request list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRequestItem {
    pub id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub status: CardRequestStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Paging
// =============================================================================

/// One page of a server-paginated list with the total row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

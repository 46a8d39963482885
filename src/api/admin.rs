// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only endpoints.
//!
//! These require an admin session and provide:
//! - User and card-request lists (server-paginated)
//! - A single user's detail, balances and transactions
//! - Administrative mutations (ban, grant admin, balance adjustment,
//!   tariff change, email)

use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};

use super::{ApiClient, PageQuery};
use crate::{
    error::ApiError,
    models::{
        AdminUserItem, Balance, CardRequestItem, OperationType, Page, TariffType, Transaction,
        User,
    },
};

/// A row type served by a paginated admin list endpoint.
pub trait AdminListEndpoint: DeserializeOwned {
    const PATH: &'static str;
}

impl AdminListEndpoint for AdminUserItem {
    const PATH: &'static str = "/admin/users";
}

impl AdminListEndpoint for CardRequestItem {
    const PATH: &'static str = "/admin/card-requests";
}

#[derive(Debug, Clone, Serialize)]
struct BanRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// Manual balance adjustment made by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTransactionRequest {
    pub currency: String,
    pub amount: Decimal,
    pub operation: OperationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct TariffRequest {
    tariff: TariffType,
}

#[derive(Debug, Clone, Serialize)]
struct EmailRequest<'a> {
    subject: &'a str,
    body: &'a str,
}

impl ApiClient {
    /// `GET {T::PATH}?page=&per_page=`
    pub async fn admin_page<T: AdminListEndpoint>(
        &self,
        page: usize,
        per_page: usize,
    ) -> Result<Page<T>, ApiError> {
        self.get_query(T::PATH, &PageQuery { page, per_page }).await
    }

    /// `GET /admin/users/{id}`
    pub async fn admin_user(&self, user_id: u64) -> Result<User, ApiError> {
        self.get(&format!("/admin/users/{user_id}")).await
    }

    /// `GET /admin/users/{id}/balances`
    pub async fn admin_user_balances(&self, user_id: u64) -> Result<Vec<Balance>, ApiError> {
        self.get(&format!("/admin/users/{user_id}/balances")).await
    }

    /// `GET /admin/users/{id}/transactions`
    pub async fn admin_user_transactions(
        &self,
        user_id: u64,
        page: usize,
        per_page: usize,
    ) -> Result<Page<Transaction>, ApiError> {
        self.get_query(
            &format!("/admin/users/{user_id}/transactions"),
            &PageQuery { page, per_page },
        )
        .await
    }

    /// `POST /admin/users/{id}/ban`
    pub async fn ban_user(&self, user_id: u64, reason: Option<&str>) -> Result<(), ApiError> {
        self.post_ack(&format!("/admin/users/{user_id}/ban"), &BanRequest { reason })
            .await
    }

    /// `POST /admin/users/{id}/grant-admin`
    pub async fn grant_admin(&self, user_id: u64) -> Result<(), ApiError> {
        self.post_ack(
            &format!("/admin/users/{user_id}/grant-admin"),
            &serde_json::json!({}),
        )
        .await
    }

    /// `POST /admin/users/{id}/transactions`, sent with an idempotency key.
    pub async fn create_user_transaction(
        &self,
        user_id: u64,
        request: &CreateTransactionRequest,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post_idempotent(&format!("/admin/users/{user_id}/transactions"), request)
            .await?;
        Ok(())
    }

    /// `POST /admin/users/{id}/tariff`
    pub async fn set_user_tariff(&self, user_id: u64, tariff: TariffType) -> Result<(), ApiError> {
        self.post_ack(
            &format!("/admin/users/{user_id}/tariff"),
            &TariffRequest { tariff },
        )
        .await
    }

    /// `POST /admin/users/{id}/email`
    pub async fn send_user_email(
        &self,
        user_id: u64,
        subject: &str,
        body: &str,
    ) -> Result<(), ApiError> {
        self.post_ack(
            &format!("/admin/users/{user_id}/email"),
            &EmailRequest { subject, body },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ban_request_omits_missing_reason() {
        assert_eq!(serde_json::to_string(&BanRequest { reason: None }).unwrap(), "{}");
        assert_eq!(
            serde_json::to_string(&BanRequest { reason: Some("fraud") }).unwrap(),
            r#"{"reason":"fraud"}"#
        );
    }

    #[test]
    fn create_transaction_request_serializes_amount_as_string() {
        let request = CreateTransactionRequest {
            currency: "USD".into(),
            amount: Decimal::new(1050, 2),
            operation: OperationType::Adjustment,
            description: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["amount"], "10.50");
        assert_eq!(json["operation"], "adjustment");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn list_paths() {
        assert_eq!(AdminUserItem::PATH, "/admin/users");
        assert_eq!(CardRequestItem::PATH, "/admin/card-requests");
    }
}

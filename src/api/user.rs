// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Endpoints about the signed-in user.

use super::{ApiClient, PageQuery};
use crate::{
    error::ApiError,
    models::{Balance, Page, Transaction, User},
};

impl ApiClient {
    /// `GET /user/me`
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/user/me").await
    }

    /// `GET /user/balances`
    pub async fn balances(&self) -> Result<Vec<Balance>, ApiError> {
        self.get("/user/balances").await
    }

    /// `GET /user/transactions?page=&per_page=`
    pub async fn transactions(
        &self,
        page: usize,
        per_page: usize,
    ) -> Result<Page<Transaction>, ApiError> {
        self.get_query("/user/transactions", &PageQuery { page, per_page })
            .await
    }
}

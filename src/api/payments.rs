// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Payment intent creation for balance top-up.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePaymentRequest {
    pub currency: String,
    pub amount: Decimal,
}

/// Payment intent returned by the backend.
///
/// `qr_code` is a base64 PNG when the provider renders one; `payment_url`
/// is the link a wallet app opens. Either may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ApiClient {
    /// `POST /payments`, sent with an idempotency key.
    pub async fn create_payment(
        &self,
        request: &CreatePaymentRequest,
    ) -> Result<PaymentIntent, ApiError> {
        self.post_idempotent("/payments", request).await
    }
}

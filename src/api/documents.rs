// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Document list, download and OTP-gated signing endpoints.

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::{error::ApiError, models::Document};

/// Code sent to confirm a signature.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignChallenge {
    pub code_id: String,
}

#[derive(Debug, Clone, Serialize)]
struct SignRequest<'a> {
    code_id: &'a str,
    code: &'a str,
}

impl ApiClient {
    /// `GET /documents`
    pub async fn documents(&self) -> Result<Vec<Document>, ApiError> {
        self.get("/documents").await
    }

    /// `GET /documents/{id}/download`
    pub async fn download_document(&self, document_id: u64) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(&format!("/documents/{document_id}/download"))
            .await
    }

    /// `POST /documents/{id}/sign/initiate`
    pub async fn initiate_document_sign(
        &self,
        document_id: u64,
    ) -> Result<SignChallenge, ApiError> {
        self.post(
            &format!("/documents/{document_id}/sign/initiate"),
            &serde_json::json!({}),
        )
        .await
    }

    /// `POST /documents/{id}/sign`; returns the document with `signed_at` set.
    pub async fn sign_document(
        &self,
        document_id: u64,
        code_id: &str,
        code: &str,
    ) -> Result<Document, ApiError> {
        self.post(
            &format!("/documents/{document_id}/sign"),
            &SignRequest { code_id, code },
        )
        .await
    }
}

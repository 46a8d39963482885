// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! KYC submission, attachment upload and passport OCR endpoints.

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ApiError;

/// Which onboarding form is being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KycKind {
    /// Pre-KYC for individuals.
    IndividualBasic,
    IndividualFull,
    /// Pre-KYC for companies.
    LegalPre,
    LegalFull,
}

impl KycKind {
    pub fn path(self) -> &'static str {
        match self {
            KycKind::IndividualBasic => "/kyc/individual/basic",
            KycKind::IndividualFull => "/kyc/individual/full",
            KycKind::LegalPre => "/kyc/legal/pre",
            KycKind::LegalFull => "/kyc/legal/full",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    NotSubmitted,
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KycReceipt {
    pub submission_id: u64,
    pub status: KycStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KycStatusResponse {
    pub status: KycStatus,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    PassportMain,
    PassportRegistration,
    Selfie,
    ProofOfAddress,
    CompanyCharter,
    RegistrationCertificate,
    Other,
}

impl AttachmentKind {
    fn as_str(self) -> &'static str {
        match self {
            AttachmentKind::PassportMain => "passport_main",
            AttachmentKind::PassportRegistration => "passport_registration",
            AttachmentKind::Selfie => "selfie",
            AttachmentKind::ProofOfAddress => "proof_of_address",
            AttachmentKind::CompanyCharter => "company_charter",
            AttachmentKind::RegistrationCertificate => "registration_certificate",
            AttachmentKind::Other => "other",
        }
    }
}

/// A file picked by the user, uploaded after the main submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Fields recognised on a passport scan. Anything unreadable is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PassportData {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub birth_place: Option<String>,
    #[serde(default)]
    pub citizenship: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub issued_at: Option<String>,
    #[serde(default)]
    pub issued_by: Option<String>,
}

fn file_part(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Result<Part, ApiError> {
    Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(content_type)
        .map_err(|e| ApiError::validation(format!("Unsupported file type {content_type}: {e}")))
}

impl ApiClient {
    /// `POST /kyc/{individual|legal}/{basic|full|pre}`
    pub async fn submit_kyc<P: Serialize + ?Sized>(
        &self,
        kind: KycKind,
        payload: &P,
    ) -> Result<KycReceipt, ApiError> {
        self.post(kind.path(), payload).await
    }

    /// `POST /kyc/{submission_id}/attachments` (multipart)
    pub async fn upload_kyc_attachment(
        &self,
        submission_id: u64,
        attachment: &Attachment,
    ) -> Result<(), ApiError> {
        let form = Form::new()
            .text("kind", attachment.kind.as_str())
            .part(
                "file",
                file_part(
                    &attachment.file_name,
                    &attachment.content_type,
                    attachment.bytes.clone(),
                )?,
            );
        let _: serde_json::Value = self
            .post_multipart(&format!("/kyc/{submission_id}/attachments"), form)
            .await?;
        Ok(())
    }

    /// `POST /kyc/passport/ocr` (multipart)
    pub async fn recognize_passport(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<PassportData, ApiError> {
        let form = Form::new().part("file", file_part(file_name, content_type, bytes)?);
        self.post_multipart("/kyc/passport/ocr", form).await
    }

    /// `GET /kyc/status`
    pub async fn kyc_status(&self) -> Result<KycStatusResponse, ApiError> {
        self.get("/kyc/status").await
    }
}

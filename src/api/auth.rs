// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication endpoints: sign-in, two-factor, registration,
//! contact verification and password reset.

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::{error::ApiError, models::AccountType};

/// Channel a one-time code is delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpProvider {
    Sms,
    Email,
    Telegram,
}

impl std::fmt::Display for OtpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OtpProvider::Sms => write!(f, "sms"),
            OtpProvider::Email => write!(f, "email"),
            OtpProvider::Telegram => write!(f, "telegram"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub login: &'a str,
    pub password: &'a str,
}

/// Raw login response: either a token, or a provider/code-id pair when a
/// second factor is required.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub provider: Option<OtpProvider>,
    #[serde(default)]
    pub code_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated { token: String },
    OtpRequired { provider: OtpProvider, code_id: String },
}

impl TryFrom<LoginResponse> for LoginOutcome {
    type Error = ApiError;

    fn try_from(response: LoginResponse) -> Result<Self, Self::Error> {
        match response {
            LoginResponse {
                token: Some(token), ..
            } if !token.is_empty() => Ok(LoginOutcome::Authenticated { token }),
            LoginResponse {
                provider: Some(provider),
                code_id: Some(code_id),
                ..
            } => Ok(LoginOutcome::OtpRequired { provider, code_id }),
            _ => Err(ApiError::unexpected(
                "login response has neither token nor code_id",
            )),
        }
    }
}

/// A code was sent; `code_id` identifies it when verifying.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CodeChallenge {
    pub code_id: String,
    #[serde(default)]
    pub provider: Option<OtpProvider>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyCodeRequest<'a> {
    pub code_id: &'a str,
    pub code: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResendCodeRequest<'a> {
    pub code_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<OtpProvider>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub phone: String,
    pub password: String,
    pub account_type: AccountType,
}

/// Which contact a verification code confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationChannel {
    Phone,
    Email,
}

impl VerificationChannel {
    fn segment(self) -> &'static str {
        match self {
            VerificationChannel::Phone => "phone",
            VerificationChannel::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetTicket {
    pub reset_token: String,
}

#[derive(Debug, Clone, Serialize)]
struct LoginOnly<'a> {
    login: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ConfirmResetRequest<'a> {
    reset_token: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// `POST /auth/login`
    pub async fn login(&self, login: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let response: LoginResponse = self
            .post_public("/auth/login", &LoginRequest { login, password })
            .await?;
        response.try_into()
    }

    /// `POST /auth/2fa/verify`
    pub async fn verify_two_factor(&self, code_id: &str, code: &str) -> Result<String, ApiError> {
        let response: TokenResponse = self
            .post_public("/auth/2fa/verify", &VerifyCodeRequest { code_id, code })
            .await?;
        Ok(response.token)
    }

    /// `POST /auth/2fa/resend`, optionally switching the delivery provider.
    pub async fn resend_two_factor(
        &self,
        code_id: &str,
        provider: Option<OtpProvider>,
    ) -> Result<CodeChallenge, ApiError> {
        self.post_public("/auth/2fa/resend", &ResendCodeRequest { code_id, provider })
            .await
    }

    /// `POST /auth/register`; the challenge confirms the phone number.
    pub async fn register(&self, request: &RegisterRequest) -> Result<CodeChallenge, ApiError> {
        self.post_public("/auth/register", request).await
    }

    /// `POST /auth/verify/{phone|email}`
    pub async fn verify_contact(
        &self,
        channel: VerificationChannel,
        code_id: &str,
        code: &str,
    ) -> Result<String, ApiError> {
        let path = format!("/auth/verify/{}", channel.segment());
        let response: TokenResponse = self
            .post_public(&path, &VerifyCodeRequest { code_id, code })
            .await?;
        Ok(response.token)
    }

    /// `POST /auth/verify/{phone|email}/resend`
    pub async fn resend_verification(
        &self,
        channel: VerificationChannel,
        code_id: &str,
    ) -> Result<CodeChallenge, ApiError> {
        let path = format!("/auth/verify/{}/resend", channel.segment());
        self.post_public(&path, &ResendCodeRequest { code_id, provider: None })
            .await
    }

    /// `POST /auth/password/reset`
    pub async fn request_password_reset(&self, login: &str) -> Result<CodeChallenge, ApiError> {
        self.post_public("/auth/password/reset", &LoginOnly { login })
            .await
    }

    /// `POST /auth/password/reset/verify`
    pub async fn verify_password_reset(
        &self,
        code_id: &str,
        code: &str,
    ) -> Result<ResetTicket, ApiError> {
        self.post_public("/auth/password/reset/verify", &VerifyCodeRequest { code_id, code })
            .await
    }

    /// `POST /auth/password/reset/confirm`
    pub async fn confirm_password_reset(
        &self,
        reset_token: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post_public(
                "/auth/password/reset/confirm",
                &ConfirmResetRequest {
                    reset_token,
                    password,
                },
            )
            .await?;
        Ok(())
    }

    /// `POST /auth/logout`
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.post_ack("/auth/logout", &serde_json::json!({})).await
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password reset wizard: request a code, confirm it, choose a new password.

use std::time::Duration;

use tracing::info;

use super::{countdown::Countdown, otp::validate_otp, registration::validate_password};
use crate::{
    api::ApiClient,
    error::{describe, ApiError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetStep {
    RequestCode,
    EnterCode { login: String, code_id: String },
    NewPassword { reset_token: String },
    Done,
}

#[derive(Debug)]
pub struct PasswordReset {
    client: ApiClient,
    step: ResetStep,
    countdown: Option<Countdown>,
    cooldown: Duration,
    error: Option<String>,
}

impl PasswordReset {
    pub fn new(client: ApiClient, cooldown: Duration) -> Self {
        Self {
            client,
            step: ResetStep::RequestCode,
            countdown: None,
            cooldown,
            error: None,
        }
    }

    pub fn step(&self) -> &ResetStep {
        &self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn resend_remaining_secs(&self) -> Option<u64> {
        self.countdown.map(|c| c.remaining_secs())
    }

    /// Step 1: send a code to the phone or email behind `login`.
    pub async fn request_code(&mut self, login: &str) -> Result<(), ApiError> {
        let result = self.try_request_code(login, false).await;
        self.record(result)
    }

    /// Ask for another code while on step 2.
    pub async fn resend(&mut self) -> Result<(), ApiError> {
        let ResetStep::EnterCode { login, .. } = &self.step else {
            return self.record(Err(ApiError::validation("No code has been requested")));
        };
        let login = login.clone();
        let result = self.try_request_code(&login, true).await;
        self.record(result)
    }

    async fn try_request_code(&mut self, login: &str, resend: bool) -> Result<(), ApiError> {
        let login = login.trim();
        if login.is_empty() {
            return Err(ApiError::validation("Enter your phone or email"));
        }
        if resend {
            if let Some(countdown) = self.countdown.filter(|c| !c.is_elapsed()) {
                return Err(ApiError::validation(format!(
                    "You can request a new code in {} s",
                    countdown.remaining_secs()
                )));
            }
        }

        let challenge = self.client.request_password_reset(login).await?;
        self.step = ResetStep::EnterCode {
            login: login.to_string(),
            code_id: challenge.code_id,
        };
        self.countdown = Some(Countdown::start(self.cooldown));
        Ok(())
    }

    /// Step 2: confirm the code.
    pub async fn submit_code(&mut self, code: &str) -> Result<(), ApiError> {
        let result = self.try_submit_code(code).await;
        self.record(result)
    }

    async fn try_submit_code(&mut self, code: &str) -> Result<(), ApiError> {
        let ResetStep::EnterCode { code_id, .. } = &self.step else {
            return Err(ApiError::validation("No code has been requested"));
        };
        let code = validate_otp(code)?;
        let ticket = self.client.verify_password_reset(code_id, code).await?;
        self.step = ResetStep::NewPassword {
            reset_token: ticket.reset_token,
        };
        self.countdown = None;
        Ok(())
    }

    /// Step 3: set the new password.
    pub async fn set_password(&mut self, password: &str, confirmation: &str) -> Result<(), ApiError> {
        let result = self.try_set_password(password, confirmation).await;
        self.record(result)
    }

    async fn try_set_password(&mut self, password: &str, confirmation: &str) -> Result<(), ApiError> {
        let ResetStep::NewPassword { reset_token } = &self.step else {
            return Err(ApiError::validation("Confirm the code first"));
        };
        validate_password(password, confirmation)?;
        self.client
            .confirm_password_reset(reset_token, password)
            .await?;
        info!("password reset completed");
        self.step = ResetStep::Done;
        Ok(())
    }

    fn record<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        self.error = result.as_ref().err().map(describe);
        result
    }
}

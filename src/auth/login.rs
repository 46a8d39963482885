// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sign-in with an optional two-factor step.
//!
//! ```text
//! Credentials --(token)----------------------------> signed in
//! Credentials --(provider, code_id)--> Otp --(code)--> signed in
//!                                      Otp --resend / switch provider--> Otp
//!                                      Otp --back--> Credentials
//! ```

use std::time::Duration;

use tracing::info;

use super::{complete_sign_in, countdown::Countdown, otp::validate_otp};
use crate::{
    api::{
        auth::{CodeChallenge, LoginOutcome, OtpProvider},
        ApiClient,
    },
    error::{describe, ApiError},
    models::User,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStep {
    Credentials,
    Otp { provider: OtpProvider, code_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginProgress {
    OtpRequired { provider: OtpProvider },
    SignedIn(User),
}

#[derive(Debug)]
pub struct LoginFlow {
    client: ApiClient,
    step: LoginStep,
    countdown: Option<Countdown>,
    cooldown: Duration,
    error: Option<String>,
}

impl LoginFlow {
    pub fn new(client: ApiClient, cooldown: Duration) -> Self {
        Self {
            client,
            step: LoginStep::Credentials,
            countdown: None,
            cooldown,
            error: None,
        }
    }

    pub fn step(&self) -> &LoginStep {
        &self.step
    }

    /// Inline error from the last action, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Seconds until a new code can be requested.
    pub fn resend_remaining_secs(&self) -> Option<u64> {
        self.countdown.map(|c| c.remaining_secs())
    }

    pub fn can_resend(&self) -> bool {
        matches!(self.step, LoginStep::Otp { .. })
            && self.countdown.is_none_or(|c| c.is_elapsed())
    }

    pub async fn submit_credentials(
        &mut self,
        login: &str,
        password: &str,
    ) -> Result<LoginProgress, ApiError> {
        let result = self.try_credentials(login, password).await;
        self.record(result)
    }

    async fn try_credentials(
        &mut self,
        login: &str,
        password: &str,
    ) -> Result<LoginProgress, ApiError> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(ApiError::validation("Enter your login and password"));
        }

        match self.client.login(login, password).await? {
            LoginOutcome::Authenticated { token } => {
                let user = complete_sign_in(&self.client, token).await?;
                Ok(LoginProgress::SignedIn(user))
            }
            LoginOutcome::OtpRequired { provider, code_id } => {
                info!(provider = %provider, "second factor required");
                self.step = LoginStep::Otp { provider, code_id };
                self.countdown = Some(Countdown::start(self.cooldown));
                Ok(LoginProgress::OtpRequired { provider })
            }
        }
    }

    /// Verify the one-time code. Codes that are not six digits are
    /// rejected locally without a request.
    pub async fn submit_otp(&mut self, code: &str) -> Result<User, ApiError> {
        let result = self.try_otp(code).await;
        self.record(result)
    }

    async fn try_otp(&mut self, code: &str) -> Result<User, ApiError> {
        let LoginStep::Otp { code_id, .. } = &self.step else {
            return Err(ApiError::validation("No verification code has been sent"));
        };
        let code = validate_otp(code)?;

        let token = self.client.verify_two_factor(code_id, code).await?;
        let user = complete_sign_in(&self.client, token).await?;
        self.step = LoginStep::Credentials;
        self.countdown = None;
        Ok(user)
    }

    /// Request a new code through the same provider once the countdown has
    /// elapsed.
    pub async fn resend(&mut self) -> Result<(), ApiError> {
        let result = self.try_resend(None).await;
        self.record(result)
    }

    /// Send a new code through `provider`. Not limited by the countdown.
    pub async fn switch_provider(&mut self, provider: OtpProvider) -> Result<(), ApiError> {
        let result = self.try_resend(Some(provider)).await;
        self.record(result)
    }

    async fn try_resend(&mut self, switch_to: Option<OtpProvider>) -> Result<(), ApiError> {
        let LoginStep::Otp { provider, code_id } = &self.step else {
            return Err(ApiError::validation("No verification code has been sent"));
        };
        if switch_to.is_none() {
            if let Some(countdown) = self.countdown.filter(|c| !c.is_elapsed()) {
                return Err(ApiError::validation(format!(
                    "You can request a new code in {} s",
                    countdown.remaining_secs()
                )));
            }
        }

        let provider = switch_to.unwrap_or(*provider);
        let challenge = self
            .client
            .resend_two_factor(code_id, Some(provider))
            .await?;
        self.apply_challenge(challenge, provider);
        Ok(())
    }

    fn apply_challenge(&mut self, challenge: CodeChallenge, requested: OtpProvider) {
        self.step = LoginStep::Otp {
            provider: challenge.provider.unwrap_or(requested),
            code_id: challenge.code_id,
        };
        match self.countdown.as_mut() {
            Some(countdown) => countdown.reset(),
            None => self.countdown = Some(Countdown::start(self.cooldown)),
        }
    }

    /// Return to the credentials form.
    pub fn back(&mut self) {
        self.step = LoginStep::Credentials;
        self.countdown = None;
        self.error = None;
    }

    fn record<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        self.error = result.as_ref().err().map(describe);
        result
    }
}

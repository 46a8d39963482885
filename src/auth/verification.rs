// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Phone / email confirmation code entry.

use std::time::Duration;

use super::{complete_sign_in, countdown::Countdown, otp::validate_otp};
use crate::{
    api::{auth::VerificationChannel, ApiClient},
    error::{describe, ApiError},
    models::User,
};

#[derive(Debug)]
pub struct VerificationFlow {
    client: ApiClient,
    channel: VerificationChannel,
    code_id: String,
    countdown: Countdown,
    error: Option<String>,
    verified: bool,
}

impl VerificationFlow {
    pub fn new(
        client: ApiClient,
        channel: VerificationChannel,
        code_id: String,
        cooldown: Duration,
    ) -> Self {
        Self {
            client,
            channel,
            code_id,
            countdown: Countdown::start(cooldown),
            error: None,
            verified: false,
        }
    }

    pub fn channel(&self) -> VerificationChannel {
        self.channel
    }

    pub fn code_id(&self) -> &str {
        &self.code_id
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn resend_remaining_secs(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    /// Confirm the contact. The returned token signs the user in.
    pub async fn verify(&mut self, code: &str) -> Result<User, ApiError> {
        let result = self.try_verify(code).await;
        self.error = result.as_ref().err().map(describe);
        result
    }

    async fn try_verify(&mut self, code: &str) -> Result<User, ApiError> {
        let code = validate_otp(code)?;
        let token = self
            .client
            .verify_contact(self.channel, &self.code_id, code)
            .await?;
        let user = complete_sign_in(&self.client, token).await?;
        self.verified = true;
        Ok(user)
    }

    /// Send a new code once the countdown has elapsed. Resets the countdown
    /// and clears the previous error.
    pub async fn resend(&mut self) -> Result<(), ApiError> {
        let result = self.try_resend().await;
        self.error = result.as_ref().err().map(describe);
        result
    }

    async fn try_resend(&mut self) -> Result<(), ApiError> {
        if !self.countdown.is_elapsed() {
            return Err(ApiError::validation(format!(
                "You can request a new code in {} s",
                self.countdown.remaining_secs()
            )));
        }
        let challenge = self
            .client
            .resend_verification(self.channel, &self.code_id)
            .await?;
        self.code_id = challenge.code_id;
        self.countdown.reset();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ClientConfig, session::SessionStore};
    use url::Url;

    fn offline_flow() -> VerificationFlow {
        let config = ClientConfig::for_api(Url::parse("http://127.0.0.1:1/api").unwrap());
        let client = ApiClient::new(&config, SessionStore::new()).unwrap();
        VerificationFlow::new(
            client,
            VerificationChannel::Email,
            "code-1".into(),
            Duration::from_secs(30),
        )
    }

    #[tokio::test]
    async fn invalid_code_sets_error_without_request() {
        let mut flow = offline_flow();
        let err = flow.verify("abc").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(flow.error(), Some("Enter the 6-digit code"));
        assert!(!flow.is_verified());
    }

    #[tokio::test(start_paused = true)]
    async fn resend_waits_for_countdown() {
        let mut flow = offline_flow();
        assert_eq!(flow.resend_remaining_secs(), 30);
        assert!(flow.resend().await.unwrap_err().is_validation());
        assert_eq!(flow.code_id(), "code-1");
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sign-up form validation and submission.

use std::time::Duration;

use tracing::info;
use unicode_normalization::UnicodeNormalization;

use super::verification::VerificationFlow;
use crate::{
    api::{
        auth::{RegisterRequest, VerificationChannel},
        ApiClient,
    },
    error::ApiError,
    models::AccountType,
};

const MIN_PASSWORD_LEN: usize = 8;

/// Raw sign-up input as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password_confirmation: String,
    pub account_type: Option<AccountType>,
    pub accept_terms: bool,
}

impl RegistrationForm {
    /// Validate every field and build the request body.
    pub fn validate(&self) -> Result<RegisterRequest, ApiError> {
        let email = normalize_email(&self.email)?;
        let phone = normalize_phone(&self.phone)?;
        validate_password(&self.password, &self.password_confirmation)?;

        let account_type = match self.account_type {
            Some(AccountType::Admin) | None => {
                return Err(ApiError::validation(
                    "Choose an individual or legal entity account",
                ))
            }
            Some(kind) => kind,
        };
        if !self.accept_terms {
            return Err(ApiError::validation("You must accept the terms of service"));
        }

        Ok(RegisterRequest {
            email,
            phone,
            password: self.password.clone(),
            account_type,
        })
    }
}

/// Submit the sign-up form. On success the returned flow confirms the
/// phone number.
pub async fn register(
    client: &ApiClient,
    form: &RegistrationForm,
    cooldown: Duration,
) -> Result<VerificationFlow, ApiError> {
    let request = form.validate()?;
    let challenge = client.register(&request).await?;
    info!(account_type = %request.account_type, "registration submitted");
    Ok(VerificationFlow::new(
        client.clone(),
        VerificationChannel::Phone,
        challenge.code_id,
        cooldown,
    ))
}

/// NFKC-normalised, trimmed, lowercased email. Rejects obviously malformed
/// addresses.
pub fn normalize_email(raw: &str) -> Result<String, ApiError> {
    let email: String = raw.trim().nfkc().collect::<String>().to_lowercase();
    let invalid = || ApiError::validation("Enter a valid email address");

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }
    Ok(email)
}

/// `+` followed by 10 to 15 digits. Spaces, dashes and parentheses are
/// dropped.
pub fn normalize_phone(raw: &str) -> Result<String, ApiError> {
    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = compact
        .strip_prefix('+')
        .ok_or_else(|| ApiError::validation("Phone number must start with +"))?;
    if !(10..=15).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::validation("Enter a valid phone number"));
    }
    Ok(compact)
}

pub fn validate_password(password: &str, confirmation: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if !password.chars().any(char::is_alphabetic) || !password.chars().any(|c| c.is_ascii_digit())
    {
        return Err(ApiError::validation(
            "Password must contain letters and digits",
        ));
    }
    if password != confirmation {
        return Err(ApiError::validation("Passwords do not match"));
    }
    Ok(())
}

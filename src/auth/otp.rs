// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! One-time code format.

use crate::error::ApiError;

pub const OTP_LENGTH: usize = 6;

pub const INVALID_OTP_MESSAGE: &str = "Enter the 6-digit code";

/// Whether the submit button for `code` is enabled.
pub fn can_submit_otp(code: &str) -> bool {
    let code = code.trim();
    code.len() == OTP_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// Trimmed code, or a validation error when it is not exactly six digits.
pub fn validate_otp(code: &str) -> Result<&str, ApiError> {
    if can_submit_otp(code) {
        Ok(code.trim())
    } else {
        Err(ApiError::validation(INVALID_OTP_MESSAGE))
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Field parsers shared by the KYC step forms. Each returns the parsed value
//! or a validation error naming the field.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::error::ApiError;

pub(crate) fn required(value: &str, label: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::validation(format!("{label} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}

pub(crate) fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `YYYY-MM-DD`.
pub(crate) fn date(value: &str, label: &str) -> Result<NaiveDate, ApiError> {
    let raw = required(value, label)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("{label} must be a date in YYYY-MM-DD format")))
}

pub(crate) fn past_date(value: &str, label: &str) -> Result<NaiveDate, ApiError> {
    let parsed = date(value, label)?;
    if parsed >= Utc::now().date_naive() {
        return Err(ApiError::validation(format!("{label} must be in the past")));
    }
    Ok(parsed)
}

/// ISO 3166-1 alpha-2 code, returned uppercase.
pub(crate) fn country(value: &str, label: &str) -> Result<String, ApiError> {
    let raw = required(value, label)?;
    if raw.len() != 2 || !raw.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(ApiError::validation(format!(
            "{label} must be a two-letter country code"
        )));
    }
    Ok(raw.to_ascii_uppercase())
}

/// Non-negative decimal amount.
pub(crate) fn amount(value: &str, label: &str) -> Result<Decimal, ApiError> {
    let raw = required(value, label)?;
    let parsed = Decimal::from_str(&raw.replace(',', "."))
        .map_err(|_| ApiError::validation(format!("{label} must be a number")))?;
    if parsed.is_sign_negative() {
        return Err(ApiError::validation(format!("{label} cannot be negative")));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_names_field() {
        assert_eq!(required("  Anna ", "First name").unwrap(), "Anna");
        let err = required("   ", "First name").unwrap_err();
        assert_eq!(err.to_string(), "First name is required");
    }

    #[test]
    fn dates() {
        assert_eq!(
            date("1990-05-17", "Birth date").unwrap(),
            NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()
        );
        assert!(date("17.05.1990", "Birth date").is_err());
        assert!(past_date("2999-01-01", "Birth date").is_err());
        assert!(past_date("1990-05-17", "Birth date").is_ok());
    }

    #[test]
    fn country_codes() {
        assert_eq!(country("de", "Country").unwrap(), "DE");
        assert!(country("DEU", "Country").is_err());
        assert!(country("1A", "Country").is_err());
    }

    #[test]
    fn amounts_accept_comma() {
        assert_eq!(amount("1500,50", "Turnover").unwrap(), Decimal::new(150050, 2));
        assert!(amount("-1", "Turnover").is_err());
        assert!(amount("lots", "Turnover").is_err());
    }
}

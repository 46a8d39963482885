// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Step forms used by both the individual and the legal-entity wizard.

use rust_decimal::Decimal;
use serde::Serialize;

use super::validation::{amount, country, required};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub country: String,
    pub city: String,
    pub street: String,
    pub postal_code: String,
}

/// Registered address plus an optional separate mailing address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressBlock {
    pub registration: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailing: Option<Address>,
}

#[derive(Debug, Clone, Default)]
pub struct AddressInput {
    pub country: String,
    pub city: String,
    pub street: String,
    pub postal_code: String,
}

impl AddressInput {
    fn parse(&self, prefix: &str) -> Result<Address, ApiError> {
        Ok(Address {
            country: country(&self.country, &format!("{prefix} country"))?,
            city: required(&self.city, &format!("{prefix} city"))?,
            street: required(&self.street, &format!("{prefix} street"))?,
            postal_code: required(&self.postal_code, &format!("{prefix} postal code"))?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AddressForm {
    pub registration: AddressInput,
    pub mailing_same_as_registration: bool,
    pub mailing: AddressInput,
}

impl Default for AddressForm {
    fn default() -> Self {
        Self {
            registration: AddressInput::default(),
            mailing_same_as_registration: true,
            mailing: AddressInput::default(),
        }
    }
}

impl AddressForm {
    pub(crate) fn parse(&self) -> Result<AddressBlock, ApiError> {
        let registration = self.registration.parse("Registration")?;
        let mailing = if self.mailing_same_as_registration {
            None
        } else {
            Some(self.mailing.parse("Mailing")?)
        };
        Ok(AddressBlock {
            registration,
            mailing,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessRelationship {
    pub purpose: String,
    pub source_of_funds: String,
    pub expected_monthly_turnover: Decimal,
    /// Politically exposed person.
    pub pep: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Consents {
    pub personal_data: bool,
    pub terms: bool,
    pub risk_disclosure: bool,
}

/// Last step of every full KYC: relationship questionnaire and consents.
#[derive(Debug, Clone, Default)]
pub struct RelationshipForm {
    pub purpose: String,
    pub source_of_funds: String,
    pub expected_monthly_turnover: String,
    pub pep: bool,
    pub consent_personal_data: bool,
    pub consent_terms: bool,
    pub consent_risk_disclosure: bool,
}

impl RelationshipForm {
    pub(crate) fn parse(&self) -> Result<(BusinessRelationship, Consents), ApiError> {
        let relationship = BusinessRelationship {
            purpose: required(&self.purpose, "Purpose of the business relationship")?,
            source_of_funds: required(&self.source_of_funds, "Source of funds")?,
            expected_monthly_turnover: amount(
                &self.expected_monthly_turnover,
                "Expected monthly turnover",
            )?,
            pep: self.pep,
        };
        if !(self.consent_personal_data && self.consent_terms && self.consent_risk_disclosure) {
            return Err(ApiError::validation("All consents must be accepted"));
        }
        Ok((
            relationship,
            Consents {
                personal_data: true,
                terms: true,
                risk_disclosure: true,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> AddressInput {
        AddressInput {
            country: "cy".into(),
            city: "Limassol".into(),
            street: "Arch. Makariou III 1".into(),
            postal_code: "3030".into(),
        }
    }

    #[test]
    fn mailing_skipped_when_same() {
        let form = AddressForm {
            registration: address(),
            ..AddressForm::default()
        };
        let block = form.parse().unwrap();
        assert_eq!(block.registration.country, "CY");
        assert!(block.mailing.is_none());
    }

    #[test]
    fn separate_mailing_is_validated() {
        let form = AddressForm {
            registration: address(),
            mailing_same_as_registration: false,
            mailing: AddressInput::default(),
        };
        let err = form.parse().unwrap_err();
        assert_eq!(err.to_string(), "Mailing country is required");
    }

    #[test]
    fn consents_required() {
        let form = RelationshipForm {
            purpose: "Investments".into(),
            source_of_funds: "Salary".into(),
            expected_monthly_turnover: "1000".into(),
            consent_personal_data: true,
            consent_terms: true,
            ..RelationshipForm::default()
        };
        assert_eq!(
            form.parse().unwrap_err().to_string(),
            "All consents must be accepted"
        );
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Individual onboarding: the one-page basic KYC and the four-step full KYC
//! (identity, address, tax residency, business relationship).

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::{
    forms::{AddressBlock, AddressForm, BusinessRelationship, Consents, RelationshipForm},
    validation::{country, optional, past_date, required},
    wizard::KycDraft,
};
use crate::{
    api::{
        kyc::{KycKind, PassportData},
        ApiClient,
    },
    error::ApiError,
};

// =============================================================================
// Step 1: Identity
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct IdentityForm {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub birth_date: String,
    pub birth_place: String,
    pub citizenship: String,
    pub passport_number: String,
    pub passport_issued_at: String,
    pub passport_issued_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passport {
    pub number: String,
    pub issued_at: NaiveDate,
    pub issued_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub birth_date: NaiveDate,
    pub birth_place: String,
    pub citizenship: String,
    pub passport: Passport,
}

impl IdentityForm {
    /// Fill fields from an OCR result. Only recognised fields overwrite.
    pub fn prefill(&mut self, data: &PassportData) {
        let pairs = [
            (&mut self.first_name, &data.first_name),
            (&mut self.last_name, &data.last_name),
            (&mut self.middle_name, &data.middle_name),
            (&mut self.birth_date, &data.birth_date),
            (&mut self.birth_place, &data.birth_place),
            (&mut self.citizenship, &data.citizenship),
            (&mut self.passport_number, &data.number),
            (&mut self.passport_issued_at, &data.issued_at),
            (&mut self.passport_issued_by, &data.issued_by),
        ];
        for (field, value) in pairs {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                *field = value.to_string();
            }
        }
    }

    fn parse(&self) -> Result<Identity, ApiError> {
        Ok(Identity {
            first_name: required(&self.first_name, "First name")?,
            last_name: required(&self.last_name, "Last name")?,
            middle_name: optional(&self.middle_name),
            birth_date: past_date(&self.birth_date, "Date of birth")?,
            birth_place: required(&self.birth_place, "Place of birth")?,
            citizenship: country(&self.citizenship, "Citizenship")?,
            passport: Passport {
                number: required(&self.passport_number, "Passport number")?,
                issued_at: past_date(&self.passport_issued_at, "Passport issue date")?,
                issued_by: required(&self.passport_issued_by, "Passport issuer")?,
            },
        })
    }
}

/// Send a passport scan to OCR and prefill the identity form with what was
/// recognised.
pub async fn prefill_from_passport(
    client: &ApiClient,
    form: &mut IdentityForm,
    file_name: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<PassportData, ApiError> {
    let data = client
        .recognize_passport(file_name, content_type, bytes)
        .await?;
    form.prefill(&data);
    debug!(file = %file_name, "identity form prefilled from passport scan");
    Ok(data)
}

// =============================================================================
// Step 3: Tax residency
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct TaxResidencyInput {
    pub country: String,
    /// Taxpayer identification number.
    pub tin: String,
    /// Required when no TIN is given.
    pub no_tin_reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct TaxResidencyForm {
    pub residencies: Vec<TaxResidencyInput>,
    pub us_person: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxResidencyEntry {
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_tin_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxResidency {
    pub residencies: Vec<TaxResidencyEntry>,
    pub us_person: bool,
}

impl TaxResidencyForm {
    fn parse(&self) -> Result<TaxResidency, ApiError> {
        if self.residencies.is_empty() {
            return Err(ApiError::validation("Add at least one tax residency"));
        }
        let residencies = self
            .residencies
            .iter()
            .map(|entry| {
                let tin = optional(&entry.tin);
                let no_tin_reason = optional(&entry.no_tin_reason);
                if tin.is_none() && no_tin_reason.is_none() {
                    return Err(ApiError::validation(
                        "Enter a TIN or explain why there is none",
                    ));
                }
                Ok(TaxResidencyEntry {
                    country: country(&entry.country, "Tax residency country")?,
                    tin,
                    no_tin_reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TaxResidency {
            residencies,
            us_person: self.us_person,
        })
    }
}

// =============================================================================
// Full KYC draft
// =============================================================================

pub enum IndividualStep {
    Identity(IdentityForm),
    Address(AddressForm),
    TaxResidency(TaxResidencyForm),
    Relationship(RelationshipForm),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndividualDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_residency: Option<TaxResidency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_relationship: Option<BusinessRelationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consents: Option<Consents>,
}

impl KycDraft for IndividualDraft {
    type Step = IndividualStep;
    const KIND: KycKind = KycKind::IndividualFull;
    const TOTAL_STEPS: u8 = 4;

    fn step_number(step: &IndividualStep) -> u8 {
        match step {
            IndividualStep::Identity(_) => 1,
            IndividualStep::Address(_) => 2,
            IndividualStep::TaxResidency(_) => 3,
            IndividualStep::Relationship(_) => 4,
        }
    }

    fn apply(&mut self, step: IndividualStep) -> Result<(), ApiError> {
        match step {
            IndividualStep::Identity(form) => self.identity = Some(form.parse()?),
            IndividualStep::Address(form) => self.address = Some(form.parse()?),
            IndividualStep::TaxResidency(form) => self.tax_residency = Some(form.parse()?),
            IndividualStep::Relationship(form) => {
                let (relationship, consents) = form.parse()?;
                self.business_relationship = Some(relationship);
                self.consents = Some(consents);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Basic KYC
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct BasicIndividualForm {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub citizenship: String,
    pub consent_personal_data: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndividualBasicDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citizenship: Option<String>,
    pub consent_personal_data: bool,
}

impl KycDraft for IndividualBasicDraft {
    type Step = BasicIndividualForm;
    const KIND: KycKind = KycKind::IndividualBasic;
    const TOTAL_STEPS: u8 = 1;

    fn step_number(_: &BasicIndividualForm) -> u8 {
        1
    }

    fn apply(&mut self, form: BasicIndividualForm) -> Result<(), ApiError> {
        let first_name = required(&form.first_name, "First name")?;
        let last_name = required(&form.last_name, "Last name")?;
        let birth_date = past_date(&form.birth_date, "Date of birth")?;
        let citizenship = country(&form.citizenship, "Citizenship")?;
        if !form.consent_personal_data {
            return Err(ApiError::validation(
                "Consent to personal data processing is required",
            ));
        }
        *self = Self {
            first_name: Some(first_name),
            last_name: Some(last_name),
            birth_date: Some(birth_date),
            citizenship: Some(citizenship),
            consent_personal_data: true,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kyc::{forms::AddressInput, wizard::KycWizard, WizardProgress};

    fn identity() -> IdentityForm {
        IdentityForm {
            first_name: "Anna".into(),
            last_name: "Ivanova".into(),
            middle_name: " ".into(),
            birth_date: "1990-05-17".into(),
            birth_place: "Moscow".into(),
            citizenship: "ru".into(),
            passport_number: "4510 123456".into(),
            passport_issued_at: "2010-06-01".into(),
            passport_issued_by: "Department 1".into(),
        }
    }

    #[test]
    fn missing_first_name_blocks_step_one() {
        let mut wizard = KycWizard::<IndividualDraft>::new();
        let form = IdentityForm {
            first_name: String::new(),
            ..identity()
        };
        let err = wizard.advance(IndividualStep::Identity(form)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(wizard.step(), 1);
        assert!(!wizard.error().unwrap_or_default().is_empty());
        assert!(wizard.draft().identity.is_none());
    }

    #[test]
    fn full_walkthrough_builds_nested_payload() {
        let mut wizard = KycWizard::<IndividualDraft>::new();
        wizard.advance(IndividualStep::Identity(identity())).unwrap();
        wizard
            .advance(IndividualStep::Address(AddressForm {
                registration: AddressInput {
                    country: "ru".into(),
                    city: "Moscow".into(),
                    street: "Tverskaya 1".into(),
                    postal_code: "125009".into(),
                },
                ..AddressForm::default()
            }))
            .unwrap();
        wizard
            .advance(IndividualStep::TaxResidency(TaxResidencyForm {
                residencies: vec![TaxResidencyInput {
                    country: "RU".into(),
                    tin: "770123456789".into(),
                    no_tin_reason: String::new(),
                }],
                us_person: false,
            }))
            .unwrap();
        let progress = wizard
            .advance(IndividualStep::Relationship(RelationshipForm {
                purpose: "Investments".into(),
                source_of_funds: "Salary".into(),
                expected_monthly_turnover: "5000".into(),
                pep: false,
                consent_personal_data: true,
                consent_terms: true,
                consent_risk_disclosure: true,
            }))
            .unwrap();
        assert_eq!(progress, WizardProgress::ReadyToSubmit);

        let json = serde_json::to_value(wizard.draft()).unwrap();
        assert_eq!(json["identity"]["citizenship"], "RU");
        assert_eq!(json["identity"]["birth_date"], "1990-05-17");
        assert!(json["identity"].get("middle_name").is_none());
        assert_eq!(json["address"]["registration"]["city"], "Moscow");
        assert_eq!(json["tax_residency"]["residencies"][0]["tin"], "770123456789");
        assert_eq!(json["consents"]["terms"], true);
    }

    #[test]
    fn tax_residency_needs_tin_or_reason() {
        let form = TaxResidencyForm {
            residencies: vec![TaxResidencyInput {
                country: "DE".into(),
                ..TaxResidencyInput::default()
            }],
            us_person: false,
        };
        assert!(form.parse().is_err());
        assert!(TaxResidencyForm::default().parse().is_err());
    }

    #[test]
    fn prefill_keeps_unrecognised_fields() {
        let mut form = IdentityForm {
            birth_place: "Kazan".into(),
            ..IdentityForm::default()
        };
        form.prefill(&PassportData {
            first_name: Some("ANNA".into()),
            birth_place: Some("  ".into()),
            number: Some("4510 123456".into()),
            ..PassportData::default()
        });
        assert_eq!(form.first_name, "ANNA");
        assert_eq!(form.birth_place, "Kazan");
        assert_eq!(form.passport_number, "4510 123456");
    }

    #[test]
    fn basic_kyc_requires_consent() {
        let mut draft = IndividualBasicDraft::default();
        let form = BasicIndividualForm {
            first_name: "Anna".into(),
            last_name: "Ivanova".into(),
            birth_date: "1990-05-17".into(),
            citizenship: "RU".into(),
            consent_personal_data: false,
        };
        assert!(draft.apply(form.clone()).is_err());
        assert_eq!(draft, IndividualBasicDraft::default());

        draft
            .apply(BasicIndividualForm {
                consent_personal_data: true,
                ..form
            })
            .unwrap();
        assert_eq!(draft.first_name.as_deref(), Some("Anna"));
    }

    #[test]
    fn basic_kyc_rejects_future_birth_date() {
        let mut draft = IndividualBasicDraft::default();
        let err = draft
            .apply(BasicIndividualForm {
                first_name: "Anna".into(),
                last_name: "Ivanova".into(),
                birth_date: "2999-01-01".into(),
                citizenship: "RU".into(),
                consent_personal_data: true,
            })
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(draft, IndividualBasicDraft::default());
    }
}

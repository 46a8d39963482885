// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Legal-entity onboarding: pre-KYC and the four-step full KYC (company,
//! addresses, management and owners, business relationship).

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{
    forms::{AddressBlock, AddressForm, BusinessRelationship, Consents, RelationshipForm},
    validation::{country, optional, past_date, required},
    wizard::KycDraft,
};
use crate::{api::kyc::KycKind, auth::registration::normalize_phone, error::ApiError};

const FULL_OWNERSHIP: Decimal = Decimal::ONE_HUNDRED;

// =============================================================================
// Step 1: Company
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct CompanyForm {
    pub name: String,
    pub registration_number: String,
    pub registration_date: String,
    pub country: String,
    pub legal_form: String,
    pub tax_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Company {
    pub name: String,
    pub registration_number: String,
    pub registration_date: NaiveDate,
    pub country: String,
    pub legal_form: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
}

impl CompanyForm {
    fn parse(&self) -> Result<Company, ApiError> {
        Ok(Company {
            name: required(&self.name, "Company name")?,
            registration_number: required(&self.registration_number, "Registration number")?,
            registration_date: past_date(&self.registration_date, "Registration date")?,
            country: country(&self.country, "Country of incorporation")?,
            legal_form: required(&self.legal_form, "Legal form")?,
            tax_id: optional(&self.tax_id),
        })
    }
}

// =============================================================================
// Step 3: Management and beneficial owners
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct BeneficiaryInput {
    pub full_name: String,
    /// Ownership share in percent.
    pub share: String,
    pub citizenship: String,
}

#[derive(Debug, Clone, Default)]
pub struct ManagementForm {
    pub director_first_name: String,
    pub director_last_name: String,
    pub director_position: String,
    pub beneficiaries: Vec<BeneficiaryInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Director {
    pub first_name: String,
    pub last_name: String,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Beneficiary {
    pub full_name: String,
    pub share: Decimal,
    pub citizenship: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Management {
    pub director: Director,
    pub beneficiaries: Vec<Beneficiary>,
}

impl BeneficiaryInput {
    fn parse(&self) -> Result<Beneficiary, ApiError> {
        let full_name = required(&self.full_name, "Beneficiary name")?;
        let raw_share = required(&self.share, "Ownership share")?;
        let share = Decimal::from_str(raw_share.trim_end_matches('%').trim())
            .map_err(|_| ApiError::validation("Ownership share must be a number"))?;
        if share <= Decimal::ZERO || share > FULL_OWNERSHIP {
            return Err(ApiError::validation(
                "Ownership share must be between 0 and 100",
            ));
        }
        Ok(Beneficiary {
            full_name,
            share,
            citizenship: country(&self.citizenship, "Beneficiary citizenship")?,
        })
    }
}

impl ManagementForm {
    fn parse(&self) -> Result<Management, ApiError> {
        let director = Director {
            first_name: required(&self.director_first_name, "Director first name")?,
            last_name: required(&self.director_last_name, "Director last name")?,
            position: required(&self.director_position, "Director position")?,
        };
        if self.beneficiaries.is_empty() {
            return Err(ApiError::validation("Add at least one beneficial owner"));
        }
        let beneficiaries = self
            .beneficiaries
            .iter()
            .map(BeneficiaryInput::parse)
            .collect::<Result<Vec<_>, _>>()?;
        let total: Decimal = beneficiaries.iter().map(|b| b.share).sum();
        if total > FULL_OWNERSHIP {
            return Err(ApiError::validation(
                "Ownership shares cannot exceed 100% in total",
            ));
        }
        Ok(Management {
            director,
            beneficiaries,
        })
    }
}

// =============================================================================
// Full KYC draft
// =============================================================================

pub enum LegalStep {
    Company(CompanyForm),
    Address(AddressForm),
    Management(ManagementForm),
    Relationship(RelationshipForm),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegalDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management: Option<Management>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_relationship: Option<BusinessRelationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consents: Option<Consents>,
}

impl KycDraft for LegalDraft {
    type Step = LegalStep;
    const KIND: KycKind = KycKind::LegalFull;
    const TOTAL_STEPS: u8 = 4;

    fn step_number(step: &LegalStep) -> u8 {
        match step {
            LegalStep::Company(_) => 1,
            LegalStep::Address(_) => 2,
            LegalStep::Management(_) => 3,
            LegalStep::Relationship(_) => 4,
        }
    }

    fn apply(&mut self, step: LegalStep) -> Result<(), ApiError> {
        match step {
            LegalStep::Company(form) => self.company = Some(form.parse()?),
            LegalStep::Address(form) => self.address = Some(form.parse()?),
            LegalStep::Management(form) => self.management = Some(form.parse()?),
            LegalStep::Relationship(form) => {
                let (relationship, consents) = form.parse()?;
                self.business_relationship = Some(relationship);
                self.consents = Some(consents);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Pre-KYC
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct LegalPreForm {
    pub company_name: String,
    pub registration_number: String,
    pub country: String,
    pub contact_name: String,
    pub contact_phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegalPreDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

impl KycDraft for LegalPreDraft {
    type Step = LegalPreForm;
    const KIND: KycKind = KycKind::LegalPre;
    const TOTAL_STEPS: u8 = 1;

    fn step_number(_: &LegalPreForm) -> u8 {
        1
    }

    fn apply(&mut self, form: LegalPreForm) -> Result<(), ApiError> {
        *self = Self {
            company_name: Some(required(&form.company_name, "Company name")?),
            registration_number: Some(required(
                &form.registration_number,
                "Registration number",
            )?),
            country: Some(country(&form.country, "Country of incorporation")?),
            contact_name: Some(required(&form.contact_name, "Contact person")?),
            contact_phone: Some(normalize_phone(&form.contact_phone)?),
        };
        Ok(())
    }
}

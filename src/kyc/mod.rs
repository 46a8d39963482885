// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # KYC Onboarding
//!
//! Four questionnaires share one engine, [`KycWizard`]:
//!
//! | Draft                    | Steps | Endpoint                 |
//! |--------------------------|-------|--------------------------|
//! | [`IndividualBasicDraft`] | 1     | `/kyc/individual/basic`  |
//! | [`IndividualDraft`]      | 4     | `/kyc/individual/full`   |
//! | [`LegalPreDraft`]        | 1     | `/kyc/legal/pre`         |
//! | [`LegalDraft`]           | 4     | `/kyc/legal/full`        |
//!
//! Step input is raw text as typed; each draft validates it into typed
//! values before it is stored. The identity step of the individual form can
//! be prefilled from a passport scan via [`prefill_from_passport`].

pub mod forms;
pub mod individual;
pub mod legal;
mod validation;
pub mod wizard;

pub use forms::{AddressForm, AddressInput, RelationshipForm};
pub use individual::{
    prefill_from_passport, BasicIndividualForm, IdentityForm, IndividualBasicDraft,
    IndividualDraft, IndividualStep, TaxResidencyForm, TaxResidencyInput,
};
pub use legal::{
    BeneficiaryInput, CompanyForm, LegalDraft, LegalPreDraft, LegalPreForm, LegalStep,
    ManagementForm,
};
pub use wizard::{KycDraft, KycSubmission, KycWizard, WizardProgress, SUBMIT_FAILED_MESSAGE};

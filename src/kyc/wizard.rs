// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Generic multi-step form engine.
//!
//! A [`KycDraft`] accumulates validated step data. [`KycWizard`] walks the
//! steps in order: a step only advances when its input validates, and the
//! draft is posted once every step is complete. Attachments are uploaded
//! after the main submission; a failed upload is logged and does not fail
//! the submission.

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    api::{
        kyc::{Attachment, KycKind, KycReceipt},
        ApiClient,
    },
    error::{describe, ApiError},
};

/// Shown when the backend rejects or cannot receive the submission.
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit the form. Please try again.";

pub trait KycDraft: Default + Serialize {
    /// Input for one step, usually an enum with one variant per step.
    type Step;

    const KIND: KycKind;
    const TOTAL_STEPS: u8;

    /// 1-based step number the input belongs to.
    fn step_number(step: &Self::Step) -> u8;

    /// Validate the input and store it. Must leave the draft untouched on
    /// error.
    fn apply(&mut self, step: Self::Step) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardProgress {
    /// Now on this step.
    Step(u8),
    ReadyToSubmit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KycSubmission {
    pub receipt: KycReceipt,
    pub uploaded: usize,
    /// File names whose upload failed.
    pub failed_uploads: Vec<String>,
}

#[derive(Debug)]
pub struct KycWizard<D: KycDraft> {
    step: u8,
    completed: u8,
    draft: D,
    attachments: Vec<Attachment>,
    error: Option<String>,
}

impl<D: KycDraft> Default for KycWizard<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: KycDraft> KycWizard<D> {
    pub fn new() -> Self {
        Self {
            step: 1,
            completed: 0,
            draft: D::default(),
            attachments: Vec::new(),
            error: None,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn total_steps(&self) -> u8 {
        D::TOTAL_STEPS
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= D::TOTAL_STEPS
    }

    /// Validate and store the current step's input, then move forward.
    /// On error the step and the draft stay as they were.
    pub fn advance(&mut self, input: D::Step) -> Result<WizardProgress, ApiError> {
        let number = D::step_number(&input);
        if number != self.step {
            return self.fail(ApiError::validation(format!(
                "Complete step {} first",
                self.step
            )));
        }
        if let Err(e) = self.draft.apply(input) {
            return self.fail(e);
        }

        self.error = None;
        self.completed = self.completed.max(number);
        if self.step < D::TOTAL_STEPS {
            self.step += 1;
            Ok(WizardProgress::Step(self.step))
        } else {
            Ok(WizardProgress::ReadyToSubmit)
        }
    }

    /// Go to the previous step. Entered data is kept.
    pub fn back(&mut self) -> u8 {
        self.step = self.step.saturating_sub(1).max(1);
        self.error = None;
        self.step
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn remove_attachment(&mut self, index: usize) -> Option<Attachment> {
        (index < self.attachments.len()).then(|| self.attachments.remove(index))
    }

    /// Throw away everything entered so far.
    pub fn discard(&mut self) {
        *self = Self::new();
    }

    /// Post the draft, then upload attachments one by one. On failure the
    /// draft is kept so the user can retry.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<KycSubmission, ApiError> {
        if !self.is_complete() {
            return self.fail(ApiError::validation(
                "Complete all steps before submitting",
            ));
        }

        let receipt = match client.submit_kyc(D::KIND, &self.draft).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(kind = ?D::KIND, error = %e, "KYC submission failed");
                self.error = Some(SUBMIT_FAILED_MESSAGE.to_string());
                return Err(e);
            }
        };

        let mut uploaded = 0;
        let mut failed_uploads = Vec::new();
        for attachment in &self.attachments {
            match client
                .upload_kyc_attachment(receipt.submission_id, attachment)
                .await
            {
                Ok(()) => uploaded += 1,
                Err(e) => {
                    warn!(
                        submission_id = receipt.submission_id,
                        file = %attachment.file_name,
                        error = %e,
                        "attachment upload failed"
                    );
                    failed_uploads.push(attachment.file_name.clone());
                }
            }
        }

        info!(
            kind = ?D::KIND,
            submission_id = receipt.submission_id,
            uploaded,
            failed = failed_uploads.len(),
            "KYC submitted"
        );
        self.discard();
        Ok(KycSubmission {
            receipt,
            uploaded,
            failed_uploads,
        })
    }

    fn fail<T>(&mut self, error: ApiError) -> Result<T, ApiError> {
        self.error = Some(describe(&error));
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::kyc::AttachmentKind, config::ClientConfig, session::SessionStore};
    use url::Url;

    #[derive(Debug, Default, Serialize)]
    struct TwoSteps {
        name: Option<String>,
        city: Option<String>,
    }

    enum TwoStepInput {
        Name(String),
        City(String),
    }

    impl KycDraft for TwoSteps {
        type Step = TwoStepInput;
        const KIND: KycKind = KycKind::IndividualBasic;
        const TOTAL_STEPS: u8 = 2;

        fn step_number(step: &TwoStepInput) -> u8 {
            match step {
                TwoStepInput::Name(_) => 1,
                TwoStepInput::City(_) => 2,
            }
        }

        fn apply(&mut self, step: TwoStepInput) -> Result<(), ApiError> {
            match step {
                TwoStepInput::Name(n) if n.is_empty() => {
                    Err(ApiError::validation("Name is required"))
                }
                TwoStepInput::Name(n) => {
                    self.name = Some(n);
                    Ok(())
                }
                TwoStepInput::City(c) => {
                    self.city = Some(c);
                    Ok(())
                }
            }
        }
    }

    #[test]
    fn invalid_step_keeps_position() {
        let mut wizard = KycWizard::<TwoSteps>::new();
        assert!(wizard.advance(TwoStepInput::Name(String::new())).is_err());
        assert_eq!(wizard.step(), 1);
        assert_eq!(wizard.error(), Some("Name is required"));
        assert!(wizard.draft().name.is_none());
    }

    #[test]
    fn steps_in_order_then_ready() {
        let mut wizard = KycWizard::<TwoSteps>::new();
        assert!(wizard.advance(TwoStepInput::City("Riga".into())).is_err());

        assert_eq!(
            wizard.advance(TwoStepInput::Name("Anna".into())).unwrap(),
            WizardProgress::Step(2)
        );
        assert_eq!(wizard.error(), None);
        assert_eq!(
            wizard.advance(TwoStepInput::City("Riga".into())).unwrap(),
            WizardProgress::ReadyToSubmit
        );
        assert!(wizard.is_complete());
    }

    #[test]
    fn back_keeps_data() {
        let mut wizard = KycWizard::<TwoSteps>::new();
        wizard.advance(TwoStepInput::Name("Anna".into())).unwrap();
        assert_eq!(wizard.back(), 1);
        assert_eq!(wizard.back(), 1);
        assert_eq!(wizard.draft().name.as_deref(), Some("Anna"));
    }

    #[test]
    fn discard_drops_draft_and_attachments() {
        let mut wizard = KycWizard::<TwoSteps>::new();
        wizard.advance(TwoStepInput::Name("Anna".into())).unwrap();
        wizard.attach(Attachment {
            kind: AttachmentKind::Selfie,
            file_name: "selfie.png".into(),
            content_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        });
        assert_eq!(wizard.step(), 2);

        wizard.discard();
        assert_eq!(wizard.step(), 1);
        assert!(wizard.draft().name.is_none());
        assert!(wizard.draft().city.is_none());
        assert!(wizard.attachments().is_empty());
        assert!(wizard.error().is_none());
    }

    #[tokio::test]
    async fn incomplete_draft_is_not_sent() {
        let config = ClientConfig::for_api(Url::parse("http://127.0.0.1:1/api").unwrap());
        let client = ApiClient::new(&config, SessionStore::new()).unwrap();
        let mut wizard = KycWizard::<TwoSteps>::new();
        let err = wizard.submit(&client).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn failed_submission_keeps_draft() {
        let config = ClientConfig::for_api(Url::parse("http://127.0.0.1:1/api").unwrap());
        let session = SessionStore::new();
        session.set_token("t");
        let client = ApiClient::new(&config, session).unwrap();

        let mut wizard = KycWizard::<TwoSteps>::new();
        wizard.advance(TwoStepInput::Name("Anna".into())).unwrap();
        wizard.advance(TwoStepInput::City("Riga".into())).unwrap();

        assert!(wizard.submit(&client).await.is_err());
        assert_eq!(wizard.error(), Some(SUBMIT_FAILED_MESSAGE));
        assert_eq!(wizard.draft().city.as_deref(), Some("Riga"));
        assert!(wizard.is_complete());
    }
}

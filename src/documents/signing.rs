// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! OTP-confirmed document signing, one document or a queue.
//!
//! Signing a document is two calls: `initiate` sends a code, `sign` checks
//! it. With a queue, confirming one document immediately initiates the next
//! one so the dialog stays open until the queue is empty.

use std::{collections::VecDeque, mem, time::Duration};

use tracing::{info, warn};

use crate::{
    api::ApiClient,
    auth::{countdown::Countdown, otp::validate_otp},
    error::{describe, ApiError},
    models::Document,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignProgress {
    /// A code for this document was sent.
    Next { document_id: u64 },
    /// Queue exhausted; the dialog closes.
    Finished { signed: Vec<Document> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Current {
    document_id: u64,
    /// `None` until a code for this document has been sent.
    code_id: Option<String>,
}

#[derive(Debug)]
pub struct SignFlow {
    client: ApiClient,
    current: Option<Current>,
    queue: VecDeque<u64>,
    signed: Vec<Document>,
    countdown: Option<Countdown>,
    cooldown: Duration,
    error: Option<String>,
}

impl SignFlow {
    pub fn new(client: ApiClient, cooldown: Duration) -> Self {
        Self {
            client,
            current: None,
            queue: VecDeque::new(),
            signed: Vec::new(),
            countdown: None,
            cooldown,
            error: None,
        }
    }

    /// Whether the signing dialog is shown.
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_document(&self) -> Option<u64> {
        self.current.as_ref().map(|c| c.document_id)
    }

    /// Documents waiting after the current one, in order.
    pub fn queued(&self) -> Vec<u64> {
        self.queue.iter().copied().collect()
    }

    pub fn signed(&self) -> &[Document] {
        &self.signed
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn resend_remaining_secs(&self) -> Option<u64> {
        self.countdown.map(|c| c.remaining_secs())
    }

    /// Open the dialog for a single document.
    pub async fn sign_one(&mut self, document_id: u64) -> Result<SignProgress, ApiError> {
        self.reset();
        let result = self.start(document_id).await;
        self.record(result)
    }

    /// Queue every unsigned document, in list order, and start the first.
    pub async fn sign_all_pending(&mut self, documents: &[Document]) -> Result<SignProgress, ApiError> {
        self.reset();
        self.queue = documents
            .iter()
            .filter(|d| !d.is_signed())
            .map(|d| d.id)
            .collect();
        let Some(first) = self.queue.pop_front() else {
            return self.record(Err(ApiError::validation(
                "There are no documents awaiting signature",
            )));
        };
        info!(count = self.queue.len() + 1, "signing pending documents");
        let result = self.start(first).await;
        self.record(result)
    }

    /// Confirm the current document with `code`.
    pub async fn confirm(&mut self, code: &str) -> Result<SignProgress, ApiError> {
        let result = self.try_confirm(code).await;
        self.record(result)
    }

    async fn try_confirm(&mut self, code: &str) -> Result<SignProgress, ApiError> {
        let Some(Current {
            document_id,
            code_id: Some(code_id),
        }) = self.current.clone()
        else {
            return Err(ApiError::validation("No signing code has been requested"));
        };
        let code = validate_otp(code)?;

        let document = self
            .client
            .sign_document(document_id, &code_id, code)
            .await?;
        info!(document_id, "document signed");
        self.signed.push(document);

        match self.queue.pop_front() {
            Some(next) => self.start(next).await,
            None => {
                self.current = None;
                self.countdown = None;
                Ok(SignProgress::Finished {
                    signed: mem::take(&mut self.signed),
                })
            }
        }
    }

    /// Request a new code for the current document once the countdown ran
    /// out.
    pub async fn resend(&mut self) -> Result<SignProgress, ApiError> {
        let result = self.try_resend().await;
        self.record(result)
    }

    async fn try_resend(&mut self) -> Result<SignProgress, ApiError> {
        let Some(document_id) = self.current_document() else {
            return Err(ApiError::validation("No document is being signed"));
        };
        if let Some(countdown) = self.countdown.filter(|c| !c.is_elapsed()) {
            return Err(ApiError::validation(format!(
                "You can request a new code in {} s",
                countdown.remaining_secs()
            )));
        }
        self.start(document_id).await
    }

    /// Retry the code request for the current document after it failed.
    pub async fn resume(&mut self) -> Result<SignProgress, ApiError> {
        let result = match self.current.clone() {
            Some(Current {
                document_id,
                code_id: None,
            }) => self.start(document_id).await,
            Some(Current {
                document_id,
                code_id: Some(_),
            }) => Ok(SignProgress::Next { document_id }),
            None => Err(ApiError::validation("No document is being signed")),
        };
        self.record(result)
    }

    /// Close the dialog and drop the queue.
    pub fn cancel(&mut self) {
        if let Some(document_id) = self.current_document() {
            info!(document_id, remaining = self.queue.len(), "signing cancelled");
        }
        self.reset();
    }

    async fn start(&mut self, document_id: u64) -> Result<SignProgress, ApiError> {
        // A code already sent for this document stays usable if a resend fails.
        let previous = self
            .current
            .take()
            .filter(|c| c.document_id == document_id)
            .and_then(|c| c.code_id);
        match self.client.initiate_document_sign(document_id).await {
            Ok(challenge) => {
                self.current = Some(Current {
                    document_id,
                    code_id: Some(challenge.code_id),
                });
                self.countdown = Some(Countdown::start(self.cooldown));
                Ok(SignProgress::Next { document_id })
            }
            Err(e) => {
                warn!(document_id, error = %e, "failed to request signing code");
                self.current = Some(Current {
                    document_id,
                    code_id: previous,
                });
                self.countdown = None;
                Err(e)
            }
        }
    }

    fn reset(&mut self) {
        self.current = None;
        self.queue.clear();
        self.signed.clear();
        self.countdown = None;
        self.error = None;
    }

    fn record<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        self.error = result.as_ref().err().map(describe);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ClientConfig, session::SessionStore};
    use chrono::Utc;
    use url::Url;

    fn offline() -> SignFlow {
        let config = ClientConfig::for_api(Url::parse("http://127.0.0.1:1/api").unwrap());
        let session = SessionStore::new();
        session.set_token("t");
        SignFlow::new(ApiClient::new(&config, session).unwrap(), Duration::from_secs(60))
    }

    fn document(id: u64, signed: bool) -> Document {
        Document {
            id,
            name: format!("Agreement {id}"),
            created_at: Utc::now(),
            signed_at: signed.then(Utc::now),
        }
    }

    #[tokio::test]
    async fn nothing_pending_is_a_validation_error() {
        let mut flow = offline();
        let err = flow
            .sign_all_pending(&[document(1, true)])
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(!flow.is_open());
    }

    #[tokio::test]
    async fn failed_initiation_keeps_dialog_for_retry() {
        let mut flow = offline();
        let docs = [document(1, false), document(2, true), document(3, false)];
        let err = flow.sign_all_pending(&docs).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(flow.current_document(), Some(1));
        assert_eq!(flow.queued(), vec![3]);
        assert!(flow.error().is_some());

        let err = flow.confirm("123456").await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn short_code_is_rejected_locally() {
        let mut flow = offline();
        flow.current = Some(Current {
            document_id: 9,
            code_id: Some("c".into()),
        });
        let err = flow.confirm("12").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(flow.error(), Some("Enter the 6-digit code"));
        assert_eq!(flow.current_document(), Some(9));
    }

    #[test]
    fn cancel_closes_dialog() {
        let mut flow = offline();
        flow.current = Some(Current {
            document_id: 1,
            code_id: Some("c".into()),
        });
        flow.queue.push_back(2);
        flow.cancel();
        assert!(!flow.is_open());
        assert!(flow.queued().is_empty());
    }
}

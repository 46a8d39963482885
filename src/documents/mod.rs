// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Documents
//!
//! [`DocumentList`] holds the user's generated documents; signing goes
//! through [`signing::SignFlow`].

pub mod signing;

pub use signing::{SignFlow, SignProgress};

use tracing::debug;

use crate::{
    api::ApiClient,
    error::{describe, ApiError},
    models::Document,
};

#[derive(Debug, Default)]
pub struct DocumentList {
    documents: Vec<Document>,
    error: Option<String>,
}

impl DocumentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, client: &ApiClient) -> Result<&[Document], ApiError> {
        match client.documents().await {
            Ok(documents) => {
                debug!(count = documents.len(), "documents loaded");
                self.documents = documents;
                self.error = None;
                Ok(&self.documents)
            }
            Err(e) => {
                self.error = Some(describe(&e));
                Err(e)
            }
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Unsigned documents in list order.
    pub fn pending(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|d| !d.is_signed())
    }

    pub fn has_pending(&self) -> bool {
        self.pending().next().is_some()
    }

    /// Replace a document with its signed version.
    pub fn mark_signed(&mut self, signed: &[Document]) {
        for doc in signed {
            if let Some(existing) = self.documents.iter_mut().find(|d| d.id == doc.id) {
                *existing = doc.clone();
            }
        }
    }

    pub async fn download(&self, client: &ApiClient, document_id: u64) -> Result<Vec<u8>, ApiError> {
        let bytes = client.download_document(document_id).await?;
        debug!(document_id, size = bytes.len(), "document downloaded");
        Ok(bytes)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Store
//!
//! Holds the state shared across the whole cabinet: the bearer token, the
//! signed-in user and the "top-up modal open" flag. Each value is a
//! `tokio::sync::watch` channel, so any number of readers can subscribe
//! while writers replace the whole value.
//!
//! The token can optionally be persisted to a JSON file so a later process
//! starts signed in:
//!
//! ```text
//! { "token": "eyJhbGciOi..." }
//! ```

use std::{
    fs,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::User;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("session file is corrupted: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    token: Option<String>,
}

#[derive(Debug)]
struct Inner {
    token: watch::Sender<Option<String>>,
    user: watch::Sender<Option<User>>,
    top_up_open: watch::Sender<bool>,
    persist_path: Option<PathBuf>,
}

/// Cheaply cloneable handle to the shared session state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// In-memory session, nothing is written to disk.
    pub fn new() -> Self {
        Self::build(None, None)
    }

    /// Session backed by `path`. An existing file seeds the token.
    pub fn with_persistence(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let token = load_token(&path)?;
        debug!(path = %path.display(), restored = token.is_some(), "session store opened");
        Ok(Self::build(token, Some(path)))
    }

    fn build(token: Option<String>, persist_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                token: watch::Sender::new(token),
                user: watch::Sender::new(None),
                top_up_open: watch::Sender::new(false),
                persist_path,
            }),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.inner.token.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.token.borrow().is_some()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.persist(Some(&token));
        self.inner.token.send_replace(Some(token));
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.user.borrow().clone()
    }

    pub fn set_user(&self, user: User) {
        self.inner.user.send_replace(Some(user));
    }

    /// Forget token and user, and remove the persisted token.
    pub fn clear(&self) {
        self.persist(None);
        self.inner.token.send_replace(None);
        self.inner.user.send_replace(None);
        self.inner.top_up_open.send_replace(false);
    }

    pub fn top_up_open(&self) -> bool {
        *self.inner.top_up_open.borrow()
    }

    pub fn set_top_up_open(&self, open: bool) {
        self.inner.top_up_open.send_replace(open);
    }

    pub fn subscribe_token(&self) -> watch::Receiver<Option<String>> {
        self.inner.token.subscribe()
    }

    pub fn subscribe_user(&self) -> watch::Receiver<Option<User>> {
        self.inner.user.subscribe()
    }

    pub fn subscribe_top_up(&self) -> watch::Receiver<bool> {
        self.inner.top_up_open.subscribe()
    }

    fn persist(&self, token: Option<&str>) {
        let Some(path) = self.inner.persist_path.as_deref() else {
            return;
        };
        if let Err(error) = store_token(path, token) {
            // The in-memory session stays valid; only the next start loses it.
            warn!(path = %path.display(), error = %error, "failed to persist session token");
        }
    }
}

fn load_token(path: &Path) -> Result<Option<String>, SessionError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let session: PersistedSession = serde_json::from_str(&raw)?;
    Ok(session.token.filter(|t| !t.trim().is_empty()))
}

fn store_token(path: &Path, token: Option<&str>) -> Result<(), SessionError> {
    match token {
        Some(token) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let body = serde_json::to_string(&PersistedSession {
                token: Some(token.to_string()),
            })?;
            fs::write(path, body)?;
        }
        None => match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}

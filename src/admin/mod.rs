// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Admin Back-Office
//!
//! - [`list::AdminList`] - server-paginated user / card-request tables with
//!   client-side search
//! - [`drawer::UserDrawer`] - one user's detail, balances and transactions
//!   plus administrative actions
//!
//! After a successful action the drawer bumps the shared [`RefreshSignal`];
//! lists subscribed to it re-fetch their current page.

pub mod drawer;
pub mod list;

pub use drawer::{ActionState, DrawerAction, Section, UserDrawer};
pub use list::{AdminList, CardRequestList, Searchable, UserList};

use std::sync::Arc;

use tokio::sync::watch;

/// Generation counter shared between the drawer and the lists.
#[derive(Debug, Clone)]
pub struct RefreshSignal {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for RefreshSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshSignal {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(watch::Sender::new(0)),
        }
    }

    /// Notify subscribers. Returns the new generation.
    pub fn bump(&self) -> u64 {
        self.tx.send_modify(|generation| *generation += 1);
        *self.tx.borrow()
    }

    pub fn generation(&self) -> u64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_marks_receivers_changed() {
        let signal = RefreshSignal::new();
        let rx = signal.subscribe();
        assert!(!rx.has_changed().unwrap());
        assert_eq!(signal.clone().bump(), 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(signal.generation(), 1);
    }
}

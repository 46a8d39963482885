// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cabinet Client - headless client for the brokerage personal cabinet
//!
//! This crate holds the session, the typed REST client and the client-side
//! state machines of the cabinet. A renderer drives these types and draws
//! their state; nothing here renders.
//!
//! ## Modules
//!
//! - `api` - REST client (reqwest) and one wrapper per backend endpoint
//! - `auth` - Two-factor login, registration, verification, password reset
//! - `kyc` - KYC / pre-KYC wizards
//! - `balance` - Balances, transaction table, top-up and payment polling
//! - `documents` - Document list and the signing queue
//! - `admin` - Admin lists and the user drawer
//! - `session` - Shared observable session state

pub mod admin;
pub mod api;
pub mod auth;
pub mod balance;
pub mod config;
pub mod documents;
pub mod error;
pub mod kyc;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod session;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use session::SessionStore;

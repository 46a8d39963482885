// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Client configuration is loaded from the environment. Unset or blank
//! variables fall back to the defaults below; unparsable numbers fall back
//! to the default as well.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CABINET_API_URL` | REST API base URL | `http://localhost:8000/api` |
//! | `CABINET_PAYMENT_URL` | Base URL for locally built payment links | `https://pay.localhost/invoice` |
//! | `CABINET_HTTP_TIMEOUT_SECS` | Per-request timeout | `15` |
//! | `CABINET_POLL_INTERVAL_SECS` | Balance poll interval during top-up | `6` |
//! | `CABINET_POLL_MAX_ATTEMPTS` | Polls before a top-up expires | `100` |
//! | `CABINET_RESEND_COOLDOWN_SECS` | OTP resend countdown | `60` |
//! | `CABINET_SESSION_FILE` | Where the session token is persisted | unset (memory only) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,cabinet_client=debug` |

use std::{path::PathBuf, time::Duration};

use url::Url;

pub const API_URL_ENV: &str = "CABINET_API_URL";
pub const PAYMENT_URL_ENV: &str = "CABINET_PAYMENT_URL";
pub const HTTP_TIMEOUT_ENV: &str = "CABINET_HTTP_TIMEOUT_SECS";
pub const POLL_INTERVAL_ENV: &str = "CABINET_POLL_INTERVAL_SECS";
pub const POLL_MAX_ATTEMPTS_ENV: &str = "CABINET_POLL_MAX_ATTEMPTS";
pub const RESEND_COOLDOWN_ENV: &str = "CABINET_RESEND_COOLDOWN_SECS";
pub const SESSION_FILE_ENV: &str = "CABINET_SESSION_FILE";

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_PAYMENT_URL: &str = "https://pay.localhost/invoice";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
/// Balance is re-read this often while the top-up modal is open.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(6);
/// About ten minutes at the default interval.
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 100;
pub const DEFAULT_RESEND_COOLDOWN: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub payment_url: Url,
    pub http_timeout: Duration,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
    pub resend_cooldown: Duration,
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = parse_url(API_URL_ENV, &env_or_default(API_URL_ENV, DEFAULT_API_URL))?;
        let payment_url = parse_url(
            PAYMENT_URL_ENV,
            &env_or_default(PAYMENT_URL_ENV, DEFAULT_PAYMENT_URL),
        )?;

        Ok(Self {
            api_url,
            payment_url,
            http_timeout: Duration::from_secs(env_number(
                HTTP_TIMEOUT_ENV,
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
            poll_interval: Duration::from_secs(env_number(
                POLL_INTERVAL_ENV,
                DEFAULT_POLL_INTERVAL.as_secs(),
            )),
            poll_max_attempts: env_number(POLL_MAX_ATTEMPTS_ENV, DEFAULT_POLL_MAX_ATTEMPTS),
            resend_cooldown: Duration::from_secs(env_number(
                RESEND_COOLDOWN_ENV,
                DEFAULT_RESEND_COOLDOWN.as_secs(),
            )),
            session_file: env_optional(SESSION_FILE_ENV).map(PathBuf::from),
        })
    }

    /// Configuration pointing at `api_url` with every other value defaulted.
    ///
    /// Locally built payment links use the API URL as their base.
    pub fn for_api(api_url: Url) -> Self {
        Self {
            payment_url: api_url.clone(),
            api_url,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            resend_cooldown: DEFAULT_RESEND_COOLDOWN,
            session_file: None,
        }
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })
}

fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}

fn env_number<T: std::str::FromStr>(name: &str, default: T) -> T {
    env_optional(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Flows
//!
//! Client-side state machines for getting a session token:
//!
//! - [`login::LoginFlow`] - credentials, then an optional one-time code
//! - [`registration`] - sign-up form and the phone/email verification it
//!   starts ([`verification::VerificationFlow`])
//! - [`password_reset::PasswordReset`] - request code, verify, set password
//!
//! Each flow keeps its own inline error message. A successful flow stores
//! the token in the [`SessionStore`](crate::session::SessionStore) and loads
//! the current user.

pub mod countdown;
pub mod login;
pub mod otp;
pub mod password_reset;
pub mod registration;
pub mod verification;

pub use countdown::Countdown;
pub use login::{LoginFlow, LoginProgress, LoginStep};
pub use otp::{can_submit_otp, validate_otp, OTP_LENGTH};
pub use password_reset::{PasswordReset, ResetStep};
pub use registration::{register, RegistrationForm};
pub use verification::VerificationFlow;

use tracing::{info, warn};

use crate::{api::ApiClient, error::ApiError, models::User};

/// Store `token` and load the user it belongs to. If the user cannot be
/// loaded the session is cleared again.
pub(crate) async fn complete_sign_in(client: &ApiClient, token: String) -> Result<User, ApiError> {
    let session = client.session();
    session.set_token(token);

    match client.current_user().await {
        Ok(user) => {
            info!(user_id = user.id, account_type = %user.account_type, "signed in");
            session.set_user(user.clone());
            Ok(user)
        }
        Err(error) => {
            session.clear();
            Err(error)
        }
    }
}

/// Sign out. The local session is cleared even if the server call fails.
pub async fn logout(client: &ApiClient) {
    if let Err(error) = client.logout().await {
        warn!(error = %error, "server-side logout failed");
    }
    client.session().clear();
}

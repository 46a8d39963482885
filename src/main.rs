// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `cabinet` - print the signed-in user and balances for a persisted session.

use std::process::ExitCode;

use cabinet_client::{
    error::{describe, or_placeholder},
    logging, ApiClient, ClientConfig, SessionStore,
};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let session = match &config.session_file {
        Some(path) => match SessionStore::with_persistence(path) {
            Ok(session) => session,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to open session file");
                return ExitCode::FAILURE;
            }
        },
        None => SessionStore::new(),
    };

    if !session.is_authenticated() {
        eprintln!("Not signed in. Set CABINET_SESSION_FILE to a file holding a session token.");
        return ExitCode::FAILURE;
    }

    let client = match ApiClient::new(&config, session) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build API client");
            return ExitCode::FAILURE;
        }
    };

    let (user, balances) = tokio::join!(client.current_user(), client.balances());
    let user = match user {
        Ok(user) => user,
        Err(e) => {
            eprintln!("{}", describe(&e));
            return ExitCode::FAILURE;
        }
    };

    println!("User #{}: {}", user.id, user.display_name());
    println!("  Phone:   {}", or_placeholder(user.phone.as_deref()));
    println!("  Email:   {}", or_placeholder(user.email.as_deref()));
    println!("  Account: {}", user.account_type);
    println!(
        "  Tariff:  {}",
        user.tariff
            .map(|t| t.to_string())
            .unwrap_or_else(|| or_placeholder(None).to_string())
    );

    match balances {
        Ok(balances) if balances.is_empty() => println!("No balances"),
        Ok(balances) => {
            println!("Balances:");
            for balance in balances {
                println!("  {:>8} {}", balance.currency, balance.amount);
            }
        }
        Err(e) => println!("Balances unavailable: {}", describe(&e)),
    }

    ExitCode::SUCCESS
}

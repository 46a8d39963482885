// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process mock backend for integration tests.
//!
//! Each test builds an axum `Router` with the endpoints it needs (paths
//! relative to `/api`), then [`serve`] binds it to `127.0.0.1:0` and records
//! every request as `"METHOD /api/path"`.

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use cabinet_client::{ApiClient, ClientConfig, SessionStore};
use serde_json::{json, Value};
use url::Url;

#[derive(Clone, Default)]
pub struct Hits(Arc<Mutex<Vec<String>>>);

impl Hits {
    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }

    pub fn total(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

async fn record(State(hits): State<Hits>, request: Request, next: Next) -> Response {
    hits.0
        .lock()
        .unwrap()
        .push(format!("{} {}", request.method(), request.uri().path()));
    next.run(request).await
}

pub struct MockBackend {
    pub base_url: Url,
    pub hits: Hits,
}

impl MockBackend {
    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::for_api(self.base_url.clone());
        config.http_timeout = Duration::from_secs(5);
        config.payment_url = Url::parse("https://pay.test/invoice").unwrap();
        config
    }

    /// Client without a session token.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config(), SessionStore::new()).unwrap()
    }

    /// Client with a token already in the session.
    pub fn signed_in_client(&self) -> ApiClient {
        let session = SessionStore::new();
        session.set_token("test-token");
        ApiClient::new(&self.config(), session).unwrap()
    }
}

pub async fn serve(api: Router) -> MockBackend {
    let hits = Hits::default();
    let app = Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(hits.clone(), record));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: Url::parse(&format!("http://{addr}/api")).unwrap(),
        hits,
    }
}

/// `{ "success": true, "data": data }`
pub fn ok(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

/// Error response with the backend's message.
pub fn fail(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "data": null, "message": message })),
    )
        .into_response()
}

pub fn user_json(id: u64, account_type: &str) -> Value {
    json!({
        "id": id,
        "phone": "+79991234567",
        "email": "anna@example.com",
        "profile": { "first_name": "Anna", "last_name": "Ivanova" },
        "tariff": "standard",
        "account_type": account_type,
        "status": "active"
    })
}

pub fn balance_json(currency: &str, amount: &str) -> Value {
    json!({ "currency": currency, "currency_id": 1, "amount": amount })
}

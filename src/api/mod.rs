// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # REST API Client
//!
//! [`ApiClient`] wraps a `reqwest::Client` and the [`SessionStore`]. Each
//! backend endpoint has one thin wrapper method, grouped by area in the
//! submodules. Every response is an envelope:
//!
//! ```text
//! { "success": true, "data": { ... }, "message": null }
//! ```
//!
//! A non-2xx status or `success = false` becomes [`ApiError::Api`] (or
//! [`ApiError::Unauthorized`] for 401) carrying the backend's message.

use reqwest::{multipart::Form, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::{
    config::ClientConfig,
    error::{parse_error_body, ApiError, GENERIC_ERROR_MESSAGE},
    session::SessionStore,
};

pub mod admin;
pub mod auth;
pub mod documents;
pub mod kyc;
pub mod payments;
pub mod user;

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

/// Whether a request must carry the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Authenticated,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.api_url.clone(),
            http,
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    fn authorize(&self, builder: RequestBuilder, access: Access) -> Result<RequestBuilder, ApiError> {
        match (self.session.token(), access) {
            (Some(token), _) => Ok(builder.bearer_auth(token)),
            (None, Access::Public) => Ok(builder),
            (None, Access::Authenticated) => Err(ApiError::NotAuthenticated),
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authorize(self.http.get(self.url(path)), Access::Authenticated)?;
        let data = self.send("GET", path, request).await?;
        decode(path, data)
    }

    pub(crate) async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.authorize(
            self.http.get(self.url(path)).query(query),
            Access::Authenticated,
        )?;
        let data = self.send("GET", path, request).await?;
        decode(path, data)
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.authorize(self.http.post(self.url(path)).json(body), Access::Authenticated)?;
        let data = self.send("POST", path, request).await?;
        decode(path, data)
    }

    /// POST that does not require a session (sign-in, registration, reset).
    pub(crate) async fn post_public<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.authorize(self.http.post(self.url(path)).json(body), Access::Public)?;
        let data = self.send("POST", path, request).await?;
        decode(path, data)
    }

    /// POST carrying a fresh `Idempotency-Key`, for calls that move money.
    pub(crate) async fn post_idempotent<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let idempotency_key = Uuid::new_v4().to_string();
        let request = self.authorize(
            self.http
                .post(self.url(path))
                .header(IDEMPOTENCY_KEY_HEADER, &idempotency_key)
                .json(body),
            Access::Authenticated,
        )?;
        debug!(path = %path, idempotency_key = %idempotency_key, "idempotent POST");
        let data = self.send("POST", path, request).await?;
        decode(path, data)
    }

    /// POST whose `data` is irrelevant; only success matters.
    pub(crate) async fn post_ack<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.authorize(self.http.post(self.url(path)).json(body), Access::Authenticated)?;
        self.send("POST", path, request).await.map(|_| ())
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let request = self.authorize(
            self.http.post(self.url(path)).multipart(form),
            Access::Authenticated,
        )?;
        let data = self.send("POST", path, request).await?;
        decode(path, data)
    }

    /// Raw body download (documents). Not wrapped in an envelope.
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let request = self.authorize(self.http.get(self.url(path)), Access::Authenticated)?;
        let response = request.send().await.map_err(|e| {
            warn!(path = %path, error = %e, "GET request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn send(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(method, path = %path, error = %e, "request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;
        debug!(method, path = %path, status = status.as_u16(), "API response");

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        let envelope: Envelope = serde_json::from_str(&body)
            .map_err(|e| ApiError::unexpected(format!("{method} {path}: {e}")))?;

        if !envelope.success {
            let message = envelope
                .message
                .filter(|m| !m.trim().is_empty())
                .or_else(|| parse_error_body(&body))
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(envelope.data)
    }
}

fn decode<T: DeserializeOwned>(path: &str, data: Value) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(|e| ApiError::unexpected(format!("{path}: {e}")))
}

/// Query string for server-paginated lists.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageQuery {
    pub page: usize,
    pub per_page: usize,
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Balance Top-Up
//!
//! [`TopUp::create`] snapshots the current balance, asks the backend for a
//! payment intent and opens the top-up modal (the session's `top_up_open`
//! flag). [`PaymentWatcher`] then polls balances until the watched currency
//! rises above the snapshot.
//!
//! ## Watcher loop
//!
//! Every `poll_interval` the watcher fetches `GET /user/balances` and
//! compares. It stops with:
//! - [`PaymentStatus::Paid`] when the amount exceeds the snapshot,
//! - [`PaymentStatus::Expired`] after `max_attempts` polls,
//! - [`PaymentStatus::Cancelled`] when the modal closes or the
//!   cancellation token fires.
//!
//! Failed polls are logged and count as an attempt.

use std::{str::FromStr, time::Duration};

use base64ct::{Base64, Encoding};
use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::amount_in;
use crate::{
    api::{
        payments::{CreatePaymentRequest, PaymentIntent},
        ApiClient,
    },
    error::ApiError,
};

/// Parse a user-typed top-up amount: positive, at most two decimals.
/// A comma is accepted as the decimal separator.
pub fn parse_amount(raw: &str) -> Result<Decimal, ApiError> {
    let invalid = || ApiError::validation("Enter a valid positive amount");
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(invalid());
    }

    let (whole, fraction) = normalized
        .split_once('.')
        .unwrap_or((normalized.as_str(), ""));
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if fraction.len() > 2 {
        return Err(ApiError::validation(
            "Amount must have at most 2 decimal places",
        ));
    }

    let amount = Decimal::from_str(&normalized).map_err(|_| invalid())?;
    if amount <= Decimal::ZERO {
        return Err(invalid());
    }
    Ok(amount)
}

/// What the renderer shows as the QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrSource {
    /// PNG bytes rendered by the payment provider.
    Image(Vec<u8>),
    /// Payment link to be encoded as a QR code.
    Payload(String),
}

#[derive(Debug, Clone)]
pub struct TopUp {
    intent: PaymentIntent,
    snapshot: Decimal,
    payment_url: String,
    qr: QrSource,
}

impl TopUp {
    /// Validate the amount, snapshot the balance, create the payment and
    /// open the modal.
    pub async fn create(
        client: &ApiClient,
        payment_base_url: &Url,
        currency: &str,
        amount: &str,
    ) -> Result<Self, ApiError> {
        let currency = currency.trim().to_ascii_uppercase();
        if currency.is_empty() {
            return Err(ApiError::validation("Choose a currency"));
        }
        let amount = parse_amount(amount)?;

        let snapshot = amount_in(&client.balances().await?, &currency);
        let intent = client
            .create_payment(&CreatePaymentRequest {
                currency: currency.clone(),
                amount,
            })
            .await?;

        let payment_url = intent
            .payment_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| build_payment_url(payment_base_url, &intent));
        let qr = qr_source(&intent, &payment_url);

        info!(
            payment_id = %intent.id,
            currency = %currency,
            amount = %amount,
            snapshot = %snapshot,
            "top-up payment created"
        );
        client.session().set_top_up_open(true);

        Ok(Self {
            intent,
            snapshot,
            payment_url,
            qr,
        })
    }

    pub fn intent(&self) -> &PaymentIntent {
        &self.intent
    }

    /// Balance of the currency before the payment was created.
    pub fn snapshot(&self) -> Decimal {
        self.snapshot
    }

    pub fn payment_url(&self) -> &str {
        &self.payment_url
    }

    pub fn qr(&self) -> &QrSource {
        &self.qr
    }

    /// Watcher for this payment. Spawn its [`PaymentWatcher::run`].
    pub fn watcher(
        &self,
        client: &ApiClient,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> PaymentWatcher {
        PaymentWatcher::new(
            client.clone(),
            &self.intent.currency,
            self.snapshot,
            poll_interval,
            max_attempts,
        )
    }

    /// Close the modal. A running watcher stops with `Cancelled`.
    pub fn close(&self, client: &ApiClient) {
        client.session().set_top_up_open(false);
    }
}

/// `<base>?invoice=<id>&amount=<amount>&currency=<code>`
fn build_payment_url(base: &Url, intent: &PaymentIntent) -> String {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("invoice", &intent.id)
        .append_pair("amount", &intent.amount.to_string())
        .append_pair("currency", &intent.currency);
    url.into()
}

fn qr_source(intent: &PaymentIntent, payment_url: &str) -> QrSource {
    let Some(encoded) = intent.qr_code.as_deref().filter(|q| !q.trim().is_empty()) else {
        return QrSource::Payload(payment_url.to_string());
    };
    let encoded = encoded
        .split_once("base64,")
        .map_or(encoded, |(_, data)| data)
        .trim();
    match Base64::decode_vec(encoded) {
        Ok(bytes) => QrSource::Image(bytes),
        Err(e) => {
            warn!(payment_id = %intent.id, error = %e, "QR image is not valid base64, using payment link");
            QrSource::Payload(payment_url.to_string())
        }
    }
}

// =============================================================================
// Payment watcher
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Expired,
    Cancelled,
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

pub struct PaymentWatcher {
    client: ApiClient,
    currency: String,
    snapshot: Decimal,
    poll_interval: Duration,
    max_attempts: u32,
    status: watch::Sender<PaymentStatus>,
}

impl PaymentWatcher {
    pub fn new(
        client: ApiClient,
        currency: &str,
        snapshot: Decimal,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Self {
        Self {
            client,
            currency: currency.to_string(),
            snapshot,
            poll_interval,
            max_attempts,
            status: watch::Sender::new(PaymentStatus::Pending),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PaymentStatus> {
        self.status.subscribe()
    }

    /// Poll until paid, expired or cancelled.
    ///
    /// ```rust,ignore
    /// let status = watcher.subscribe();
    /// tokio::spawn(watcher.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) -> PaymentStatus {
        debug!(
            currency = %self.currency,
            snapshot = %self.snapshot,
            interval_ms = self.poll_interval.as_millis() as u64,
            max_attempts = self.max_attempts,
            "payment watcher starting"
        );
        let mut modal = self.client.session().subscribe_top_up();
        let mut attempts = 0;

        let outcome = loop {
            if shutdown.is_cancelled() || !*modal.borrow_and_update() {
                break PaymentStatus::Cancelled;
            }
            if attempts >= self.max_attempts {
                break PaymentStatus::Expired;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {},
                _ = shutdown.cancelled() => break PaymentStatus::Cancelled,
                _ = modal.wait_for(|open| !*open) => break PaymentStatus::Cancelled,
            }

            attempts += 1;
            if self.poll_step(attempts).await {
                break PaymentStatus::Paid;
            }
        };

        info!(currency = %self.currency, attempts, status = ?outcome, "payment watcher stopped");
        self.status.send_replace(outcome);
        outcome
    }

    /// One balance check. True once the balance rose above the snapshot.
    async fn poll_step(&self, attempt: u32) -> bool {
        match self.client.balances().await {
            Ok(balances) => {
                let current = amount_in(&balances, &self.currency);
                debug!(attempt, current = %current, snapshot = %self.snapshot, "payment poll");
                current > self.snapshot
            }
            Err(e) => {
                warn!(attempt, error = %e, "payment poll failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ClientConfig, session::SessionStore};

    fn intent(payment_url: Option<&str>, qr_code: Option<&str>) -> PaymentIntent {
        PaymentIntent {
            id: "inv-17".into(),
            amount: Decimal::new(2550, 2),
            currency: "USD".into(),
            payment_url: payment_url.map(str::to_string),
            qr_code: qr_code.map(str::to_string),
            expires_at: None,
        }
    }

    fn offline_client() -> ApiClient {
        let config = ClientConfig::for_api(Url::parse("http://127.0.0.1:1/api").unwrap());
        ApiClient::new(&config, SessionStore::new()).unwrap()
    }

    #[test]
    fn amount_rules() {
        assert_eq!(parse_amount("100").unwrap(), Decimal::new(100, 0));
        assert_eq!(parse_amount(" 12,5 ").unwrap(), Decimal::new(125, 1));
        assert_eq!(parse_amount("0.01").unwrap(), Decimal::new(1, 2));
        for bad in ["", "0", "0.00", "-5", "1.234", "1.2.3", ".5", "abc", "1e3"] {
            assert!(parse_amount(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn local_payment_url_has_invoice_amount_currency() {
        let base = Url::parse("https://pay.example.com/invoice").unwrap();
        assert_eq!(
            build_payment_url(&base, &intent(None, None)),
            "https://pay.example.com/invoice?invoice=inv-17&amount=25.50&currency=USD"
        );
    }

    #[test]
    fn qr_prefers_provider_image() {
        let png = Base64::encode_string(&[0x89, b'P', b'N', b'G']);
        let data_uri = format!("data:image/png;base64,{png}");
        assert_eq!(
            qr_source(&intent(None, Some(&data_uri)), "https://x"),
            QrSource::Image(vec![0x89, b'P', b'N', b'G'])
        );
        assert_eq!(
            qr_source(&intent(None, Some("%%%")), "https://x"),
            QrSource::Payload("https://x".into())
        );
        assert_eq!(
            qr_source(&intent(None, None), "https://x"),
            QrSource::Payload("https://x".into())
        );
    }

    #[tokio::test]
    async fn invalid_amount_never_reaches_network() {
        let client = offline_client();
        let base = Url::parse("https://pay.example.com").unwrap();
        let err = TopUp::create(&client, &base, "USD", "1.999").await.unwrap_err();
        assert!(err.is_validation());
        assert!(!client.session().top_up_open());
    }

    #[tokio::test]
    async fn closed_modal_cancels_immediately() {
        let client = offline_client();
        let watcher = PaymentWatcher::new(
            client,
            "USD",
            Decimal::ZERO,
            Duration::from_secs(3600),
            10,
        );
        let status = watcher.subscribe();
        let outcome = watcher.run(CancellationToken::new()).await;
        assert_eq!(outcome, PaymentStatus::Cancelled);
        assert_eq!(*status.borrow(), PaymentStatus::Cancelled);
    }

    #[tokio::test]
    async fn zero_attempts_expires() {
        let client = offline_client();
        client.session().set_top_up_open(true);
        let watcher =
            PaymentWatcher::new(client, "USD", Decimal::ZERO, Duration::from_secs(3600), 0);
        assert_eq!(
            watcher.run(CancellationToken::new()).await,
            PaymentStatus::Expired
        );
    }

    #[tokio::test]
    async fn cancellation_token_stops_sleeping_watcher() {
        let client = offline_client();
        client.session().set_top_up_open(true);
        let watcher =
            PaymentWatcher::new(client, "USD", Decimal::ZERO, Duration::from_secs(3600), 10);
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(watcher.run(shutdown.clone()));
        shutdown.cancel();
        assert_eq!(handle.await.unwrap(), PaymentStatus::Cancelled);
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Document list and the signing queue against a mock backend.

mod common;

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cabinet_client::documents::{DocumentList, SignFlow, SignProgress};
use common::{fail, ok, serve, MockBackend};
use serde_json::{json, Value};

const CODE: &str = "123456";

fn document(id: u64, signed: bool) -> Value {
    json!({
        "id": id,
        "name": format!("Agreement {id}"),
        "created_at": "2026-03-01T10:00:00Z",
        "signed_at": if signed { json!("2026-03-02T10:00:00Z") } else { Value::Null }
    })
}

async fn initiate(Path(id): Path<u64>) -> Response {
    if id == 99 {
        return fail(StatusCode::SERVICE_UNAVAILABLE, "SMS gateway unavailable");
    }
    ok(json!({ "code_id": format!("sign-{id}") })).into_response()
}

async fn sign(Path(id): Path<u64>, Json(body): Json<Value>) -> Response {
    if body["code_id"] != format!("sign-{id}") {
        return fail(StatusCode::BAD_REQUEST, "Unknown code");
    }
    if body["code"] != CODE {
        return fail(StatusCode::BAD_REQUEST, "Wrong code");
    }
    ok(document(id, true)).into_response()
}

async fn backend() -> MockBackend {
    let router = Router::new()
        .route(
            "/documents",
            get(|| async {
                ok(json!([
                    document(1, false),
                    document(2, true),
                    document(3, false),
                    document(4, false)
                ]))
            }),
        )
        .route(
            "/documents/{id}/download",
            get(|Path(id): Path<u64>| async move { format!("%PDF-{id}") }),
        )
        .route("/documents/{id}/sign/initiate", post(initiate))
        .route("/documents/{id}/sign", post(sign));
    serve(router).await
}

#[tokio::test]
async fn confirming_a_queued_document_starts_the_next_one() {
    let backend = backend().await;
    let client = backend.signed_in_client();
    let mut list = DocumentList::new();
    list.load(&client).await.unwrap();
    let pending: Vec<u64> = list.pending().map(|d| d.id).collect();
    assert_eq!(pending, vec![1, 3, 4]);

    let mut flow = SignFlow::new(client, Duration::from_secs(60));
    let progress = flow.sign_all_pending(list.documents()).await.unwrap();
    assert_eq!(progress, SignProgress::Next { document_id: 1 });
    assert_eq!(flow.queued(), vec![3, 4]);

    let progress = flow.confirm(CODE).await.unwrap();
    assert_eq!(progress, SignProgress::Next { document_id: 3 });
    assert_eq!(flow.current_document(), Some(3));
    assert_eq!(backend.hits.count("POST /api/documents/3/sign/initiate"), 1);
    assert!(flow.is_open());

    flow.confirm(CODE).await.unwrap();
    let SignProgress::Finished { signed } = flow.confirm(CODE).await.unwrap() else {
        panic!("queue should be exhausted");
    };
    let ids: Vec<u64> = signed.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
    assert!(!flow.is_open());

    list.mark_signed(&signed);
    assert!(!list.has_pending());
}

#[tokio::test]
async fn wrong_code_keeps_the_current_document() {
    let backend = backend().await;
    let mut flow = SignFlow::new(backend.signed_in_client(), Duration::from_secs(60));
    flow.sign_one(4).await.unwrap();

    assert!(flow.confirm("12").await.unwrap_err().is_validation());
    assert_eq!(backend.hits.count("POST /api/documents/4/sign"), 0);

    let err = flow.confirm("000000").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(flow.error(), Some("Wrong code"));
    assert_eq!(flow.current_document(), Some(4));

    let progress = flow.confirm(CODE).await.unwrap();
    assert!(matches!(progress, SignProgress::Finished { ref signed } if signed.len() == 1));
    assert!(flow.error().is_none());
}

#[tokio::test]
async fn failed_code_request_can_be_resumed() {
    let backend = backend().await;
    let mut flow = SignFlow::new(backend.signed_in_client(), Duration::from_secs(60));

    let err = flow.sign_one(99).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(flow.current_document(), Some(99));
    assert!(flow.confirm(CODE).await.unwrap_err().is_validation());

    assert!(flow.resume().await.is_err());
    assert_eq!(backend.hits.count("POST /api/documents/99/sign/initiate"), 2);

    flow.cancel();
    assert!(!flow.is_open());
}

#[tokio::test]
async fn failed_resend_keeps_the_code_already_sent() {
    let requests = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route(
            "/documents/{id}/sign/initiate",
            post(
                |State(requests): State<Arc<AtomicUsize>>, Path(id): Path<u64>| async move {
                    if requests.fetch_add(1, Ordering::SeqCst) > 0 {
                        return fail(StatusCode::SERVICE_UNAVAILABLE, "SMS gateway unavailable");
                    }
                    ok(json!({ "code_id": format!("sign-{id}") })).into_response()
                },
            ),
        )
        .route("/documents/{id}/sign", post(sign))
        .with_state(requests);
    let backend = serve(router).await;
    let mut flow = SignFlow::new(backend.signed_in_client(), Duration::ZERO);

    flow.sign_one(5).await.unwrap();
    let err = flow.resend().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(flow.error(), Some("SMS gateway unavailable"));
    assert_eq!(flow.current_document(), Some(5));

    let progress = flow.confirm(CODE).await.unwrap();
    assert!(matches!(progress, SignProgress::Finished { ref signed } if signed[0].id == 5));
    assert_eq!(backend.hits.count("POST /api/documents/5/sign/initiate"), 2);
}

#[tokio::test]
async fn download_returns_raw_bytes() {
    let backend = backend().await;
    let client = backend.signed_in_client();
    let list = DocumentList::new();

    let bytes = list.download(&client, 3).await.unwrap();
    assert_eq!(bytes, b"%PDF-3");
}

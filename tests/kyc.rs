// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! KYC submission, attachment upload and passport OCR against a mock
//! backend.

mod common;

use axum::{
    extract::{Multipart, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use cabinet_client::{
    api::kyc::{Attachment, AttachmentKind, KycStatus},
    kyc::{
        prefill_from_passport, BasicIndividualForm, IdentityForm, IndividualBasicDraft,
        KycWizard, WizardProgress, SUBMIT_FAILED_MESSAGE,
    },
};
use common::{fail, ok, serve};
use serde_json::{json, Value};

fn basic_form() -> BasicIndividualForm {
    BasicIndividualForm {
        first_name: "Anna".into(),
        last_name: "Ivanova".into(),
        birth_date: "1990-05-17".into(),
        citizenship: "ru".into(),
        consent_personal_data: true,
    }
}

fn attachment(kind: AttachmentKind, file_name: &str) -> Attachment {
    Attachment {
        kind,
        file_name: file_name.into(),
        content_type: "image/png".into(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

async fn submit_basic(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["citizenship"], "RU");
    assert_eq!(body["birth_date"], "1990-05-17");
    ok(json!({ "submission_id": 5, "status": "pending" }))
}

/// Selfies are rejected; every other attachment is accepted.
async fn upload(Path(id): Path<u64>, mut multipart: Multipart) -> Response {
    assert_eq!(id, 5);
    let mut kind = String::new();
    let mut size = 0;
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("kind") => kind = field.text().await.unwrap(),
            Some("file") => size = field.bytes().await.unwrap().len(),
            _ => {}
        }
    }
    if kind == "selfie" || size == 0 {
        return fail(StatusCode::UNPROCESSABLE_ENTITY, "Image is unreadable");
    }
    ok(Value::Null).into_response()
}

#[tokio::test]
async fn failed_attachment_does_not_fail_submission() {
    let router = Router::new()
        .route("/kyc/individual/basic", post(submit_basic))
        .route("/kyc/{id}/attachments", post(upload));
    let backend = serve(router).await;
    let client = backend.signed_in_client();

    let mut wizard = KycWizard::<IndividualBasicDraft>::new();
    assert_eq!(wizard.advance(basic_form()).unwrap(), WizardProgress::ReadyToSubmit);
    wizard.attach(attachment(AttachmentKind::PassportMain, "passport.png"));
    wizard.attach(attachment(AttachmentKind::Selfie, "selfie.png"));
    wizard.attach(attachment(AttachmentKind::ProofOfAddress, "bill.png"));

    let submission = wizard.submit(&client).await.unwrap();
    assert_eq!(submission.receipt.submission_id, 5);
    assert_eq!(submission.receipt.status, KycStatus::Pending);
    assert_eq!(submission.uploaded, 2);
    assert_eq!(submission.failed_uploads, vec!["selfie.png".to_string()]);
    assert_eq!(backend.hits.count("POST /api/kyc/5/attachments"), 3);

    // Submitted drafts are discarded.
    assert_eq!(wizard.step(), 1);
    assert!(!wizard.is_complete());
    assert!(wizard.attachments().is_empty());
    assert!(wizard.error().is_none());
}

#[tokio::test]
async fn rejected_submission_keeps_the_draft() {
    let router = Router::new().route(
        "/kyc/individual/basic",
        post(|| async { fail(StatusCode::INTERNAL_SERVER_ERROR, "db timeout") }),
    );
    let backend = serve(router).await;
    let client = backend.signed_in_client();

    let mut wizard = KycWizard::<IndividualBasicDraft>::new();
    wizard.advance(basic_form()).unwrap();
    wizard.attach(attachment(AttachmentKind::PassportMain, "passport.png"));

    assert!(wizard.submit(&client).await.is_err());
    assert_eq!(wizard.error(), Some(SUBMIT_FAILED_MESSAGE));
    assert!(wizard.is_complete());
    assert_eq!(wizard.draft().first_name.as_deref(), Some("Anna"));
    assert_eq!(wizard.attachments().len(), 1);
    assert_eq!(backend.hits.total(), 1);
}

#[tokio::test]
async fn incomplete_wizard_is_not_submitted() {
    let backend = serve(Router::new().route("/kyc/individual/basic", post(submit_basic))).await;
    let mut wizard = KycWizard::<IndividualBasicDraft>::new();

    let err = wizard
        .advance(BasicIndividualForm {
            consent_personal_data: false,
            ..basic_form()
        })
        .unwrap_err();
    assert!(err.is_validation());

    assert!(wizard
        .submit(&backend.signed_in_client())
        .await
        .unwrap_err()
        .is_validation());
    assert_eq!(backend.hits.total(), 0);
}

#[tokio::test]
async fn passport_scan_prefills_identity_form() {
    let router = Router::new().route(
        "/kyc/passport/ocr",
        post(|mut multipart: Multipart| async move {
            let field = multipart.next_field().await.unwrap().unwrap();
            assert_eq!(field.name(), Some("file"));
            assert_eq!(field.file_name(), Some("scan.jpg"));
            assert_eq!(field.content_type(), Some("image/jpeg"));
            ok(json!({
                "first_name": "ANNA",
                "last_name": "IVANOVA",
                "birth_place": null,
                "number": "4510 123456"
            }))
        }),
    );
    let backend = serve(router).await;
    let mut form = IdentityForm {
        birth_place: "Kazan".into(),
        ..IdentityForm::default()
    };

    let data = prefill_from_passport(
        &backend.signed_in_client(),
        &mut form,
        "scan.jpg",
        "image/jpeg",
        vec![0xFF, 0xD8, 0xFF],
    )
    .await
    .unwrap();

    assert_eq!(data.number.as_deref(), Some("4510 123456"));
    assert_eq!(form.first_name, "ANNA");
    assert_eq!(form.last_name, "IVANOVA");
    assert_eq!(form.birth_place, "Kazan");
    assert_eq!(form.passport_number, "4510 123456");
}

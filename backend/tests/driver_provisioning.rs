//! Driver account provisioning through `POST /api/v1/drivers`.

mod support;

use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use shuttle_backend::domain::CREDENTIAL_EMAIL_SUBJECT;
use shuttle_backend::domain::ports::{AccountRepository, CredentialHasher};
use shuttle_backend::outbound::memory::OutboxState;
use shuttle_backend::test_support::password_from_email;

use support::{
    ADMIN_PASSWORD, ADMIN_USERNAME, call, error_code, init_app, login, provision_driver,
    seeded_backend,
};

#[actix_web::test]
async fn provisioned_driver_receives_working_credentials() {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let reply = call(
        &app,
        "POST",
        "/api/v1/drivers",
        Some(json!({
            "username": "jdoe",
            "email": "jdoe@umd.edu",
            "first_name": "Jane",
            "last_name": "Doe",
        })),
        Some(&admin),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["username"], "jdoe");
    assert_eq!(reply.body["roles"], json!(["Driver"]));
    assert_eq!(reply.body["is_admin"], false);
    assert!(reply.body.get("password").is_none());

    let entries = backend.outbox.entries().await;
    assert_eq!(entries.len(), 1);
    let email = &entries[0].message.email;
    assert_eq!(entries[0].state, OutboxState::Pending);
    assert_eq!(email.recipient, "jdoe@umd.edu");
    assert_eq!(email.subject, CREDENTIAL_EMAIL_SUBJECT);
    let password = password_from_email(&email.body).expect("password line");

    let stored = backend
        .accounts
        .find_login("jdoe")
        .await
        .expect("lookup")
        .expect("stored account");
    assert!(
        backend
            .hasher
            .verify(&password, &stored.password_hash)
            .await
            .expect("verify")
    );

    let driver = login(&app, "jdoe", &password).await;
    let me = call(&app, "GET", "/api/v1/users/me", None, Some(&driver)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], "jdoe@umd.edu");
}

#[actix_web::test]
async fn each_driver_gets_a_distinct_password() {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let (_, first) = provision_driver(&app, &backend, &admin, "driver1").await;
    let (_, second) = provision_driver(&app, &backend, &admin, "driver2").await;

    assert_ne!(first, second);
    assert_eq!(backend.outbox.entries().await.len(), 2);
}

#[rstest]
#[case("email", json!({ "username": "other", "email": "DRIVER1@umd.edu", "first_name": "A", "last_name": "B" }))]
#[case("username", json!({ "username": "driver1", "email": "other@umd.edu", "first_name": "A", "last_name": "B" }))]
#[actix_web::test]
async fn duplicates_leave_no_trace(#[case] field: &str, #[case] body: serde_json::Value) {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    provision_driver(&app, &backend, &admin, "driver1").await;
    let accounts_before = backend.accounts.count().await;

    let reply = call(&app, "POST", "/api/v1/drivers", Some(body), Some(&admin)).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{field}");
    assert_eq!(error_code(&reply.body), "invalid_request");
    assert_eq!(backend.accounts.count().await, accounts_before);
    assert_eq!(backend.outbox.entries().await.len(), 1);
}

#[rstest]
#[case(json!({ "email": "x@umd.edu", "first_name": "A", "last_name": "B" }))]
#[case(json!({ "username": "x", "email": "not-an-email", "first_name": "A", "last_name": "B" }))]
#[case(json!({ "username": "x", "email": "x@umd.edu", "first_name": "", "last_name": "B" }))]
#[actix_web::test]
async fn invalid_profiles_are_rejected(#[case] body: serde_json::Value) {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let reply = call(&app, "POST", "/api/v1/drivers", Some(body), Some(&admin)).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(backend.accounts.count().await, 1);
    assert!(backend.outbox.entries().await.is_empty());
}

#[actix_web::test]
async fn admin_can_edit_a_driver_profile() {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let (id, _) = provision_driver(&app, &backend, &admin, "driver1").await;

    let reply = call(
        &app,
        "PATCH",
        &format!("/api/v1/drivers/{id}"),
        Some(json!({ "first_name": "Renamed" })),
        Some(&admin),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["first_name"], "Renamed");
    assert_eq!(reply.body["username"], "driver1");
}

//! Resource access rules over the assembled HTTP surface.
//!
//! Reads are open to every caller, writes need an administrator and user
//! accounts can never be deleted.

mod support;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};
use shuttle_backend::test_support::TestBackend;

use support::{
    ADMIN_PASSWORD, ADMIN_USERNAME, call, error_code, init_app, login, provision_driver,
    request_for, seeded_backend, send,
};

#[derive(Debug, Clone, Copy)]
enum Caller {
    Anonymous,
    Driver,
}

/// Ids of the records every gate case aims at.
struct Seeded {
    stop: i64,
    shuttle: i64,
    driver: i64,
    driver_password: String,
}

/// What a refused write must leave untouched.
#[derive(Debug, PartialEq)]
struct StoreSnapshot {
    stops: Value,
    shuttles: Value,
    drivers: Value,
    outbox_len: usize,
}

async fn seed_records<S>(app: &S, backend: &TestBackend) -> Seeded
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let admin = login(app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let stop = call(
        app,
        "POST",
        "/api/v1/stops",
        Some(json!({ "name": "Stop 1", "abbr": "S1" })),
        Some(&admin),
    )
    .await;
    let shuttle = call(
        app,
        "POST",
        "/api/v1/shuttles",
        Some(json!({ "name": "Shuttle A" })),
        Some(&admin),
    )
    .await;
    let (driver, driver_password) = provision_driver(app, backend, &admin, "driver1").await;
    Seeded {
        stop: stop.body["id"].as_i64().expect("stop id"),
        shuttle: shuttle.body["id"].as_i64().expect("shuttle id"),
        driver,
        driver_password,
    }
}

async fn snapshot<S>(app: &S, backend: &TestBackend) -> StoreSnapshot
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    StoreSnapshot {
        stops: call(app, "GET", "/api/v1/stops", None, None).await.body,
        shuttles: call(app, "GET", "/api/v1/shuttles", None, None).await.body,
        drivers: call(app, "GET", "/api/v1/drivers", None, None).await.body,
        outbox_len: backend.outbox.entries().await.len(),
    }
}

async fn caller_cookie<S>(app: &S, caller: Caller, seeded: &Seeded) -> Option<Cookie<'static>>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    match caller {
        Caller::Anonymous => None,
        Caller::Driver => Some(login(app, "driver1", &seeded.driver_password).await),
    }
}

fn write_body(collection: &str) -> Value {
    match collection {
        "stops" => json!({ "name": "Renamed", "abbr": "R1" }),
        "shuttles" => json!({ "name": "Renamed" }),
        _ => json!({
            "username": "newdriver",
            "email": "newdriver@umd.edu",
            "first_name": "New",
            "last_name": "Driver",
        }),
    }
}

fn target_uri(collection: &str, on_record: bool, seeded: &Seeded) -> String {
    if !on_record {
        return format!("/api/v1/{collection}");
    }
    let id = match collection {
        "stops" => seeded.stop,
        "shuttles" => seeded.shuttle,
        _ => seeded.driver,
    };
    format!("/api/v1/{collection}/{id}")
}

#[rstest]
#[case("POST", "stops", false)]
#[case("POST", "shuttles", false)]
#[case("POST", "drivers", false)]
#[case("PUT", "stops", true)]
#[case("PATCH", "stops", true)]
#[case("PUT", "shuttles", true)]
#[case("PATCH", "shuttles", true)]
#[case("PUT", "drivers", true)]
#[case("PATCH", "drivers", true)]
#[case("DELETE", "stops", true)]
#[case("DELETE", "shuttles", true)]
#[actix_web::test]
async fn writes_are_forbidden_without_admin_rights(
    #[case] method: &str,
    #[case] collection: &str,
    #[case] on_record: bool,
    #[values(Caller::Anonymous, Caller::Driver)] caller: Caller,
) {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let seeded = seed_records(&app, &backend).await;
    let cookie = caller_cookie(&app, caller, &seeded).await;
    let uri = target_uri(collection, on_record, &seeded);
    let before = snapshot(&app, &backend).await;

    let body = (method != "DELETE").then(|| write_body(collection));
    let reply = call(&app, method, &uri, body, cookie.as_ref()).await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN, "{caller:?} {method} {uri}");
    assert_eq!(error_code(&reply.body), "forbidden");
    assert_eq!(snapshot(&app, &backend).await, before, "{caller:?} {method} {uri}");
}

#[rstest]
#[case("POST", "stops", false)]
#[case("POST", "drivers", false)]
#[case("PATCH", "shuttles", true)]
#[case("PUT", "drivers", true)]
#[actix_web::test]
async fn refused_writes_ignore_the_body(
    #[case] method: &str,
    #[case] collection: &str,
    #[case] on_record: bool,
    #[values(Caller::Anonymous, Caller::Driver)] caller: Caller,
    #[values(
        ("application/json", r#"{"name": 5, "abbr": ["S1"], "email": 42}"#),
        ("application/json", "{not json"),
        ("application/x-www-form-urlencoded", "name=Renamed&abbr=R1")
    )]
    payload: (&'static str, &'static str),
) {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let seeded = seed_records(&app, &backend).await;
    let cookie = caller_cookie(&app, caller, &seeded).await;
    let uri = target_uri(collection, on_record, &seeded);
    let before = snapshot(&app, &backend).await;

    let (content_type, body) = payload;
    let request = request_for(method, &uri)
        .insert_header(("content-type", content_type))
        .set_payload(body);
    let reply = send(&app, request, cookie.as_ref()).await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN, "{caller:?} {method} {uri} {body}");
    assert_eq!(error_code(&reply.body), "forbidden");
    assert_eq!(snapshot(&app, &backend).await, before);
}

#[rstest]
#[case("PATCH", "/api/v1/stops/not-a-number")]
#[case("DELETE", "/api/v1/shuttles/not-a-number")]
#[actix_web::test]
async fn refused_writes_ignore_the_path(#[case] method: &str, #[case] uri: &str) {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;

    let body = (method != "DELETE").then(|| json!({ "name": "Renamed" }));
    let reply = call(&app, method, uri, body, None).await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admin_sees_malformed_body_details() {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let request = request_for("POST", "/api/v1/stops")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"name": 5, "abbr": "S1"}"#);
    let reply = send(&app, request, Some(&admin)).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"]["code"], "malformed_body");
}

#[rstest]
#[case("/api/v1/stops")]
#[case("/api/v1/shuttles")]
#[case("/api/v1/drivers")]
#[actix_web::test]
async fn listings_are_open_to_anonymous_callers(#[case] uri: &str) {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;

    let reply = call(&app, "GET", uri, None, None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.is_array());
}

#[actix_web::test]
async fn admin_creates_a_stop_that_anyone_can_read() {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let created = call(
        &app,
        "POST",
        "/api/v1/stops",
        Some(json!({ "name": "Stop 1", "abbr": "S1" })),
        Some(&admin),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_i64().expect("stop id");

    let fetched = call(&app, "GET", &format!("/api/v1/stops/{id}"), None, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "Stop 1");
    assert_eq!(fetched.body["abbr"], "S1");

    let listed = call(&app, "GET", "/api/v1/stops", None, None).await;
    assert_eq!(listed.body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn admin_updates_and_deletes_a_shuttle() {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let created = call(
        &app,
        "POST",
        "/api/v1/shuttles",
        Some(json!({ "name": "Shuttle A" })),
        Some(&admin),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let uri = format!("/api/v1/shuttles/{}", created.body["id"]);

    let renamed = call(&app, "PUT", &uri, Some(json!({ "name": "Shuttle B" })), Some(&admin)).await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["name"], "Shuttle B");

    let deleted = call(&app, "DELETE", &uri, None, Some(&admin)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = call(&app, "GET", &uri, None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn user_accounts_cannot_be_deleted(
    #[values(None, Some("admin"))] as_admin: Option<&str>,
    #[values("/api/v1/drivers/1", "/api/v1/drivers/abc", "/api/v1/drivers/999")] uri: &str,
) {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let cookie = match as_admin {
        Some(username) => Some(login(&app, username, ADMIN_PASSWORD).await),
        None => None,
    };

    let reply = call(&app, "DELETE", uri, None, cookie.as_ref()).await;

    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(error_code(&reply.body), "method_not_allowed");
    assert_eq!(backend.accounts.count().await, 1);
}

#[rstest]
#[case("/api/v1/stops/999")]
#[case("/api/v1/shuttles/999")]
#[case("/api/v1/drivers/999")]
#[case("/api/v1/stops/not-a-number")]
#[actix_web::test]
async fn unknown_records_are_not_found(#[case] uri: &str) {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;

    let reply = call(&app, "GET", uri, None, None).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn stop_without_abbreviation_is_rejected() {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let reply = call(
        &app,
        "POST",
        "/api/v1/stops",
        Some(json!({ "name": "Stop 1" })),
        Some(&admin),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&reply.body), "invalid_request");
    let listed = call(&app, "GET", "/api/v1/stops", None, None).await;
    assert_eq!(listed.body.as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn duplicate_stop_abbreviation_is_rejected() {
    let backend = seeded_backend().await;
    let app = init_app(&backend).await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let stop = json!({ "name": "Stop 1", "abbr": "S1" });

    let first = call(&app, "POST", "/api/v1/stops", Some(stop.clone()), Some(&admin)).await;
    let second = call(&app, "POST", "/api/v1/stops", Some(stop), Some(&admin)).await;

    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
}

//! Shared harness for the HTTP integration suites.
//!
//! Builds the real `/api/v1` scope over a [`TestBackend`] and offers small
//! request helpers so each suite reads as a sequence of calls.

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use shuttle_backend::Trace;
use shuttle_backend::inbound::http::configure_api;
use shuttle_backend::test_support::{TestBackend, password_from_email, session_middleware};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

/// Backend with a seeded administrator.
pub async fn seeded_backend() -> TestBackend {
    let backend = TestBackend::new();
    backend
        .seed_admin(ADMIN_USERNAME, ADMIN_PASSWORD)
        .await
        .expect("seed administrator");
    backend
}

/// Initialise the API the way the server mounts it.
pub async fn init_app(
    backend: &TestBackend,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> + use<> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(backend.http_state()))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session_middleware())
                    .configure(configure_api),
            ),
    )
    .await
}

/// Outcome of one call: status plus parsed JSON body (`Null` when empty).
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub session: Option<Cookie<'static>>,
}

/// Send `method uri` with an optional JSON body and session cookie.
pub async fn call<S>(
    app: &S,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&Cookie<'static>>,
) -> Reply
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = request_for(method, uri);
    if let Some(body) = body {
        request = request.set_json(body);
    }
    send(app, request, cookie).await
}

/// Request builder for `method uri`.
pub fn request_for(method: &str, uri: &str) -> test::TestRequest {
    match method {
        "GET" => test::TestRequest::get(),
        "POST" => test::TestRequest::post(),
        "PUT" => test::TestRequest::put(),
        "PATCH" => test::TestRequest::patch(),
        "DELETE" => test::TestRequest::delete(),
        other => panic!("unsupported method {other}"),
    }
    .uri(uri)
}

/// Send a prepared request with an optional session cookie.
pub async fn send<S>(app: &S, mut request: test::TestRequest, cookie: Option<&Cookie<'static>>) -> Reply
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    if let Some(cookie) = cookie {
        request = request.cookie(cookie.clone());
    }
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let session = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply {
        status,
        body,
        session,
    }
}

/// Log in and return the session cookie.
pub async fn login<S>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let reply = call(
        app,
        "POST",
        "/api/v1/login",
        Some(json!({ "username": username, "password": password })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);
    reply.session.expect("session cookie")
}

/// Provision a driver as the administrator and return its id and the
/// password from the credential email.
pub async fn provision_driver<S>(
    app: &S,
    backend: &TestBackend,
    admin: &Cookie<'static>,
    username: &str,
) -> (i64, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let reply = call(
        app,
        "POST",
        "/api/v1/drivers",
        Some(json!({
            "username": username,
            "email": format!("{username}@umd.edu"),
            "first_name": "Test",
            "last_name": "Driver",
        })),
        Some(admin),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "provisioning failed: {}", reply.body);
    let id = reply.body["id"].as_i64().expect("driver id");
    let recipient = format!("{username}@umd.edu");
    let password = backend
        .outbox
        .entries()
        .await
        .into_iter()
        .find(|entry| entry.message.email.recipient == recipient)
        .and_then(|entry| password_from_email(&entry.message.email.body))
        .expect("credential email with password");
    (id, password)
}

/// Error code of an error envelope.
pub fn error_code(body: &Value) -> &str {
    body["code"].as_str().unwrap_or_default()
}

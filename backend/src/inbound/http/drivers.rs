//! Driver account endpoints.
//!
//! ```text
//! POST   /api/v1/drivers        {"username":"jdoe","email":"jdoe@umd.edu","first_name":"Jane","last_name":"Doe"}
//! GET    /api/v1/drivers
//! GET    /api/v1/drivers/{id}
//! PATCH  /api/v1/drivers/{id}   {"first_name":"Janet"}
//! PUT    /api/v1/drivers/{id}   (every field)
//! DELETE /api/v1/drivers/{id}   always 405
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};

use crate::domain::{AccountDraft, AccountId, Error, Operation, ResourceKind, WriteMode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::request::{admit, decode_body, parse_id};
use crate::inbound::http::schemas::{AccountResponse, DriverRequest};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Provision a driver account and queue its credential email. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/drivers",
    request_body = DriverRequest,
    responses(
        (status = 201, description = "Driver created", body = AccountResponse),
        (status = 400, description = "Invalid or duplicate fields", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 503, description = "Database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["drivers"],
    operation_id = "createDriver"
)]
#[post("/drivers")]
pub async fn create_driver(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let principal = admit(&state, &session, ResourceKind::User, Operation::Create).await?;
    let draft = AccountDraft::from(decode_body::<DriverRequest>(&req, &body)?);
    let account = state.drivers.create_driver(&principal, &draft).await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}

/// List every account.
#[utoipa::path(
    get,
    path = "/api/v1/drivers",
    responses(
        (status = 200, description = "Accounts", body = [AccountResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["drivers"],
    operation_id = "listDrivers",
    security([])
)]
#[get("/drivers")]
pub async fn list_drivers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AccountResponse>>> {
    let principal = session.principal(state.login.as_ref()).await?;
    let accounts = state.drivers.list_accounts(&principal).await?;
    Ok(web::Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/api/v1/drivers/{id}",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account", body = AccountResponse),
        (status = 404, description = "No such account", body = Error)
    ),
    tags = ["drivers"],
    operation_id = "getDriver",
    security([])
)]
#[get("/drivers/{id}")]
pub async fn get_driver(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<AccountResponse>> {
    let principal = session.principal(state.login.as_ref()).await?;
    let account = state
        .drivers
        .get_account(&principal, AccountId::new(path.into_inner()))
        .await?;
    Ok(web::Json(AccountResponse::from(account)))
}

async fn update(
    req: &HttpRequest,
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
    body: &[u8],
    mode: WriteMode,
) -> ApiResult<web::Json<AccountResponse>> {
    let principal = admit(state, session, ResourceKind::User, Operation::Update).await?;
    let id = parse_id(raw_id)?;
    let draft = AccountDraft::from(decode_body::<DriverRequest>(req, body)?);
    let account = state
        .drivers
        .update_account(&principal, AccountId::new(id), &draft, mode)
        .await?;
    Ok(web::Json(AccountResponse::from(account)))
}

/// Change some account fields. Admin only.
#[utoipa::path(
    patch,
    path = "/api/v1/drivers/{id}",
    params(("id" = i64, Path, description = "Account id")),
    request_body = DriverRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountResponse),
        (status = 400, description = "Invalid, duplicate or empty update", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "No such account", body = Error)
    ),
    tags = ["drivers"],
    operation_id = "patchDriver"
)]
#[patch("/drivers/{id}")]
pub async fn patch_driver(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<AccountResponse>> {
    update(&req, &state, &session, &path, &body, WriteMode::Merge).await
}

/// Replace every account field. Admin only.
#[utoipa::path(
    put,
    path = "/api/v1/drivers/{id}",
    params(("id" = i64, Path, description = "Account id")),
    request_body = DriverRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountResponse),
        (status = 400, description = "Missing, invalid or duplicate fields", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "No such account", body = Error)
    ),
    tags = ["drivers"],
    operation_id = "replaceDriver"
)]
#[put("/drivers/{id}")]
pub async fn put_driver(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<AccountResponse>> {
    update(&req, &state, &session, &path, &body, WriteMode::Replace).await
}

/// Accounts are never deleted through the API.
#[utoipa::path(
    delete,
    path = "/api/v1/drivers/{id}",
    params(("id" = i64, Path, description = "Account id")),
    responses((status = 405, description = "User deletion is disabled", body = Error)),
    tags = ["drivers"],
    operation_id = "deleteDriver"
)]
#[delete("/drivers/{id}")]
pub async fn delete_driver(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let principal = admit(&state, &session, ResourceKind::User, Operation::Delete).await?;
    let id = parse_id(&path)?;
    state.drivers.delete_account(&principal, AccountId::new(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

//! Stop endpoints.
//!
//! ```text
//! GET    /api/v1/stops
//! POST   /api/v1/stops        {"name":"Stop 1","abbr":"S1"}
//! GET    /api/v1/stops/{id}
//! PATCH  /api/v1/stops/{id}   {"name":"Stop One"}
//! PUT    /api/v1/stops/{id}   {"name":"Stop One","abbr":"S1"}
//! DELETE /api/v1/stops/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};

use crate::domain::{Error, Operation, ResourceKind, StopDraft, StopId, WriteMode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::request::{admit, decode_body, parse_id};
use crate::inbound::http::schemas::{StopRequest, StopResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// List every stop.
#[utoipa::path(
    get,
    path = "/api/v1/stops",
    responses(
        (status = 200, description = "Stops", body = [StopResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["stops"],
    operation_id = "listStops",
    security([])
)]
#[get("/stops")]
pub async fn list_stops(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<StopResponse>>> {
    let principal = session.principal(state.login.as_ref()).await?;
    let stops = state.stops.list_stops(&principal).await?;
    Ok(web::Json(stops.into_iter().map(StopResponse::from).collect()))
}

/// Create a stop. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/stops",
    request_body = StopRequest,
    responses(
        (status = 201, description = "Stop created", body = StopResponse),
        (status = 400, description = "Missing, invalid or duplicate fields", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error)
    ),
    tags = ["stops"],
    operation_id = "createStop"
)]
#[post("/stops")]
pub async fn create_stop(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let principal = admit(&state, &session, ResourceKind::Stop, Operation::Create).await?;
    let draft = StopDraft::from(decode_body::<StopRequest>(&req, &body)?);
    let stop = state.stops.create_stop(&principal, &draft).await?;
    Ok(HttpResponse::Created().json(StopResponse::from(stop)))
}

/// Fetch one stop.
#[utoipa::path(
    get,
    path = "/api/v1/stops/{id}",
    params(("id" = i64, Path, description = "Stop id")),
    responses(
        (status = 200, description = "Stop", body = StopResponse),
        (status = 404, description = "No such stop", body = Error)
    ),
    tags = ["stops"],
    operation_id = "getStop",
    security([])
)]
#[get("/stops/{id}")]
pub async fn get_stop(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<StopResponse>> {
    let principal = session.principal(state.login.as_ref()).await?;
    let stop = state.stops.get_stop(&principal, StopId::new(path.into_inner())).await?;
    Ok(web::Json(StopResponse::from(stop)))
}

async fn update(
    req: &HttpRequest,
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
    body: &[u8],
    mode: WriteMode,
) -> ApiResult<web::Json<StopResponse>> {
    let principal = admit(state, session, ResourceKind::Stop, Operation::Update).await?;
    let id = parse_id(raw_id)?;
    let draft = StopDraft::from(decode_body::<StopRequest>(req, body)?);
    let stop = state
        .stops
        .update_stop(&principal, StopId::new(id), &draft, mode)
        .await?;
    Ok(web::Json(StopResponse::from(stop)))
}

/// Change some stop fields. Admin only.
#[utoipa::path(
    patch,
    path = "/api/v1/stops/{id}",
    params(("id" = i64, Path, description = "Stop id")),
    request_body = StopRequest,
    responses(
        (status = 200, description = "Updated stop", body = StopResponse),
        (status = 400, description = "Invalid, duplicate or empty update", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "No such stop", body = Error)
    ),
    tags = ["stops"],
    operation_id = "patchStop"
)]
#[patch("/stops/{id}")]
pub async fn patch_stop(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<StopResponse>> {
    update(&req, &state, &session, &path, &body, WriteMode::Merge).await
}

/// Replace both stop fields. Admin only.
#[utoipa::path(
    put,
    path = "/api/v1/stops/{id}",
    params(("id" = i64, Path, description = "Stop id")),
    request_body = StopRequest,
    responses(
        (status = 200, description = "Updated stop", body = StopResponse),
        (status = 400, description = "Missing, invalid or duplicate fields", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "No such stop", body = Error)
    ),
    tags = ["stops"],
    operation_id = "replaceStop"
)]
#[put("/stops/{id}")]
pub async fn put_stop(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<StopResponse>> {
    update(&req, &state, &session, &path, &body, WriteMode::Replace).await
}

/// Delete a stop. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/stops/{id}",
    params(("id" = i64, Path, description = "Stop id")),
    responses(
        (status = 204, description = "Stop deleted"),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "No such stop", body = Error)
    ),
    tags = ["stops"],
    operation_id = "deleteStop"
)]
#[delete("/stops/{id}")]
pub async fn delete_stop(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let principal = admit(&state, &session, ResourceKind::Stop, Operation::Delete).await?;
    let id = parse_id(&path)?;
    state.stops.delete_stop(&principal, StopId::new(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

//! Shuttle endpoints.
//!
//! Same surface as stops: open reads, admin-only writes, PUT and PATCH on
//! the detail route.

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};

use crate::domain::{Error, Operation, ResourceKind, ShuttleDraft, ShuttleId, WriteMode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::request::{admit, decode_body, parse_id};
use crate::inbound::http::schemas::{ShuttleRequest, ShuttleResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// List every shuttle.
#[utoipa::path(
    get,
    path = "/api/v1/shuttles",
    responses(
        (status = 200, description = "Shuttles", body = [ShuttleResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["shuttles"],
    operation_id = "listShuttles",
    security([])
)]
#[get("/shuttles")]
pub async fn list_shuttles(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ShuttleResponse>>> {
    let principal = session.principal(state.login.as_ref()).await?;
    let shuttles = state.shuttles.list_shuttles(&principal).await?;
    Ok(web::Json(shuttles.into_iter().map(ShuttleResponse::from).collect()))
}

/// Register a shuttle. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/shuttles",
    request_body = ShuttleRequest,
    responses(
        (status = 201, description = "Shuttle created", body = ShuttleResponse),
        (status = 400, description = "Missing, invalid or duplicate name", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error)
    ),
    tags = ["shuttles"],
    operation_id = "createShuttle"
)]
#[post("/shuttles")]
pub async fn create_shuttle(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let principal = admit(&state, &session, ResourceKind::Shuttle, Operation::Create).await?;
    let draft = ShuttleDraft::from(decode_body::<ShuttleRequest>(&req, &body)?);
    let shuttle = state.shuttles.create_shuttle(&principal, &draft).await?;
    Ok(HttpResponse::Created().json(ShuttleResponse::from(shuttle)))
}

#[utoipa::path(
    get,
    path = "/api/v1/shuttles/{id}",
    params(("id" = i64, Path, description = "Shuttle id")),
    responses(
        (status = 200, description = "Shuttle", body = ShuttleResponse),
        (status = 404, description = "No such shuttle", body = Error)
    ),
    tags = ["shuttles"],
    operation_id = "getShuttle",
    security([])
)]
#[get("/shuttles/{id}")]
pub async fn get_shuttle(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ShuttleResponse>> {
    let principal = session.principal(state.login.as_ref()).await?;
    let shuttle = state
        .shuttles
        .get_shuttle(&principal, ShuttleId::new(path.into_inner()))
        .await?;
    Ok(web::Json(ShuttleResponse::from(shuttle)))
}

async fn update(
    req: &HttpRequest,
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
    body: &[u8],
    mode: WriteMode,
) -> ApiResult<web::Json<ShuttleResponse>> {
    let principal = admit(state, session, ResourceKind::Shuttle, Operation::Update).await?;
    let id = parse_id(raw_id)?;
    let draft = ShuttleDraft::from(decode_body::<ShuttleRequest>(req, body)?);
    let shuttle = state
        .shuttles
        .update_shuttle(&principal, ShuttleId::new(id), &draft, mode)
        .await?;
    Ok(web::Json(ShuttleResponse::from(shuttle)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/shuttles/{id}",
    params(("id" = i64, Path, description = "Shuttle id")),
    request_body = ShuttleRequest,
    responses(
        (status = 200, description = "Updated shuttle", body = ShuttleResponse),
        (status = 400, description = "Invalid, duplicate or empty update", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "No such shuttle", body = Error)
    ),
    tags = ["shuttles"],
    operation_id = "patchShuttle"
)]
#[patch("/shuttles/{id}")]
pub async fn patch_shuttle(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<ShuttleResponse>> {
    update(&req, &state, &session, &path, &body, WriteMode::Merge).await
}

#[utoipa::path(
    put,
    path = "/api/v1/shuttles/{id}",
    params(("id" = i64, Path, description = "Shuttle id")),
    request_body = ShuttleRequest,
    responses(
        (status = 200, description = "Updated shuttle", body = ShuttleResponse),
        (status = 400, description = "Missing, invalid or duplicate name", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "No such shuttle", body = Error)
    ),
    tags = ["shuttles"],
    operation_id = "replaceShuttle"
)]
#[put("/shuttles/{id}")]
pub async fn put_shuttle(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<ShuttleResponse>> {
    update(&req, &state, &session, &path, &body, WriteMode::Replace).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/shuttles/{id}",
    params(("id" = i64, Path, description = "Shuttle id")),
    responses(
        (status = 204, description = "Shuttle deleted"),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "No such shuttle", body = Error)
    ),
    tags = ["shuttles"],
    operation_id = "deleteShuttle"
)]
#[delete("/shuttles/{id}")]
pub async fn delete_shuttle(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let principal = admit(&state, &session, ResourceKind::Shuttle, Operation::Delete).await?;
    let id = parse_id(&path)?;
    state.shuttles.delete_shuttle(&principal, ShuttleId::new(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Shuttle;
    use crate::inbound::http::test_utils::{PortDoubles, login_cookie, test_session_middleware};
    use crate::inbound::http::users::login;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::json;

    fn test_app(
        doubles: PortDoubles,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(doubles.into_state())
            .wrap(test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .configure(crate::inbound::http::error::extractor_config)
                    .service(login)
                    .service(list_shuttles)
                    .service(create_shuttle)
                    .service(get_shuttle)
                    .service(patch_shuttle)
                    .service(put_shuttle)
                    .service(delete_shuttle),
            )
    }

    #[rstest]
    #[case("driver", StatusCode::FORBIDDEN)]
    #[case("admin", StatusCode::CREATED)]
    #[actix_web::test]
    async fn create_status_follows_the_service(#[case] username: &str, #[case] expected: StatusCode) {
        let mut doubles = PortDoubles::default();
        doubles.shuttles.expect_create_shuttle().returning(|principal, draft| {
            if principal.is_admin() {
                Ok(Shuttle {
                    id: ShuttleId::new(1),
                    name: draft.name.clone().unwrap_or_default(),
                })
            } else {
                Err(Error::forbidden("you do not have permission to modify shuttle records"))
            }
        });
        let app = test::init_service(test_app(doubles)).await;
        let cookie = login_cookie(&app, username).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/shuttles")
                .cookie(cookie)
                .set_json(json!({ "name": "Route 104" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), expected);
    }

    #[actix_web::test]
    async fn patch_uses_merge_mode() {
        let mut doubles = PortDoubles::default();
        doubles
            .shuttles
            .expect_update_shuttle()
            .withf(|_, id, _, mode| *id == ShuttleId::new(3) && *mode == WriteMode::Merge)
            .returning(|_, id, _, _| {
                Ok(Shuttle {
                    id,
                    name: "Renamed".to_owned(),
                })
            });
        let app = test::init_service(test_app(doubles)).await;
        let cookie = login_cookie(&app, "admin").await;

        let response = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri("/api/v1/shuttles/3")
                .cookie(cookie)
                .set_json(json!({ "name": "Renamed" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: ShuttleResponse = test::read_body_json(response).await;
        assert_eq!(body.name, "Renamed");
    }

    #[actix_web::test]
    async fn driver_form_posts_are_forbidden_rather_than_malformed() {
        let mut doubles = PortDoubles::default();
        doubles.shuttles.expect_create_shuttle().never();
        let app = test::init_service(test_app(doubles)).await;
        let cookie = login_cookie(&app, "driver").await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/shuttles")
                .cookie(cookie)
                .insert_header(("content-type", "application/x-www-form-urlencoded"))
                .set_payload("name=Route+104")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

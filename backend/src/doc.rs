//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST path, the request and response bodies
//! from [`crate::inbound::http::schemas`], the shared error envelope and the
//! session cookie security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use crate::domain::{Error, ErrorCode, Role};
use crate::inbound::http::schemas::{
    AccountResponse, DriverRequest, LoginRequest, ShuttleRequest, ShuttleResponse, StopRequest,
    StopResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Shuttle backend API",
        description = "Driver account provisioning plus stop, shuttle and account management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_account,
        crate::inbound::http::drivers::create_driver,
        crate::inbound::http::drivers::list_drivers,
        crate::inbound::http::drivers::get_driver,
        crate::inbound::http::drivers::patch_driver,
        crate::inbound::http::drivers::put_driver,
        crate::inbound::http::drivers::delete_driver,
        crate::inbound::http::stops::list_stops,
        crate::inbound::http::stops::create_stop,
        crate::inbound::http::stops::get_stop,
        crate::inbound::http::stops::patch_stop,
        crate::inbound::http::stops::put_stop,
        crate::inbound::http::stops::delete_stop,
        crate::inbound::http::shuttles::list_shuttles,
        crate::inbound::http::shuttles::create_shuttle,
        crate::inbound::http::shuttles::get_shuttle,
        crate::inbound::http::shuttles::patch_shuttle,
        crate::inbound::http::shuttles::put_shuttle,
        crate::inbound::http::shuttles::delete_shuttle,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        LoginRequest,
        DriverRequest,
        AccountResponse,
        StopRequest,
        StopResponse,
        ShuttleRequest,
        ShuttleResponse,
    )),
    tags(
        (name = "session", description = "Login, logout and the current account"),
        (name = "drivers", description = "Driver account provisioning and management"),
        (name = "stops", description = "Shuttle stops"),
        (name = "shuttles", description = "Shuttle vehicles"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

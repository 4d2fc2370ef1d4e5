//! HTTP inbound adapter exposing the REST API.

pub mod drivers;
pub mod error;
pub mod health;
pub mod request;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod shuttles;
pub mod state;
pub mod stops;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint on `cfg`.
///
/// The caller supplies the scope (and its session middleware); this keeps
/// the route table in one place for the server and the integration tests.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    error::extractor_config(cfg);
    cfg.service(users::login)
        .service(users::logout)
        .service(users::current_account)
        .service(drivers::create_driver)
        .service(drivers::list_drivers)
        .service(drivers::get_driver)
        .service(drivers::patch_driver)
        .service(drivers::put_driver)
        .service(drivers::delete_driver)
        .service(stops::list_stops)
        .service(stops::create_stop)
        .service(stops::get_stop)
        .service(stops::patch_stop)
        .service(stops::put_stop)
        .service(stops::delete_stop)
        .service(shuttles::list_shuttles)
        .service(shuttles::create_shuttle)
        .service(shuttles::get_shuttle)
        .service(shuttles::patch_shuttle)
        .service(shuttles::put_shuttle)
        .service(shuttles::delete_shuttle);
}

//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};
use chrono::Utc;

use crate::domain::ports::{
    MockDriverAccounts, MockLoginService, MockShuttleFleet, MockStopCatalog,
};
use crate::domain::{AccountId, EmailAddress, PersonName, Principal, Role, UserAccount, Username};
use crate::inbound::http::schemas::LoginRequest;
use crate::inbound::http::state::HttpState;

pub use crate::test_support::session_middleware as test_session_middleware;

/// Account id the login double treats as an administrator.
pub const ADMIN_ID: AccountId = AccountId::new(1);
/// Account id the login double treats as an ordinary driver.
pub const DRIVER_ID: AccountId = AccountId::new(2);

/// Sample account with the given id, named after it.
pub fn sample_account(id: AccountId) -> UserAccount {
    let username = format!("user{id}");
    UserAccount {
        id,
        username: Username::parse(&username).expect("username"),
        email: EmailAddress::parse(&format!("{username}@umd.edu")).expect("email"),
        first_name: PersonName::parse("first_name", "Sam").expect("first name"),
        last_name: PersonName::parse("last_name", "Ple").expect("last name"),
        roles: vec![Role::Driver],
        is_admin: id == ADMIN_ID,
        is_active: true,
        created_at: Utc::now(),
    }
}

/// Login double: `admin` and `driver` authenticate with any password and
/// resolve back to [`ADMIN_ID`] and [`DRIVER_ID`].
pub fn login_double() -> MockLoginService {
    let mut login = MockLoginService::new();
    login.expect_authenticate().returning(|credentials| {
        match credentials.username() {
            "admin" => Ok(sample_account(ADMIN_ID)),
            "driver" => Ok(sample_account(DRIVER_ID)),
            _ => Err(crate::domain::Error::unauthorized("invalid credentials")),
        }
    });
    login.expect_resolve_principal().returning(|id| {
        Ok(match id {
            ADMIN_ID => Principal::Account { id, is_admin: true },
            DRIVER_ID => Principal::Account { id, is_admin: false },
            _ => Principal::Anonymous,
        })
    });
    login
}

/// Mocked driving ports; set expectations, then call [`PortDoubles::into_state`].
pub struct PortDoubles {
    pub login: MockLoginService,
    pub drivers: MockDriverAccounts,
    pub stops: MockStopCatalog,
    pub shuttles: MockShuttleFleet,
}

impl Default for PortDoubles {
    fn default() -> Self {
        Self {
            login: login_double(),
            drivers: MockDriverAccounts::new(),
            stops: MockStopCatalog::new(),
            shuttles: MockShuttleFleet::new(),
        }
    }
}

impl PortDoubles {
    /// Wrap the doubles as handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.login),
            Arc::new(self.drivers),
            Arc::new(self.stops),
            Arc::new(self.shuttles),
        ))
    }
}

/// Log in as `username` through `POST /api/v1/login` and return the cookie.
pub async fn login_cookie<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(LoginRequest {
            username: username.to_owned(),
            password: "password".to_owned(),
        })
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

//! Wire shapes for the REST API.
//!
//! Domain types stay free of serde and utoipa concerns; the request and
//! response bodies here carry those derives and convert at the edge.
//! Request bodies are all-optional so that incomplete payloads reach the
//! access gate and produce field-level `invalid_request` details rather
//! than extractor errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AccountDraft, LoginCredentials, LoginValidationError, Role, Shuttle, ShuttleDraft, Stop,
    StopDraft, UserAccount,
};

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Driver account fields accepted by create and update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct DriverRequest {
    #[schema(example = "jdoe")]
    pub username: Option<String>,
    #[schema(example = "jdoe@umd.edu")]
    pub email: Option<String>,
    #[schema(example = "Jane")]
    pub first_name: Option<String>,
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
}

impl From<DriverRequest> for AccountDraft {
    fn from(value: DriverRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
        }
    }
}

/// Public representation of an account. The password hash never leaves
/// the domain layer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    #[schema(example = 7)]
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<Role>,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserAccount> for AccountResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id.get(),
            username: account.username.as_str().to_owned(),
            email: account.email.as_str().to_owned(),
            first_name: account.first_name.as_str().to_owned(),
            last_name: account.last_name.as_str().to_owned(),
            roles: account.roles,
            is_admin: account.is_admin,
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}

/// Stop fields accepted by create and update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct StopRequest {
    #[schema(example = "Regents Drive Garage")]
    pub name: Option<String>,
    #[schema(example = "RDG")]
    pub abbr: Option<String>,
}

impl From<StopRequest> for StopDraft {
    fn from(value: StopRequest) -> Self {
        Self {
            name: value.name,
            abbr: value.abbr,
        }
    }
}

/// A shuttle stop.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StopResponse {
    pub id: i64,
    pub name: String,
    pub abbr: String,
}

impl From<Stop> for StopResponse {
    fn from(stop: Stop) -> Self {
        Self {
            id: stop.id.get(),
            name: stop.name,
            abbr: stop.abbr,
        }
    }
}

/// Shuttle fields accepted by create and update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ShuttleRequest {
    #[schema(example = "Route 104")]
    pub name: Option<String>,
}

impl From<ShuttleRequest> for ShuttleDraft {
    fn from(value: ShuttleRequest) -> Self {
        Self { name: value.name }
    }
}

/// A shuttle vehicle.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShuttleResponse {
    pub id: i64,
    pub name: String,
}

impl From<Shuttle> for ShuttleResponse {
    fn from(shuttle: Shuttle) -> Self {
        Self {
            id: shuttle.id.get(),
            name: shuttle.name,
        }
    }
}

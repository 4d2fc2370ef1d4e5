//! Mapping of driven-port failures onto [`Error`].
//!
//! Connection failures become `service_unavailable`, unique-constraint
//! clashes become field-level `invalid_request`, and everything else is an
//! internal error whose detail is logged but redacted from responses.

use tracing::error;

use super::Error;
use super::ports::{
    AccountRepositoryError, CredentialHasherError, ShuttleRepositoryError, StopRepositoryError,
};
use super::validation::FieldViolation;

pub(crate) fn map_account_repository_error(err: AccountRepositoryError) -> Error {
    match err {
        AccountRepositoryError::Connection { message } => unavailable("account", &message),
        AccountRepositoryError::Query { message } => internal("account", &message),
        AccountRepositoryError::Duplicate { field } => FieldViolation::duplicate(field).into(),
    }
}

pub(crate) fn map_stop_repository_error(err: StopRepositoryError) -> Error {
    match err {
        StopRepositoryError::Connection { message } => unavailable("stop", &message),
        StopRepositoryError::Query { message } => internal("stop", &message),
        StopRepositoryError::Duplicate { field } => FieldViolation::duplicate(field).into(),
    }
}

pub(crate) fn map_shuttle_repository_error(err: ShuttleRepositoryError) -> Error {
    match err {
        ShuttleRepositoryError::Connection { message } => unavailable("shuttle", &message),
        ShuttleRepositoryError::Query { message } => internal("shuttle", &message),
        ShuttleRepositoryError::Duplicate { field } => FieldViolation::duplicate(field).into(),
    }
}

pub(crate) fn map_hasher_error(err: &CredentialHasherError) -> Error {
    error!(error = %err, "credential hashing failed");
    Error::internal(err.to_string())
}

fn unavailable(store: &str, message: &str) -> Error {
    error!(store, %message, "repository unavailable");
    Error::service_unavailable(format!("{store} repository unavailable"))
}

fn internal(store: &str, message: &str) -> Error {
    error!(store, %message, "repository query failed");
    Error::internal(format!("{store} repository error: {message}"))
}

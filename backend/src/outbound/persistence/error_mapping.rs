//! Translation of Diesel and pool failures into port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// How a Diesel failure should surface through a port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// The database could not be reached.
    Connection(String),
    /// A unique constraint guarding `field` rejected the write.
    Duplicate(&'static str),
    /// Anything else.
    Query(String),
}

/// Unique constraints and the request field each one guards.
const UNIQUE_CONSTRAINTS: &[(&str, &str)] = &[
    ("accounts_username_key", "username"),
    ("accounts_email_lower_key", "email"),
    ("stops_abbr_key", "abbr"),
    ("shuttles_name_key", "name"),
];

fn field_for_constraint(constraint: Option<&str>) -> Option<&'static str> {
    let constraint = constraint?;
    UNIQUE_CONSTRAINTS
        .iter()
        .find(|(name, _)| *name == constraint)
        .map(|(_, field)| *field)
}

/// Classify a Diesel error.
pub(crate) fn classify(error: DieselError) -> StoreFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            match field_for_constraint(info.constraint_name()) {
                Some(field) => StoreFailure::Duplicate(field),
                None => StoreFailure::Query("unique constraint violated".to_owned()),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreFailure::Connection("database connection error".to_owned())
        }
        DieselError::NotFound => StoreFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => StoreFailure::Query("database query error".to_owned()),
        _ => StoreFailure::Query("database error".to_owned()),
    }
}

/// Pool failures always mean the database is unreachable.
pub(crate) fn pool_failure(error: PoolError) -> StoreFailure {
    StoreFailure::Connection(error.into_message())
}

/// Implement `From<StoreFailure>` for a port error with `connection`,
/// `query` and optionally `duplicate` constructors.
macro_rules! impl_from_store_failure {
    ($error:ty, duplicate) => {
        impl From<$crate::outbound::persistence::error_mapping::StoreFailure> for $error {
            fn from(failure: $crate::outbound::persistence::error_mapping::StoreFailure) -> Self {
                use $crate::outbound::persistence::error_mapping::StoreFailure;
                match failure {
                    StoreFailure::Connection(message) => Self::connection(message),
                    StoreFailure::Duplicate(field) => Self::duplicate(field),
                    StoreFailure::Query(message) => Self::query(message),
                }
            }
        }
    };
    ($error:ty) => {
        impl From<$crate::outbound::persistence::error_mapping::StoreFailure> for $error {
            fn from(failure: $crate::outbound::persistence::error_mapping::StoreFailure) -> Self {
                use $crate::outbound::persistence::error_mapping::StoreFailure;
                match failure {
                    StoreFailure::Connection(message) => Self::connection(message),
                    StoreFailure::Duplicate(field) => {
                        Self::query(format!("unexpected duplicate {field}"))
                    }
                    StoreFailure::Query(message) => Self::query(message),
                }
            }
        }
    };
}

pub(crate) use impl_from_store_failure;

//! Field-level validation shared by the resource services.
//!
//! Services receive loosely typed drafts (every field optional) and turn them
//! into validated value objects here. A failure names the offending field so
//! the HTTP adapter can surface `{ "field": ..., "code": ... }` details.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::json;

use super::Error;

/// Machine-readable reason attached to a [`FieldViolation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// The field is required by this write but was absent.
    Required,
    /// The field was present but empty once trimmed.
    Blank,
    /// The field exceeds its maximum length.
    TooLong,
    /// The field does not match the expected format.
    InvalidFormat,
    /// Another record already holds this value.
    Duplicate,
}

impl ViolationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Blank => "blank",
            Self::TooLong => "too_long",
            Self::InvalidFormat => "invalid_format",
            Self::Duplicate => "duplicate",
        }
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldViolation {
    field: Cow<'static, str>,
    code: ViolationCode,
    message: String,
}

impl FieldViolation {
    /// Build a violation for `field`.
    pub fn new(field: impl Into<Cow<'static, str>>, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    /// Field missing from a write that requires it.
    #[must_use]
    pub fn required(field: &'static str) -> Self {
        Self::new(field, ViolationCode::Required, "this field is required")
    }

    /// Value already held by another record.
    #[must_use]
    pub fn duplicate(field: impl Into<Cow<'static, str>>) -> Self {
        let field = field.into();
        let message = format!("a record with this {field} already exists");
        Self::new(field, ViolationCode::Duplicate, message)
    }

    /// Name of the rejected field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Reason for the rejection.
    #[must_use]
    pub fn code(&self) -> ViolationCode {
        self.code
    }
}

impl From<FieldViolation> for Error {
    fn from(value: FieldViolation) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": &*value.field,
            "code": value.code.as_str(),
        }))
    }
}

/// How a write treats absent fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Full replacement: every writable field must be present.
    Replace,
    /// Partial update: absent fields keep their stored value.
    Merge,
}

impl WriteMode {
    /// Require `value` under [`WriteMode::Replace`]; pass it through otherwise.
    pub fn demand<T>(self, field: &'static str, value: Option<T>) -> Result<Option<T>, FieldViolation> {
        match (self, value) {
            (Self::Replace, None) => Err(FieldViolation::required(field)),
            (_, value) => Ok(value),
        }
    }
}

/// Error returned when a partial update carries no fields at all.
#[must_use]
pub fn empty_update() -> Error {
    Error::invalid_request("at least one field must be supplied")
        .with_details(json!({ "code": "empty_update" }))
}

/// Trim `raw` and check it is non-blank and at most `max` characters.
pub fn bounded_text(field: &'static str, raw: &str, max: usize) -> Result<String, FieldViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldViolation::new(field, ViolationCode::Blank, "may not be blank"));
    }
    if trimmed.chars().count() > max {
        return Err(FieldViolation::new(
            field,
            ViolationCode::TooLong,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(trimmed.to_owned())
}

//! Shuttle stops.

use super::validation::{FieldViolation, WriteMode, bounded_text};

/// Maximum stop name length.
pub const STOP_NAME_MAX: usize = 100;
/// Maximum stop abbreviation length.
pub const STOP_ABBR_MAX: usize = 10;

/// Surrogate key of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(i64);

impl StopId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// A named stop with a unique short code (`abbr`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    /// Surrogate key.
    pub id: StopId,
    /// Display name.
    pub name: String,
    /// Unique abbreviation shown on signage.
    pub abbr: String,
}

/// Validated fields of a stop about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStop {
    /// Display name.
    pub name: String,
    /// Abbreviation.
    pub abbr: String,
}

/// Validated stop fields; `None` keeps the stored value on update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopFields {
    /// Display name.
    pub name: Option<String>,
    /// Abbreviation.
    pub abbr: Option<String>,
}

/// Raw stop payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopDraft {
    /// Requested name.
    pub name: Option<String>,
    /// Requested abbreviation.
    pub abbr: Option<String>,
}

impl StopDraft {
    /// Whether no field was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.abbr.is_none()
    }

    /// Validate a draft for a new stop: both fields are required.
    pub fn parse_new(&self) -> Result<NewStop, FieldViolation> {
        let name = self.name.as_deref().ok_or_else(|| FieldViolation::required("name"))?;
        let name = bounded_text("name", name, STOP_NAME_MAX)?;
        let abbr = self.abbr.as_deref().ok_or_else(|| FieldViolation::required("abbr"))?;
        let abbr = bounded_text("abbr", abbr, STOP_ABBR_MAX)?;
        Ok(NewStop { name, abbr })
    }

    /// Validate into [`StopFields`].
    pub fn parse(&self, mode: WriteMode) -> Result<StopFields, FieldViolation> {
        let name = mode
            .demand("name", self.name.as_deref())?
            .map(|raw| bounded_text("name", raw, STOP_NAME_MAX))
            .transpose()?;
        let abbr = mode
            .demand("abbr", self.abbr.as_deref())?
            .map(|raw| bounded_text("abbr", raw, STOP_ABBR_MAX))
            .transpose()?;
        Ok(StopFields { name, abbr })
    }
}

impl StopFields {
    /// Apply to a copy of `stop`.
    #[must_use]
    pub fn apply_to(&self, stop: &Stop) -> Stop {
        Stop {
            id: stop.id,
            name: self.name.clone().unwrap_or_else(|| stop.name.clone()),
            abbr: self.abbr.clone().unwrap_or_else(|| stop.abbr.clone()),
        }
    }
}

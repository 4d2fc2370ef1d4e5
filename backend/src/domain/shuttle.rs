//! Shuttle vehicles.

use super::validation::{FieldViolation, bounded_text};

/// Maximum shuttle name length.
pub const SHUTTLE_NAME_MAX: usize = 100;

/// Surrogate key of a shuttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShuttleId(i64);

impl ShuttleId {
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

/// A shuttle, identified to riders by its unique name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shuttle {
    /// Surrogate key.
    pub id: ShuttleId,
    /// Unique display name.
    pub name: String,
}

/// Raw shuttle payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShuttleDraft {
    /// Requested name.
    pub name: Option<String>,
}

impl ShuttleDraft {
    /// Whether no field was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    /// Validate the name. It is the only writable field, so every write
    /// (create, replace or a non-empty patch) requires it.
    pub fn parse_name(&self) -> Result<String, FieldViolation> {
        let raw = self.name.as_deref().ok_or_else(|| FieldViolation::required("name"))?;
        bounded_text("name", raw, SHUTTLE_NAME_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn names_are_trimmed() {
        let draft = ShuttleDraft {
            name: Some("  Route 104 ".into()),
        };
        assert_eq!(draft.parse_name(), Ok("Route 104".to_owned()));
    }

    #[rstest]
    fn replace_requires_a_name() {
        let err = ShuttleDraft::default()
            .parse_name()
            .expect_err("name required");
        assert_eq!(err.field(), "name");
    }
}

//! Resource access gate.
//!
//! A single rule covers stops, shuttles and user accounts: reads are open to
//! everyone (including anonymous callers), writes require an administrator.
//! Deleting user accounts is not offered through the API at all, so that
//! check runs first and answers the same way for every caller.

use std::fmt;

use super::{Error, Principal};

/// Resource families guarded by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Campus shuttle stops.
    Stop,
    /// Shuttle vehicles.
    Shuttle,
    /// User (driver) accounts.
    User,
}

impl ResourceKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Shuttle => "shuttle",
            Self::User => "user",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations a caller may attempt on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Enumerate the collection.
    List,
    /// Fetch one record.
    Retrieve,
    /// Insert a record.
    Create,
    /// Replace or patch a record.
    Update,
    /// Remove a record.
    Delete,
}

impl Operation {
    /// Whether the operation leaves data untouched.
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::List | Self::Retrieve)
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Proceed.
    Allow,
    /// The caller lacks the required privilege.
    Deny,
    /// The operation is never available on this resource.
    Unsupported,
}

/// Decide whether `principal` may perform `operation` on `kind`.
///
/// # Examples
/// ```
/// use shuttle_backend::domain::{AccessDecision, Operation, Principal, ResourceKind, decide};
///
/// assert_eq!(decide(&Principal::Anonymous, ResourceKind::Stop, Operation::List), AccessDecision::Allow);
/// assert_eq!(decide(&Principal::Anonymous, ResourceKind::Stop, Operation::Create), AccessDecision::Deny);
/// assert_eq!(decide(&Principal::Anonymous, ResourceKind::User, Operation::Delete), AccessDecision::Unsupported);
/// ```
#[must_use]
pub const fn decide(principal: &Principal, kind: ResourceKind, operation: Operation) -> AccessDecision {
    if matches!((kind, operation), (ResourceKind::User, Operation::Delete)) {
        return AccessDecision::Unsupported;
    }
    if operation.is_read() || principal.is_admin() {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny
    }
}

/// [`decide`], mapped onto the service error type.
pub fn authorize(principal: &Principal, kind: ResourceKind, operation: Operation) -> Result<(), Error> {
    match decide(principal, kind, operation) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny => Err(Error::forbidden(format!(
            "you do not have permission to modify {kind} records"
        ))),
        AccessDecision::Unsupported => Err(Error::method_not_allowed(format!(
            "{kind} records cannot be deleted"
        ))),
    }
}

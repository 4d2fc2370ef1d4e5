//! Domain types, policies and services.
//!
//! Purpose: keep the shuttle backend's rules (who may change what, how
//! driver accounts are provisioned, how queued mail is retried) independent
//! of HTTP and storage. Adapters talk to this module only through the traits
//! in [`ports`].
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - Access gate: `Principal`, `ResourceKind`, `Operation`, `authorize`.
//! - Resources: `UserAccount`, `Stop`, `Shuttle` and their drafts.
//! - Services: `AccountProvisioner`, `DriverAccountService`, `StopService`,
//!   `ShuttleService`, `AccountLoginService`, `NotificationDispatcher`.

pub mod access;
pub mod account;
pub mod account_provisioning;
pub mod admin_bootstrap;
pub mod credentials;
pub mod driver_account_service;
pub mod error;
pub mod login;
pub mod notification;
pub mod notification_dispatcher;
mod persistence_errors;
pub mod ports;
pub mod principal;
pub mod role;
pub mod shuttle;
pub mod shuttle_service;
pub mod stop;
pub mod stop_service;
pub mod trace_id;
pub mod validation;

pub use self::access::{AccessDecision, Operation, ResourceKind, authorize, decide};
pub use self::account::{
    AccountChanges, AccountDraft, AccountId, AccountProfile, EmailAddress, NewAccount, PersonName,
    UserAccount, Username,
};
pub use self::account_provisioning::AccountProvisioner;
pub use self::admin_bootstrap::{AdminSeed, BootstrapOutcome, ensure_admin};
pub use self::credentials::{
    GeneratedPassword, LoginCredentials, LoginValidationError, PasswordHash,
};
pub use self::driver_account_service::DriverAccountService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::login::AccountLoginService;
pub use self::notification::{
    CREDENTIAL_EMAIL_SUBJECT, DEFAULT_SENDER, OutboxMessage, OutboxMessageId, OutgoingEmail,
    REDACTED_BODY, credential_email,
};
pub use self::notification_dispatcher::{DispatchPolicy, DispatchReport, NotificationDispatcher};
pub use self::principal::Principal;
pub use self::role::{Role, UnknownRole, verify_role_catalog};
pub use self::shuttle::{Shuttle, ShuttleDraft, ShuttleId};
pub use self::shuttle_service::ShuttleService;
pub use self::stop::{NewStop, Stop, StopDraft, StopFields, StopId};
pub use self::stop_service::StopService;
pub use self::trace_id::TraceId;
pub use self::validation::{FieldViolation, ViolationCode, WriteMode};

//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{account_roles, accounts, notification_outbox, shuttles, stops};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
}

/// Profile changes; `None` columns are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = accounts)]
pub(crate) struct AccountUpdate<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = account_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRoleRow {
    pub account_id: i64,
    pub role_name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stops)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StopRow {
    pub id: i64,
    pub name: String,
    pub abbr: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stops)]
pub(crate) struct NewStopRow<'a> {
    pub name: &'a str,
    pub abbr: &'a str,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = stops)]
pub(crate) struct StopUpdate<'a> {
    pub name: Option<&'a str>,
    pub abbr: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = shuttles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ShuttleRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notification_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OutboxRow {
    pub id: i64,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub next_attempt_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notification_outbox)]
pub(crate) struct NewOutboxRow<'a> {
    pub sender: &'a str,
    pub recipient: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
}

//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Login accounts for administrators and drivers.
    accounts (id) {
        id -> Int8,
        username -> Varchar,
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        password_hash -> Text,
        is_admin -> Bool,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Role catalogue, seeded by migration.
    roles (name) {
        name -> Varchar,
    }
}

diesel::table! {
    /// Role grants.
    account_roles (account_id, role_name) {
        account_id -> Int8,
        role_name -> Varchar,
    }
}

diesel::table! {
    /// Campus shuttle stops.
    stops (id) {
        id -> Int8,
        name -> Varchar,
        abbr -> Varchar,
    }
}

diesel::table! {
    /// Shuttle vehicles.
    shuttles (id) {
        id -> Int8,
        name -> Varchar,
    }
}

diesel::table! {
    /// Durable queue of outgoing email.
    notification_outbox (id) {
        id -> Int8,
        sender -> Text,
        recipient -> Text,
        subject -> Text,
        body -> Text,
        status -> Varchar,
        attempts -> Int4,
        last_error -> Nullable<Text>,
        created_at -> Timestamptz,
        next_attempt_at -> Timestamptz,
        sent_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(account_roles -> accounts (account_id));
diesel::joinable!(account_roles -> roles (role_name));

diesel::allow_tables_to_appear_in_same_query!(
    accounts,
    roles,
    account_roles,
    stops,
    shuttles,
    notification_outbox,
);

//! Static contract checks for the baseline migration SQL.

use rstest::rstest;

const MIGRATION_UP: &str = include_str!("../migrations/2026-03-01-000000_shuttle_baseline/up.sql");
const MIGRATION_DOWN: &str =
    include_str!("../migrations/2026-03-01-000000_shuttle_baseline/down.sql");

#[rstest]
#[case("CREATE TABLE IF NOT EXISTS accounts")]
#[case("CREATE TABLE IF NOT EXISTS roles")]
#[case("CREATE TABLE IF NOT EXISTS account_roles")]
#[case("CREATE TABLE IF NOT EXISTS stops")]
#[case("CREATE TABLE IF NOT EXISTS shuttles")]
#[case("CREATE TABLE IF NOT EXISTS notification_outbox")]
fn creates_expected_tables(#[case] table_ddl: &str) {
    assert!(
        MIGRATION_UP.contains(table_ddl),
        "expected migration to contain: {table_ddl}"
    );
}

#[rstest]
#[case("CONSTRAINT accounts_username_key UNIQUE (username)")]
#[case("ON accounts (LOWER(email))")]
#[case("CONSTRAINT stops_abbr_key UNIQUE (abbr)")]
#[case("CONSTRAINT shuttles_name_key UNIQUE (name)")]
#[case("PRIMARY KEY (account_id, role_name)")]
fn enforces_uniqueness_constraints(#[case] fragment: &str) {
    // The Diesel adapters map these constraint names to field violations;
    // renaming one here needs the matching change in the error mapping.
    assert!(
        MIGRATION_UP.contains(fragment),
        "expected migration to contain: {fragment}"
    );
}

#[rstest]
fn seeds_the_driver_role() {
    assert!(MIGRATION_UP.contains("INSERT INTO roles (name) VALUES ('Driver')"));
}

#[rstest]
fn outbox_status_is_constrained_and_indexed() {
    assert!(MIGRATION_UP.contains("CHECK (status IN ('pending', 'sent', 'abandoned'))"));
    assert!(MIGRATION_UP.contains("idx_notification_outbox_due"));
    assert!(MIGRATION_UP.contains("WHERE status = 'pending'"));
}

#[rstest]
#[case("DROP TABLE IF EXISTS notification_outbox")]
#[case("DROP TABLE IF EXISTS account_roles")]
#[case("DROP TABLE IF EXISTS accounts")]
fn down_migration_drops_tables(#[case] ddl: &str) {
    assert!(
        MIGRATION_DOWN.contains(ddl),
        "expected down migration to contain: {ddl}"
    );
}

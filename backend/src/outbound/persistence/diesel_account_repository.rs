//! PostgreSQL-backed `AccountRepository`.
//!
//! Role grants live in `account_roles`; reads load them in a second query
//! keyed by the account ids just fetched. Account creation inserts the
//! account and its grants in one transaction.

use std::collections::BTreeMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{AccountLogin, AccountRepository, AccountRepositoryError};
use crate::domain::{
    AccountChanges, AccountId, EmailAddress, NewAccount, PasswordHash, PersonName, Role,
    UserAccount, Username,
};

use super::error_mapping::{StoreFailure, classify, impl_from_store_failure, pool_failure};
use super::models::{AccountRoleRow, AccountRow, AccountUpdate, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::{account_roles, accounts};

impl_from_store_failure!(AccountRepositoryError, duplicate);

diesel::define_sql_function! {
    /// SQL `LOWER(text)`.
    fn lower(value: Text) -> Text;
}

/// Diesel implementation of [`AccountRepository`].
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn store_error(error: diesel::result::Error) -> AccountRepositoryError {
    classify(error).into()
}

fn pool_error(error: PoolError) -> AccountRepositoryError {
    pool_failure(error).into()
}

fn corrupt(what: &str, id: i64, detail: impl std::fmt::Display) -> AccountRepositoryError {
    AccountRepositoryError::query(format!("stored {what} for account {id} is invalid: {detail}"))
}

fn row_to_account(row: AccountRow, roles: Vec<Role>) -> Result<UserAccount, AccountRepositoryError> {
    let id = row.id;
    Ok(UserAccount {
        id: AccountId::new(id),
        username: Username::parse(&row.username).map_err(|err| corrupt("username", id, err))?,
        email: EmailAddress::parse(&row.email).map_err(|err| corrupt("email", id, err))?,
        first_name: PersonName::parse("first_name", &row.first_name)
            .map_err(|err| corrupt("first name", id, err))?,
        last_name: PersonName::parse("last_name", &row.last_name)
            .map_err(|err| corrupt("last name", id, err))?,
        roles,
        is_admin: row.is_admin,
        is_active: row.is_active,
        created_at: row.created_at,
    })
}

/// Load role grants for `ids`, grouped by account. Unknown role names are
/// skipped with a warning so a stray catalogue row cannot lock accounts out.
async fn load_roles(
    conn: &mut AsyncPgConnection,
    ids: &[i64],
) -> Result<BTreeMap<i64, Vec<Role>>, AccountRepositoryError> {
    let rows: Vec<AccountRoleRow> = account_roles::table
        .filter(account_roles::account_id.eq_any(ids))
        .select(AccountRoleRow::as_select())
        .order((account_roles::account_id, account_roles::role_name))
        .load(conn)
        .await
        .map_err(store_error)?;

    let mut grouped: BTreeMap<i64, Vec<Role>> = BTreeMap::new();
    for row in rows {
        match row.role_name.parse::<Role>() {
            Ok(role) => grouped.entry(row.account_id).or_default().push(role),
            Err(err) => warn!(account_id = row.account_id, role = %err.0, "ignoring unknown role grant"),
        }
    }
    Ok(grouped)
}

async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<AccountRow>,
) -> Result<Vec<UserAccount>, AccountRepositoryError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut roles = load_roles(conn, &ids).await?;
    rows.into_iter()
        .map(|row| {
            let granted = roles.remove(&row.id).unwrap_or_default();
            row_to_account(row, granted)
        })
        .collect()
}

async fn find_row(conn: &mut AsyncPgConnection, id: i64) -> Result<Option<AccountRow>, AccountRepositoryError> {
    accounts::table
        .find(id)
        .select(AccountRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(store_error)
}

async fn hydrate_one(
    conn: &mut AsyncPgConnection,
    row: Option<AccountRow>,
) -> Result<Option<UserAccount>, AccountRepositoryError> {
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(hydrate(conn, vec![row]).await?.pop())
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn list(&self) -> Result<Vec<UserAccount>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<AccountRow> = accounts::table
            .select(AccountRow::as_select())
            .order(accounts::id)
            .load(&mut conn)
            .await
            .map_err(store_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<UserAccount>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = find_row(&mut conn, id.get()).await?;
        hydrate_one(&mut conn, row).await
    }

    async fn find_login(&self, username: &str) -> Result<Option<AccountLogin>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<AccountRow> = accounts::table
            .filter(accounts::username.eq(username))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(store_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let password_hash = PasswordHash::new(row.password_hash.clone());
        let account = hydrate(&mut conn, vec![row]).await?.pop();
        Ok(account.map(|account| AccountLogin {
            account,
            password_hash,
        }))
    }

    async fn email_in_use(
        &self,
        normalized_email: &str,
        except: Option<AccountId>,
    ) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = accounts::table
            .select(accounts::id)
            .filter(lower(accounts::email).eq(normalized_email))
            .into_boxed();
        if let Some(except) = except {
            query = query.filter(accounts::id.ne(except.get()));
        }
        let hits = query.limit(1).load::<i64>(&mut conn).await.map_err(store_error)?;
        Ok(!hits.is_empty())
    }

    async fn username_in_use(
        &self,
        username: &str,
        except: Option<AccountId>,
    ) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = accounts::table
            .select(accounts::id)
            .filter(accounts::username.eq(username))
            .into_boxed();
        if let Some(except) = except {
            query = query.filter(accounts::id.ne(except.get()));
        }
        let hits = query.limit(1).load::<i64>(&mut conn).await.map_err(store_error)?;
        Ok(!hits.is_empty())
    }

    async fn create(&self, account: &NewAccount) -> Result<UserAccount, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let new_row = NewAccountRow {
            username: account.username.as_str(),
            email: account.email.as_str(),
            first_name: account.first_name.as_str(),
            last_name: account.last_name.as_str(),
            password_hash: account.password_hash.as_str(),
            is_admin: account.is_admin,
        };
        let mut roles = account.roles.clone();
        roles.sort();
        roles.dedup();
        let grant_names: Vec<&'static str> = roles.iter().map(|role| role.as_str()).collect();

        let row = conn
            .transaction::<AccountRow, diesel::result::Error, _>(|conn| {
                async move {
                    let row: AccountRow = diesel::insert_into(accounts::table)
                        .values(&new_row)
                        .returning(AccountRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let grants: Vec<AccountRoleRow> = grant_names
                        .iter()
                        .map(|name| AccountRoleRow {
                            account_id: row.id,
                            role_name: (*name).to_owned(),
                        })
                        .collect();
                    if !grants.is_empty() {
                        diesel::insert_into(account_roles::table)
                            .values(&grants)
                            .execute(conn)
                            .await?;
                    }
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(store_error)?;
        row_to_account(row, roles)
    }

    async fn update(
        &self,
        id: AccountId,
        changes: &AccountChanges,
    ) -> Result<Option<UserAccount>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changeset = AccountUpdate {
            username: changes.username.as_ref().map(Username::as_str),
            email: changes.email.as_ref().map(EmailAddress::as_str),
            first_name: changes.first_name.as_ref().map(PersonName::as_str),
            last_name: changes.last_name.as_ref().map(PersonName::as_str),
        };
        if changes == &AccountChanges::default() {
            let row = find_row(&mut conn, id.get()).await?;
            return hydrate_one(&mut conn, row).await;
        }
        let row: Option<AccountRow> = diesel::update(accounts::table.find(id.get()))
            .set(&changeset)
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(store_error)?;
        hydrate_one(&mut conn, row).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn row(username: &str, email: &str) -> AccountRow {
        AccountRow {
            id: 3,
            username: username.to_owned(),
            email: email.to_owned(),
            first_name: "Dana".to_owned(),
            last_name: "Driver".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            is_admin: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn valid_rows_become_accounts() {
        let account = row_to_account(row("dana", "dana@umd.edu"), vec![Role::Driver]).expect("account");
        assert_eq!(account.id, AccountId::new(3));
        assert!(account.has_role(Role::Driver));
    }

    #[rstest]
    #[case(row("has space", "dana@umd.edu"))]
    #[case(row("dana", "not-an-email"))]
    fn corrupt_rows_are_query_errors(#[case] bad: AccountRow) {
        let err = row_to_account(bad, Vec::new()).expect_err("corrupt row");
        assert!(matches!(err, AccountRepositoryError::Query { .. }));
    }

    #[rstest]
    fn duplicates_keep_their_field() {
        let err: AccountRepositoryError = StoreFailure::Duplicate("email").into();
        assert_eq!(err, AccountRepositoryError::duplicate("email"));
    }
}

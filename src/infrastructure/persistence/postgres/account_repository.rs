use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::Page;
use crate::domain::company::{
  Account, AccountNumber, AccountRepository, CompanyError,
};

use super::is_unique_violation;

const ACCOUNT_COLUMNS: &str = "id, user_id, account_type, bank_name, account_name, \
  account_number, swift_code, created_at, updated_at";

#[derive(Debug, FromRow)]
struct AccountRow {
  id: Uuid,
  user_id: Uuid,
  account_type: String,
  bank_name: String,
  account_name: String,
  account_number: String,
  swift_code: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
  type Error = CompanyError;

  fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
    Ok(Account {
      id: row.id,
      user_id: row.user_id,
      account_type: row.account_type,
      bank_name: row.bank_name,
      account_name: row.account_name,
      account_number: AccountNumber::new(row.account_number)?,
      swift_code: row.swift_code,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

pub struct PostgresAccountRepository {
  pool: PgPool,
}

impl PostgresAccountRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn map_write_error(e: sqlx::Error, account_number: &str) -> CompanyError {
  if is_unique_violation(&e, "accounts_account_number_unique") {
    return CompanyError::AccountNumberAlreadyExists(account_number.to_string());
  }
  CompanyError::Database(e)
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
  async fn create(&self, account: Account) -> Result<Account, CompanyError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
      r#"
            INSERT INTO accounts ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {columns}
            "#,
      columns = ACCOUNT_COLUMNS
    ))
    .bind(account.id)
    .bind(account.user_id)
    .bind(&account.account_type)
    .bind(&account.bank_name)
    .bind(&account.account_name)
    .bind(account.account_number.as_str())
    .bind(&account.swift_code)
    .bind(account.created_at)
    .bind(account.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| map_write_error(e, account.account_number.as_str()))?;

    row.try_into()
  }

  async fn update(&self, account: Account) -> Result<Account, CompanyError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
      r#"
            UPDATE accounts
            SET account_type = $3, bank_name = $4, account_name = $5,
                account_number = $6, swift_code = $7, updated_at = $8
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
      ACCOUNT_COLUMNS
    ))
    .bind(account.id)
    .bind(account.user_id)
    .bind(&account.account_type)
    .bind(&account.bank_name)
    .bind(&account.account_name)
    .bind(account.account_number.as_str())
    .bind(&account.swift_code)
    .bind(account.updated_at)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| map_write_error(e, account.account_number.as_str()))?;

    row.ok_or(CompanyError::AccountNotFound)?.try_into()
  }

  async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Account>, CompanyError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
      "SELECT {} FROM accounts WHERE id = $1 AND user_id = $2",
      ACCOUNT_COLUMNS
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Account::try_from).transpose()
  }

  async fn list_by_user(&self, user_id: Uuid, page: Page) -> Result<Vec<Account>, CompanyError> {
    let rows = sqlx::query_as::<_, AccountRow>(&format!(
      r#"
            SELECT {} FROM accounts
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
      ACCOUNT_COLUMNS
    ))
    .bind(user_id)
    .bind(i64::from(page.limit))
    .bind(page.offset())
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(Account::try_from).collect()
  }

  async fn count_by_user(&self, user_id: Uuid) -> Result<i64, CompanyError> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE user_id = $1")
      .bind(user_id)
      .fetch_one(&self.pool)
      .await?;

    Ok(count.0)
  }

  async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, CompanyError> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1 AND user_id = $2")
      .bind(id)
      .bind(user_id)
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected() > 0)
  }

  async fn exists_by_account_number(
    &self,
    account_number: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, CompanyError> {
    let exists: (bool,) = sqlx::query_as(
      r#"
            SELECT EXISTS(
                SELECT 1 FROM accounts
                WHERE account_number = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
    )
    .bind(account_number)
    .bind(exclude_id)
    .fetch_one(&self.pool)
    .await?;

    Ok(exists.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_support::{seed_user, setup_test_db};

  fn account(user_id: Uuid, number: &str) -> Account {
    Account::new(
      user_id,
      "Savings".to_string(),
      "First Bank".to_string(),
      "Acme Ltd".to_string(),
      AccountNumber::new(number).unwrap(),
      None,
    )
  }

  #[tokio::test]
  #[ignore = "requires a Docker daemon"]
  async fn test_account_number_is_globally_unique() {
    let (pool, _container) = setup_test_db().await;
    let alice = seed_user(&pool, "alice@example.com").await;
    let bob = seed_user(&pool, "bob@example.com").await;
    let repo = PostgresAccountRepository::new(pool);

    repo.create(account(alice.id, "0123456789")).await.unwrap();
    let result = repo.create(account(bob.id, "0123456789")).await;
    assert!(matches!(
      result,
      Err(CompanyError::AccountNumberAlreadyExists(n)) if n == "0123456789"
    ));
    assert!(repo.exists_by_account_number("0123456789", None).await.unwrap());
  }

  #[tokio::test]
  #[ignore = "requires a Docker daemon"]
  async fn test_scoped_lookup_and_delete() {
    let (pool, _container) = setup_test_db().await;
    let alice = seed_user(&pool, "alice@example.com").await;
    let repo = PostgresAccountRepository::new(pool);

    let created = repo.create(account(alice.id, "1111111111")).await.unwrap();
    assert!(repo.find_by_id(Uuid::new_v4(), created.id).await.unwrap().is_none());
    assert_eq!(repo.count_by_user(alice.id).await.unwrap(), 1);

    let listed = repo.list_by_user(alice.id, Page::default()).await.unwrap();
    assert_eq!(listed.len(), 1);

    assert!(!repo.delete(Uuid::new_v4(), created.id).await.unwrap());
    assert!(repo.delete(alice.id, created.id).await.unwrap());
    assert!(!repo.delete(alice.id, created.id).await.unwrap());
  }
}

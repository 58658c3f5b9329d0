use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{entities::User, errors::AuthError, ports::UserRepository};

use super::is_unique_violation;

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  first_name: String,
  last_name: String,
  email: String,
  phone_number: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User {
      id: row.id,
      first_name: row.first_name,
      last_name: row.last_name,
      email: row.email,
      phone_number: row.phone_number,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let email = user.email.clone();
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (id, first_name, last_name, email, phone_number, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, first_name, last_name, email, phone_number, created_at, updated_at
            "#,
    )
    .bind(user.id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.phone_number)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      if is_unique_violation(&e, "users_email_unique") {
        return AuthError::Repository(format!("User with email {} already exists", email));
      }
      AuthError::Database(e)
    })?;

    Ok(row.into())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, first_name, last_name, email, phone_number, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }
}

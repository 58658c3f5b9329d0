use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::auth::entities::Session;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::SessionRepository;

/// Database row structure for sessions table
#[derive(Debug, FromRow)]
struct SessionRow {
  id: Uuid,
  user_id: Uuid,
  token_hash: String,
  expires_at: DateTime<Utc>,
  created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
  fn from(row: SessionRow) -> Self {
    Session {
      id: row.id,
      user_id: row.user_id,
      token_hash: row.token_hash,
      expires_at: row.expires_at,
      created_at: row.created_at,
    }
  }
}

/// PostgreSQL implementation of the SessionRepository trait
pub struct PostgresSessionRepository {
  pool: PgPool,
}

impl PostgresSessionRepository {
  /// Creates a new PostgresSessionRepository with the given connection pool
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
  async fn create(&self, session: Session) -> Result<Session, AuthError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
    )
    .bind(session.id)
    .bind(session.user_id)
    .bind(&session.token_hash)
    .bind(session.expires_at)
    .bind(session.created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create session: {}", e);
      AuthError::Database(e)
    })?;

    Ok(row.into())
  }

  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM sessions
            WHERE token_hash = $1
            "#,
    )
    .bind(token_hash)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find session by token hash: {}", e);
      AuthError::Database(e)
    })?;

    Ok(row.map(Into::into))
  }

  async fn delete(&self, session_id: Uuid) -> Result<(), AuthError> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
      .bind(session_id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to delete session: {}", e);
        AuthError::Database(e)
      })?;

    Ok(())
  }
}

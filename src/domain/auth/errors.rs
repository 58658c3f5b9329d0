use thiserror::Error;

use super::value_objects::ValueObjectError;

/// Authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Invalid or expired session")]
  InvalidSession,

  #[error("User not found")]
  UserNotFound,

  #[error("Value object error: {0}")]
  ValueObject(#[from] ValueObjectError),

  #[error("Repository error: {0}")]
  Repository(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompanyError {
  #[error("Company details not found")]
  NotFound,

  #[error("Account details not found")]
  AccountNotFound,

  #[error("Account number '{0}' already exists")]
  AccountNumberAlreadyExists(String),

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("Repository error: {0}")]
  Repository(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum ValidationError {
  #[error("Account number must be exactly 10 digits.")]
  AccountNumberInvalid,

  #[error("{field} is required")]
  MissingField { field: &'static str },

  #[error("{field} must be at most {max} characters")]
  FieldTooLong { field: &'static str, max: usize },
}

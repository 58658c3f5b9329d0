use thiserror::Error;
use uuid::Uuid;

use crate::domain::auth::AuthError;
use crate::domain::client::ClientError;
use crate::domain::company::CompanyError;

use super::value_objects::ValueObjectError;

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("{0}")]
  Validation(String),

  #[error("Validation error: {0}")]
  ValueObject(#[from] ValueObjectError),

  #[error("User not found")]
  Unauthorized,

  #[error("Company details not found")]
  CompanyNotFound,

  #[error("Client details not found, please create a new client")]
  ClientNotFound(Uuid),

  #[error("Account details not found")]
  AccountNotFound(Uuid),

  #[error("Invoice not found: {0}")]
  InvoiceNotFound(Uuid),

  #[error("No invoices found for the given IDs")]
  InvoicesNotFound,

  #[error("Only invoices with status \"Draft\" can be updated")]
  InvalidState,

  #[error("Invalid total amount")]
  InvalidAmount,

  #[error("Invoice number '{0}' already exists")]
  DuplicateInvoiceNumber(String),

  #[error("Failed to fetch asset: {0}")]
  AssetFetch(String),

  #[error("Failed to render invoice: {0}")]
  Render(String),

  #[error("Failed to send email: {0}")]
  Email(String),

  #[error("Repository error: {0}")]
  Repository(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl From<ClientError> for InvoiceError {
  fn from(error: ClientError) -> Self {
    match error {
      ClientError::NotFound(id) => InvoiceError::ClientNotFound(id),
      ClientError::Database(e) => InvoiceError::Database(e),
      other => InvoiceError::Repository(other.to_string()),
    }
  }
}

impl From<CompanyError> for InvoiceError {
  fn from(error: CompanyError) -> Self {
    match error {
      CompanyError::NotFound => InvoiceError::CompanyNotFound,
      CompanyError::Database(e) => InvoiceError::Database(e),
      other => InvoiceError::Repository(other.to_string()),
    }
  }
}

impl From<AuthError> for InvoiceError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::UserNotFound | AuthError::InvalidSession => InvoiceError::Unauthorized,
      AuthError::Database(e) => InvoiceError::Database(e),
      other => InvoiceError::Repository(other.to_string()),
    }
  }
}

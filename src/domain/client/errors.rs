use thiserror::Error;
use uuid::Uuid;

use crate::domain::company::{CompanyError, ValidationError};

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("Client not found: {0}")]
  NotFound(Uuid),

  #[error("Company profile not found. Please complete your profile.")]
  CompanyProfileNotFound,

  #[error("Please complete your company profile before adding a client")]
  CompanyProfileIncomplete,

  #[error("You have already added this client")]
  BusinessNameAlreadyExists,

  #[error("Client has invoices and cannot be deleted")]
  HasInvoices,

  #[error("{0}")]
  InvalidInput(String),

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("Company error: {0}")]
  Company(#[from] CompanyError),

  #[error("Repository error: {0}")]
  Repository(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

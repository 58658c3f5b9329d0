pub mod account_repository;
pub mod client_repository;
pub mod company_repository;
pub mod invoice_repository;
pub mod session_repository;
pub mod user_repository;

pub use account_repository::PostgresAccountRepository;
pub use client_repository::PostgresClientRepository;
pub use company_repository::PostgresCompanyRepository;
pub use invoice_repository::PostgresInvoiceRepository;
pub use session_repository::PostgresSessionRepository;
pub use user_repository::PostgresUserRepository;

/// SQLSTATE for unique_violation
pub(crate) const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for foreign_key_violation
pub(crate) const FOREIGN_KEY_VIOLATION: &str = "23503";

/// True when `error` is a foreign key violation on the named constraint
pub(crate) fn is_foreign_key_violation(error: &sqlx::Error, constraint: &str) -> bool {
  if let sqlx::Error::Database(db_err) = error {
    return db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
      && db_err.constraint() == Some(constraint);
  }
  false
}

/// True when `error` is a unique violation on the named constraint or index
pub(crate) fn is_unique_violation(error: &sqlx::Error, constraint: &str) -> bool {
  if let sqlx::Error::Database(db_err) = error {
    return db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
      && db_err.constraint() == Some(constraint);
  }
  false
}

pub mod memory;
pub mod postgres;

use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::auth::ports::{SessionRepository, UserRepository};
use crate::domain::client::ClientRepository;
use crate::domain::company::{AccountRepository, CompanyRepository};
use crate::domain::invoice::InvoiceRepository;

/// One implementation of every repository port
#[derive(Clone)]
pub struct Repositories {
  pub users: Arc<dyn UserRepository>,
  pub sessions: Arc<dyn SessionRepository>,
  pub companies: Arc<dyn CompanyRepository>,
  pub accounts: Arc<dyn AccountRepository>,
  pub clients: Arc<dyn ClientRepository>,
  pub invoices: Arc<dyn InvoiceRepository>,
}

impl Repositories {
  pub fn postgres(pool: PgPool) -> Self {
    Self {
      users: Arc::new(postgres::PostgresUserRepository::new(pool.clone())),
      sessions: Arc::new(postgres::PostgresSessionRepository::new(pool.clone())),
      companies: Arc::new(postgres::PostgresCompanyRepository::new(pool.clone())),
      accounts: Arc::new(postgres::PostgresAccountRepository::new(pool.clone())),
      clients: Arc::new(postgres::PostgresClientRepository::new(pool.clone())),
      invoices: Arc::new(postgres::PostgresInvoiceRepository::new(pool)),
    }
  }

  pub fn in_memory() -> Self {
    Self {
      users: Arc::new(memory::InMemoryUserRepository::new()),
      sessions: Arc::new(memory::InMemorySessionRepository::new()),
      companies: Arc::new(memory::InMemoryCompanyRepository::new()),
      accounts: Arc::new(memory::InMemoryAccountRepository::new()),
      clients: Arc::new(memory::InMemoryClientRepository::new()),
      invoices: Arc::new(memory::InMemoryInvoiceRepository::new()),
    }
  }
}

//! In-process repositories backed by `HashMap`s
//!
//! They honour the same ownership scoping and uniqueness rules as the Postgres
//! repositories and back the service and HTTP tests.

mod auth;
mod client;
mod company;
mod invoice;

pub use auth::{InMemorySessionRepository, InMemoryUserRepository};
pub use client::InMemoryClientRepository;
pub use company::{InMemoryAccountRepository, InMemoryCompanyRepository};
pub use invoice::InMemoryInvoiceRepository;

use crate::domain::Page;

/// Applies page/limit to an already ordered list
pub(crate) fn paginate<T>(rows: Vec<T>, page: Page) -> Vec<T> {
  rows
    .into_iter()
    .skip(page.offset() as usize)
    .take(page.limit as usize)
    .collect()
}

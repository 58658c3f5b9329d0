//! Multi-tenant invoicing backend
//!
//! Users manage a company profile, bank accounts and clients, issue invoices against them,
//! render invoices to PDF and email them to recipients.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;

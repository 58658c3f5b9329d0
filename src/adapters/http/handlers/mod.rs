pub mod accounts;
pub mod clients;
pub mod company;
pub mod health;
pub mod invoices;

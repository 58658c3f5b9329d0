pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Account, AccountUpdate, Company, CompanyProfileUpdate};
pub use errors::{CompanyError, ValidationError};
pub use ports::{AccountRepository, CompanyRepository};
pub use services::{CompanyService, NewAccount};
pub use value_objects::AccountNumber;

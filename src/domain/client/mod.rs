pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;

pub use entities::{Client, ClientFilter, ClientUpdate};
pub use errors::ClientError;
pub use ports::ClientRepository;
pub use services::{ClientService, NewClient};

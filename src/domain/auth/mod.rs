pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{Session, User};
pub use errors::AuthError;
pub use ports::{SessionRepository, UserRepository};
pub use services::AuthService;
pub use value_objects::{SessionToken, TokenHash, ValueObjectError};

//! Authentication use cases
//!
//! Sessions are provisioned outside this service; the only workflow here resolves the
//! caller behind a bearer token.

mod get_current_user;

pub use get_current_user::{CurrentUserResponse, GetCurrentUserUseCase};

use std::sync::Arc;

use super::entities::User;
use super::errors::AuthError;
use super::ports::{SessionRepository, UserRepository};
use super::value_objects::SessionToken;

/// Resolves bearer credentials into users
///
/// Issuing sessions belongs to the identity service; this side only validates them.
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  session_repo: Arc<dyn SessionRepository>,
}

impl AuthService {
  pub fn new(user_repo: Arc<dyn UserRepository>, session_repo: Arc<dyn SessionRepository>) -> Self {
    Self {
      user_repo,
      session_repo,
    }
  }

  /// Validates a session token and returns the associated user
  pub async fn validate_session(&self, token: SessionToken) -> Result<User, AuthError> {
    let token_hash = token.hash();

    let session = self
      .session_repo
      .find_by_token_hash(token_hash.as_str())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    if session.is_expired() {
      // Delete expired session
      self.session_repo.delete(session.id).await?;
      return Err(AuthError::InvalidSession);
    }

    self
      .user_repo
      .find_by_id(session.user_id)
      .await?
      .ok_or(AuthError::UserNotFound)
  }
}

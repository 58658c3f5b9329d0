use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Session, User};
use super::errors::AuthError;

/// Repository trait for user lookups
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Stores a user (provisioning happens outside the invoicing API)
  async fn create(&self, user: User) -> Result<User, AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;
}

/// Repository trait for session persistence operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
  /// Creates a new session in the repository
  async fn create(&self, session: Session) -> Result<Session, AuthError>;

  /// Finds a session by its token hash
  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError>;

  /// Deletes a specific session
  async fn delete(&self, session_id: Uuid) -> Result<(), AuthError>;
}

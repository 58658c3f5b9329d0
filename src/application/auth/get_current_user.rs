use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Public projection of the authenticated user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
  pub id: Uuid,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub created_at: DateTime<Utc>,
}

impl From<&User> for CurrentUserResponse {
  fn from(user: &User) -> Self {
    Self {
      id: user.id,
      first_name: user.first_name.clone(),
      last_name: user.last_name.clone(),
      email: user.email.clone(),
      created_at: user.created_at,
    }
  }
}

/// Use case for resolving the user behind a session token
pub struct GetCurrentUserUseCase {
  auth_service: Arc<AuthService>,
}

impl GetCurrentUserUseCase {
  /// Creates a new instance of GetCurrentUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Validates the raw bearer token and returns the session owner
  ///
  /// # Errors
  /// Returns `AuthError` if the token is malformed, unknown or expired, or the user is gone
  pub async fn execute(&self, session_token: String) -> Result<User, AuthError> {
    let token = SessionToken::from_string(session_token)?;
    self.auth_service.validate_session(token).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::entities::Session;
  use crate::domain::auth::ports::{SessionRepository, UserRepository};
  use crate::infrastructure::persistence::memory::{
    InMemorySessionRepository, InMemoryUserRepository,
  };
  use chrono::Duration;

  #[tokio::test]
  async fn test_resolves_session_owner() {
    let users = Arc::new(InMemoryUserRepository::new());
    let sessions = Arc::new(InMemorySessionRepository::new());
    let user = users
      .create(User::new(
        "Ada".to_string(),
        "Lovelace".to_string(),
        "ada@example.com".to_string(),
      ))
      .await
      .unwrap();

    let token = SessionToken::generate();
    sessions
      .create(Session::new(
        user.id,
        token.hash().into_inner(),
        Utc::now() + Duration::hours(1),
      ))
      .await
      .unwrap();

    let use_case = GetCurrentUserUseCase::new(Arc::new(AuthService::new(users, sessions)));
    let resolved = use_case.execute(token.as_str().to_string()).await.unwrap();
    assert_eq!(resolved.id, user.id);

    let response = CurrentUserResponse::from(&resolved);
    assert_eq!(response.first_name, "Ada");
  }

  #[tokio::test]
  async fn test_malformed_token_is_rejected() {
    let use_case = GetCurrentUserUseCase::new(Arc::new(AuthService::new(
      Arc::new(InMemoryUserRepository::new()),
      Arc::new(InMemorySessionRepository::new()),
    )));
    assert!(use_case.execute("short".to_string()).await.is_err());
  }
}

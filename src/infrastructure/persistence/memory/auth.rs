use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::auth::{AuthError, Session, SessionRepository, User, UserRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
  users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let mut users = self.users.write().await;
    if users.values().any(|u| u.email == user.email) {
      return Err(AuthError::Repository(format!(
        "User with email {} already exists",
        user.email
      )));
    }
    users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    Ok(self.users.read().await.get(&id).cloned())
  }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
  sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
  async fn create(&self, session: Session) -> Result<Session, AuthError> {
    self
      .sessions
      .write()
      .await
      .insert(session.id, session.clone());
    Ok(session)
  }

  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError> {
    Ok(
      self
        .sessions
        .read()
        .await
        .values()
        .find(|s| s.token_hash == token_hash)
        .cloned(),
    )
  }

  async fn delete(&self, session_id: Uuid) -> Result<(), AuthError> {
    self.sessions.write().await.remove(&session_id);
    Ok(())
  }
}

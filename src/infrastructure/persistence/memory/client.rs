use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::Page;
use crate::domain::client::{Client, ClientError, ClientFilter, ClientRepository};

use super::paginate;

#[derive(Default)]
pub struct InMemoryClientRepository {
  clients: RwLock<HashMap<Uuid, Client>>,
}

impl InMemoryClientRepository {
  pub fn new() -> Self {
    Self::default()
  }

  fn name_taken(clients: &HashMap<Uuid, Client>, candidate: &Client) -> bool {
    let name = candidate.business_name.to_lowercase();
    clients.values().any(|c| {
      c.id != candidate.id
        && c.user_id == candidate.user_id
        && c.business_name.to_lowercase() == name
    })
  }

  async fn owned_newest_first(&self, user_id: Uuid) -> Vec<Client> {
    let mut rows: Vec<Client> = self
      .clients
      .read()
      .await
      .values()
      .filter(|c| c.user_id == user_id)
      .cloned()
      .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows
  }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
  async fn create(&self, client: Client) -> Result<Client, ClientError> {
    let mut clients = self.clients.write().await;
    if Self::name_taken(&clients, &client) {
      return Err(ClientError::BusinessNameAlreadyExists);
    }
    clients.insert(client.id, client.clone());
    Ok(client)
  }

  async fn update(&self, client: Client) -> Result<Client, ClientError> {
    let mut clients = self.clients.write().await;
    if Self::name_taken(&clients, &client) {
      return Err(ClientError::BusinessNameAlreadyExists);
    }
    match clients.get_mut(&client.id) {
      Some(slot) if slot.user_id == client.user_id => {
        *slot = client.clone();
        Ok(client)
      }
      _ => Err(ClientError::NotFound(client.id)),
    }
  }

  async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Client>, ClientError> {
    Ok(
      self
        .clients
        .read()
        .await
        .get(&id)
        .filter(|c| c.user_id == user_id)
        .cloned(),
    )
  }

  async fn list_by_user(&self, user_id: Uuid, page: Page) -> Result<Vec<Client>, ClientError> {
    Ok(paginate(self.owned_newest_first(user_id).await, page))
  }

  async fn filter(&self, user_id: Uuid, filter: &ClientFilter) -> Result<Vec<Client>, ClientError> {
    let rows = self.owned_newest_first(user_id).await;
    Ok(rows.into_iter().filter(|c| c.matches(filter)).collect())
  }

  async fn count_by_user(&self, user_id: Uuid) -> Result<i64, ClientError> {
    let clients = self.clients.read().await;
    Ok(clients.values().filter(|c| c.user_id == user_id).count() as i64)
  }

  async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, ClientError> {
    let mut clients = self.clients.write().await;
    if clients.get(&id).is_some_and(|c| c.user_id == user_id) {
      clients.remove(&id);
      return Ok(true);
    }
    Ok(false)
  }

  async fn exists_by_business_name(
    &self,
    user_id: Uuid,
    business_name: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, ClientError> {
    let name = business_name.trim().to_lowercase();
    Ok(self.clients.read().await.values().any(|c| {
      c.user_id == user_id && c.business_name.to_lowercase() == name && Some(c.id) != exclude_id
    }))
  }
}

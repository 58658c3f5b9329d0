use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Page;

use super::entities::{Client, ClientFilter};
use super::errors::ClientError;

#[async_trait]
pub trait ClientRepository: Send + Sync {
  async fn create(&self, client: Client) -> Result<Client, ClientError>;
  async fn update(&self, client: Client) -> Result<Client, ClientError>;
  /// Looks a client up by id, restricted to the owning user
  async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Client>, ClientError>;
  /// Newest first
  async fn list_by_user(&self, user_id: Uuid, page: Page) -> Result<Vec<Client>, ClientError>;
  async fn filter(&self, user_id: Uuid, filter: &ClientFilter) -> Result<Vec<Client>, ClientError>;
  async fn count_by_user(&self, user_id: Uuid) -> Result<i64, ClientError>;
  /// Returns `false` when nothing matched
  async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, ClientError>;
  /// Case-insensitive business name check within one user's clients
  async fn exists_by_business_name(
    &self,
    user_id: Uuid,
    business_name: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, ClientError>;
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Page;

use super::entities::{Account, Company};
use super::errors::CompanyError;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, CompanyError>;
  async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Company>, CompanyError>;
  /// Inserts the profile or replaces the one already owned by the same user
  async fn upsert(&self, company: Company) -> Result<Company, CompanyError>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
  async fn create(&self, account: Account) -> Result<Account, CompanyError>;
  async fn update(&self, account: Account) -> Result<Account, CompanyError>;
  /// Looks an account up by id, restricted to the owning user
  async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Account>, CompanyError>;
  async fn list_by_user(&self, user_id: Uuid, page: Page) -> Result<Vec<Account>, CompanyError>;
  async fn count_by_user(&self, user_id: Uuid) -> Result<i64, CompanyError>;
  /// Returns `false` when nothing matched
  async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, CompanyError>;
  async fn exists_by_account_number(
    &self,
    account_number: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, CompanyError>;
}

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::Page;
use crate::domain::company::{Account, AccountRepository, Company, CompanyError, CompanyRepository};

use super::paginate;

#[derive(Default)]
pub struct InMemoryCompanyRepository {
  companies: RwLock<HashMap<Uuid, Company>>,
}

impl InMemoryCompanyRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, CompanyError> {
    Ok(self.companies.read().await.get(&id).cloned())
  }

  async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Company>, CompanyError> {
    Ok(
      self
        .companies
        .read()
        .await
        .values()
        .find(|c| c.user_id == user_id)
        .cloned(),
    )
  }

  async fn upsert(&self, company: Company) -> Result<Company, CompanyError> {
    let mut companies = self.companies.write().await;
    // One profile per user: keep the id of the row already owned by the user
    let existing_id = companies
      .values()
      .find(|c| c.user_id == company.user_id)
      .map(|c| c.id);
    let mut company = company;
    if let Some(id) = existing_id {
      company.id = id;
    }
    companies.insert(company.id, company.clone());
    Ok(company)
  }
}

#[derive(Default)]
pub struct InMemoryAccountRepository {
  accounts: RwLock<HashMap<Uuid, Account>>,
}

impl InMemoryAccountRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
  async fn create(&self, account: Account) -> Result<Account, CompanyError> {
    let mut accounts = self.accounts.write().await;
    if accounts
      .values()
      .any(|a| a.account_number == account.account_number)
    {
      return Err(CompanyError::AccountNumberAlreadyExists(
        account.account_number.into_inner(),
      ));
    }
    accounts.insert(account.id, account.clone());
    Ok(account)
  }

  async fn update(&self, account: Account) -> Result<Account, CompanyError> {
    let mut accounts = self.accounts.write().await;
    if accounts
      .values()
      .any(|a| a.id != account.id && a.account_number == account.account_number)
    {
      return Err(CompanyError::AccountNumberAlreadyExists(
        account.account_number.into_inner(),
      ));
    }
    match accounts.get_mut(&account.id) {
      Some(slot) if slot.user_id == account.user_id => {
        *slot = account.clone();
        Ok(account)
      }
      _ => Err(CompanyError::AccountNotFound),
    }
  }

  async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Account>, CompanyError> {
    Ok(
      self
        .accounts
        .read()
        .await
        .get(&id)
        .filter(|a| a.user_id == user_id)
        .cloned(),
    )
  }

  async fn list_by_user(&self, user_id: Uuid, page: Page) -> Result<Vec<Account>, CompanyError> {
    let mut rows: Vec<Account> = self
      .accounts
      .read()
      .await
      .values()
      .filter(|a| a.user_id == user_id)
      .cloned()
      .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(paginate(rows, page))
  }

  async fn count_by_user(&self, user_id: Uuid) -> Result<i64, CompanyError> {
    let accounts = self.accounts.read().await;
    Ok(accounts.values().filter(|a| a.user_id == user_id).count() as i64)
  }

  async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, CompanyError> {
    let mut accounts = self.accounts.write().await;
    if accounts.get(&id).is_some_and(|a| a.user_id == user_id) {
      accounts.remove(&id);
      return Ok(true);
    }
    Ok(false)
  }

  async fn exists_by_account_number(
    &self,
    account_number: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, CompanyError> {
    Ok(self.accounts.read().await.values().any(|a| {
      a.account_number.as_str() == account_number && Some(a.id) != exclude_id
    }))
  }
}

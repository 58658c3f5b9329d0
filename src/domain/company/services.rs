use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Page;

use super::entities::{Account, AccountUpdate, Company, CompanyProfileUpdate};
use super::errors::CompanyError;
use super::ports::{AccountRepository, CompanyRepository};
use super::value_objects::AccountNumber;

/// Account creation data
pub struct NewAccount {
  pub account_type: String,
  pub bank_name: String,
  pub account_name: String,
  pub account_number: AccountNumber,
  pub swift_code: Option<String>,
}

pub struct CompanyService {
  company_repo: Arc<dyn CompanyRepository>,
  account_repo: Arc<dyn AccountRepository>,
}

impl CompanyService {
  pub fn new(
    company_repo: Arc<dyn CompanyRepository>,
    account_repo: Arc<dyn AccountRepository>,
  ) -> Self {
    Self {
      company_repo,
      account_repo,
    }
  }

  // Company profile operations
  pub async fn get_profile(&self, user_id: Uuid) -> Result<Company, CompanyError> {
    self
      .company_repo
      .find_by_user_id(user_id)
      .await?
      .ok_or(CompanyError::NotFound)
  }

  pub async fn edit_profile(
    &self,
    user_id: Uuid,
    update: CompanyProfileUpdate,
  ) -> Result<Company, CompanyError> {
    let mut company = self
      .company_repo
      .find_by_user_id(user_id)
      .await?
      .unwrap_or_else(|| Company::new(user_id));

    company.apply(update);
    let company = self.company_repo.upsert(company).await?;

    tracing::info!(user_id = %user_id, company_id = %company.id, "Company profile saved");
    Ok(company)
  }

  // Account operations
  pub async fn add_account(&self, user_id: Uuid, data: NewAccount) -> Result<Account, CompanyError> {
    if self
      .account_repo
      .exists_by_account_number(data.account_number.as_str(), None)
      .await?
    {
      return Err(CompanyError::AccountNumberAlreadyExists(
        data.account_number.into_inner(),
      ));
    }

    let account = Account::new(
      user_id,
      data.account_type,
      data.bank_name,
      data.account_name,
      data.account_number,
      data.swift_code,
    );
    self.account_repo.create(account).await
  }

  pub async fn list_accounts(
    &self,
    user_id: Uuid,
    page: Page,
  ) -> Result<(Vec<Account>, i64), CompanyError> {
    let accounts = self.account_repo.list_by_user(user_id, page).await?;
    let total = self.account_repo.count_by_user(user_id).await?;
    Ok((accounts, total))
  }

  pub async fn get_account(&self, user_id: Uuid, account_id: Uuid) -> Result<Account, CompanyError> {
    self
      .account_repo
      .find_by_id(user_id, account_id)
      .await?
      .ok_or(CompanyError::AccountNotFound)
  }

  pub async fn update_account(
    &self,
    user_id: Uuid,
    account_id: Uuid,
    update: AccountUpdate,
  ) -> Result<Account, CompanyError> {
    let mut account = self.get_account(user_id, account_id).await?;

    if let Some(number) = &update.account_number {
      if self
        .account_repo
        .exists_by_account_number(number.as_str(), Some(account_id))
        .await?
      {
        return Err(CompanyError::AccountNumberAlreadyExists(
          number.as_str().to_string(),
        ));
      }
    }

    account.apply(update);
    self.account_repo.update(account).await
  }

  pub async fn delete_account(&self, user_id: Uuid, account_id: Uuid) -> Result<(), CompanyError> {
    if !self.account_repo.delete(user_id, account_id).await? {
      return Err(CompanyError::AccountNotFound);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::memory::{
    InMemoryAccountRepository, InMemoryCompanyRepository,
  };

  fn service() -> CompanyService {
    CompanyService::new(
      Arc::new(InMemoryCompanyRepository::new()),
      Arc::new(InMemoryAccountRepository::new()),
    )
  }

  fn new_account(number: &str) -> NewAccount {
    NewAccount {
      account_type: "Savings".to_string(),
      bank_name: "First Bank".to_string(),
      account_name: "Acme Ltd".to_string(),
      account_number: AccountNumber::new(number).unwrap(),
      swift_code: Some("FBNINGLA".to_string()),
    }
  }

  #[tokio::test]
  async fn test_get_profile_missing() {
    let result = service().get_profile(Uuid::new_v4()).await;
    assert!(matches!(result, Err(CompanyError::NotFound)));
  }

  #[tokio::test]
  async fn test_edit_profile_upserts_single_row() {
    let service = service();
    let user_id = Uuid::new_v4();

    let first = service
      .edit_profile(
        user_id,
        CompanyProfileUpdate {
          company_name: Some("Acme".to_string()),
          ..Default::default()
        },
      )
      .await
      .unwrap();
    let second = service
      .edit_profile(
        user_id,
        CompanyProfileUpdate {
          tax_id: Some("TX-1".to_string()),
          ..Default::default()
        },
      )
      .await
      .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.company_name.as_deref(), Some("Acme"));
    assert_eq!(second.tax_id.as_deref(), Some("TX-1"));
  }

  #[tokio::test]
  async fn test_duplicate_account_number_is_rejected() {
    let service = service();
    service
      .add_account(Uuid::new_v4(), new_account("0123456789"))
      .await
      .unwrap();

    let result = service
      .add_account(Uuid::new_v4(), new_account("0123456789"))
      .await;
    assert!(matches!(
      result,
      Err(CompanyError::AccountNumberAlreadyExists(n)) if n == "0123456789"
    ));
  }

  #[tokio::test]
  async fn test_accounts_are_scoped_to_owner() {
    let service = service();
    let owner = Uuid::new_v4();
    let account = service
      .add_account(owner, new_account("0123456789"))
      .await
      .unwrap();

    let other = Uuid::new_v4();
    assert!(matches!(
      service.get_account(other, account.id).await,
      Err(CompanyError::AccountNotFound)
    ));
    assert!(matches!(
      service.delete_account(other, account.id).await,
      Err(CompanyError::AccountNotFound)
    ));

    service.delete_account(owner, account.id).await.unwrap();
    assert!(matches!(
      service.delete_account(owner, account.id).await,
      Err(CompanyError::AccountNotFound)
    ));
  }

  #[tokio::test]
  async fn test_update_account_partial() {
    let service = service();
    let owner = Uuid::new_v4();
    let account = service
      .add_account(owner, new_account("0123456789"))
      .await
      .unwrap();

    let updated = service
      .update_account(
        owner,
        account.id,
        AccountUpdate {
          bank_name: Some("Zenith".to_string()),
          ..Default::default()
        },
      )
      .await
      .unwrap();

    assert_eq!(updated.bank_name, "Zenith");
    assert_eq!(updated.account_number.as_str(), "0123456789");
  }

  #[tokio::test]
  async fn test_list_accounts_reports_total() {
    let service = service();
    let owner = Uuid::new_v4();
    for number in ["0000000001", "0000000002", "0000000003"] {
      service.add_account(owner, new_account(number)).await.unwrap();
    }

    let (accounts, total) = service
      .list_accounts(owner, Page::new(Some(1), Some(2)))
      .await
      .unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(total, 3);
  }
}

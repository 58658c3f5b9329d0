use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::invoice::PaginationDto;
use crate::domain::Page;
use crate::domain::company::{Account, AccountUpdate, CompanyError, CompanyService, NewAccount};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
  pub id: Uuid,
  pub account_type: String,
  pub bank_name: String,
  pub account_name: String,
  pub account_number: String,
  pub swift_code: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountDto {
  fn from(account: Account) -> Self {
    Self {
      id: account.id,
      account_type: account.account_type,
      bank_name: account.bank_name,
      account_name: account.account_name,
      account_number: account.account_number.into_inner(),
      swift_code: account.swift_code,
      created_at: account.created_at,
      updated_at: account.updated_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListAccountsResponse {
  pub accounts: Vec<AccountDto>,
  pub pagination: PaginationDto,
}

/// Bank account records of the caller
pub struct ManageAccountsUseCase {
  company_service: Arc<CompanyService>,
}

impl ManageAccountsUseCase {
  pub fn new(company_service: Arc<CompanyService>) -> Self {
    Self { company_service }
  }

  pub async fn add(&self, user_id: Uuid, data: NewAccount) -> Result<AccountDto, CompanyError> {
    let account = self.company_service.add_account(user_id, data).await?;
    tracing::info!(user_id = %user_id, account_id = %account.id, "Account added");
    Ok(account.into())
  }

  pub async fn list(
    &self,
    user_id: Uuid,
    page: Option<u32>,
    limit: Option<u32>,
  ) -> Result<ListAccountsResponse, CompanyError> {
    let page = Page::new(page, limit);
    let (accounts, total) = self.company_service.list_accounts(user_id, page).await?;
    Ok(ListAccountsResponse {
      accounts: accounts.into_iter().map(AccountDto::from).collect(),
      pagination: PaginationDto {
        page: page.page,
        limit: page.limit,
        total,
      },
    })
  }

  pub async fn get(&self, user_id: Uuid, account_id: Uuid) -> Result<AccountDto, CompanyError> {
    let account = self.company_service.get_account(user_id, account_id).await?;
    Ok(account.into())
  }

  pub async fn update(
    &self,
    user_id: Uuid,
    account_id: Uuid,
    update: AccountUpdate,
  ) -> Result<AccountDto, CompanyError> {
    let account = self
      .company_service
      .update_account(user_id, account_id, update)
      .await?;
    Ok(account.into())
  }

  pub async fn delete(&self, user_id: Uuid, account_id: Uuid) -> Result<(), CompanyError> {
    self.company_service.delete_account(user_id, account_id).await?;
    tracing::info!(user_id = %user_id, account_id = %account_id, "Account deleted");
    Ok(())
  }
}

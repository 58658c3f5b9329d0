use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Page;
use crate::domain::company::ports::CompanyRepository;
use crate::domain::company::value_objects::{optional_text, required_text};
use crate::domain::invoice::InvoiceRepository;

use super::entities::{Client, ClientFilter, ClientUpdate};
use super::errors::ClientError;
use super::ports::ClientRepository;

const MAX_TEXT: usize = 255;

/// Client creation data
#[derive(Debug, Clone, Default)]
pub struct NewClient {
  pub business_name: String,
  pub client_industry: String,
  pub email: String,
  pub phone_number: Option<String>,
  pub country: Option<String>,
  pub city: Option<String>,
  pub zip_code: Option<String>,
  pub address: Option<String>,
}

pub struct ClientService {
  client_repo: Arc<dyn ClientRepository>,
  company_repo: Arc<dyn CompanyRepository>,
  invoice_repo: Arc<dyn InvoiceRepository>,
}

impl ClientService {
  pub fn new(
    client_repo: Arc<dyn ClientRepository>,
    company_repo: Arc<dyn CompanyRepository>,
    invoice_repo: Arc<dyn InvoiceRepository>,
  ) -> Self {
    Self {
      client_repo,
      company_repo,
      invoice_repo,
    }
  }

  pub async fn add_client(&self, user_id: Uuid, data: NewClient) -> Result<Client, ClientError> {
    let company = self
      .company_repo
      .find_by_user_id(user_id)
      .await?
      .ok_or(ClientError::CompanyProfileNotFound)?;
    if !company.is_complete() {
      return Err(ClientError::CompanyProfileIncomplete);
    }

    let business_name = required_text(data.business_name, "businessName", MAX_TEXT)?;
    let client_industry = required_text(data.client_industry, "clientIndustry", MAX_TEXT)?;
    let email = required_text(data.email, "email", MAX_TEXT)?;

    if self
      .client_repo
      .exists_by_business_name(user_id, &business_name, None)
      .await?
    {
      return Err(ClientError::BusinessNameAlreadyExists);
    }

    let mut client = Client::new(user_id, business_name, client_industry, email);
    client.phone_number = optional_text(data.phone_number, "phoneNumber", MAX_TEXT)?;
    client.country = optional_text(data.country, "country", MAX_TEXT)?;
    client.city = optional_text(data.city, "city", MAX_TEXT)?;
    client.zip_code = optional_text(data.zip_code, "zipCode", MAX_TEXT)?;
    client.address = optional_text(data.address, "address", MAX_TEXT)?;

    let client = self.client_repo.create(client).await?;
    tracing::info!(user_id = %user_id, client_id = %client.id, "Client added");
    Ok(client)
  }

  pub async fn get_client(&self, user_id: Uuid, client_id: Uuid) -> Result<Client, ClientError> {
    self
      .client_repo
      .find_by_id(user_id, client_id)
      .await?
      .ok_or(ClientError::NotFound(client_id))
  }

  pub async fn list_clients(
    &self,
    user_id: Uuid,
    page: Page,
  ) -> Result<(Vec<Client>, i64), ClientError> {
    let clients = self.client_repo.list_by_user(user_id, page).await?;
    let total = self.client_repo.count_by_user(user_id).await?;
    Ok((clients, total))
  }

  pub async fn update_client(
    &self,
    user_id: Uuid,
    client_id: Uuid,
    mut update: ClientUpdate,
  ) -> Result<Client, ClientError> {
    let mut client = self.get_client(user_id, client_id).await?;

    if let Some(name) = update.business_name.take() {
      let name = required_text(name, "businessName", MAX_TEXT)?;
      if self
        .client_repo
        .exists_by_business_name(user_id, &name, Some(client_id))
        .await?
      {
        return Err(ClientError::BusinessNameAlreadyExists);
      }
      update.business_name = Some(name);
    }
    if let Some(industry) = update.client_industry.take() {
      update.client_industry = Some(required_text(industry, "clientIndustry", MAX_TEXT)?);
    }
    if let Some(email) = update.email.take() {
      update.email = Some(required_text(email, "email", MAX_TEXT)?);
    }

    client.apply(update);
    self.client_repo.update(client).await
  }

  pub async fn search_clients(&self, user_id: Uuid, query: &str) -> Result<Vec<Client>, ClientError> {
    let query = query.trim();
    if query.is_empty() {
      return Err(ClientError::InvalidInput(
        "Search query is required".to_string(),
      ));
    }

    let filter = ClientFilter {
      search: Some(query.to_string()),
      ..Default::default()
    };
    self.client_repo.filter(user_id, &filter).await
  }

  pub async fn filter_clients(
    &self,
    user_id: Uuid,
    filter: ClientFilter,
  ) -> Result<Vec<Client>, ClientError> {
    let normalize = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let filter = ClientFilter {
      search: normalize(filter.search),
      industry: normalize(filter.industry),
      city: normalize(filter.city),
    };
    self.client_repo.filter(user_id, &filter).await
  }

  /// Clients still billed on an invoice are kept; the invoices must go first
  pub async fn delete_client(&self, user_id: Uuid, client_id: Uuid) -> Result<(), ClientError> {
    if self.client_repo.find_by_id(user_id, client_id).await?.is_none() {
      return Err(ClientError::NotFound(client_id));
    }

    let invoices = self
      .invoice_repo
      .count(user_id, None, Some(client_id))
      .await
      .map_err(|e| ClientError::Repository(e.to_string()))?;
    if invoices > 0 {
      tracing::warn!(
        user_id = %user_id,
        client_id = %client_id,
        invoices,
        "Refusing to delete invoiced client"
      );
      return Err(ClientError::HasInvoices);
    }

    if !self.client_repo.delete(user_id, client_id).await? {
      return Err(ClientError::NotFound(client_id));
    }
    tracing::info!(user_id = %user_id, client_id = %client_id, "Client deleted");
    Ok(())
  }

  pub async fn count_clients(&self, user_id: Uuid) -> Result<i64, ClientError> {
    self.client_repo.count_by_user(user_id).await
  }
}

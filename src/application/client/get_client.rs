use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::client::{Client, ClientError, ClientService};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
  pub id: Uuid,
  pub business_name: String,
  pub client_industry: String,
  pub email: String,
  pub phone_number: Option<String>,
  pub country: Option<String>,
  pub city: Option<String>,
  pub zip_code: Option<String>,
  pub address: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientDto {
  fn from(client: Client) -> Self {
    Self {
      id: client.id,
      business_name: client.business_name,
      client_industry: client.client_industry,
      email: client.email,
      phone_number: client.phone_number,
      country: client.country,
      city: client.city,
      zip_code: client.zip_code,
      address: client.address,
      created_at: client.created_at,
      updated_at: client.updated_at,
    }
  }
}

pub struct GetClientUseCase {
  client_service: Arc<ClientService>,
}

impl GetClientUseCase {
  pub fn new(client_service: Arc<ClientService>) -> Self {
    Self { client_service }
  }

  pub async fn execute(&self, user_id: Uuid, client_id: Uuid) -> Result<ClientDto, ClientError> {
    let client = self.client_service.get_client(user_id, client_id).await?;
    Ok(client.into())
  }
}

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::client::{ClientError, ClientFilter, ClientService};

use super::get_client::ClientDto;

#[derive(Debug, Clone, Serialize)]
pub struct ClientsResponse {
  pub clients: Vec<ClientDto>,
}

/// Name search and combinable attribute filters
pub struct SearchClientsUseCase {
  client_service: Arc<ClientService>,
}

impl SearchClientsUseCase {
  pub fn new(client_service: Arc<ClientService>) -> Self {
    Self { client_service }
  }

  pub async fn search(
    &self,
    user_id: Uuid,
    query: Option<String>,
  ) -> Result<ClientsResponse, ClientError> {
    let clients = self
      .client_service
      .search_clients(user_id, query.as_deref().unwrap_or_default())
      .await?;
    Ok(ClientsResponse {
      clients: clients.into_iter().map(ClientDto::from).collect(),
    })
  }

  pub async fn filter(
    &self,
    user_id: Uuid,
    filter: ClientFilter,
  ) -> Result<ClientsResponse, ClientError> {
    let clients = self.client_service.filter_clients(user_id, filter).await?;
    Ok(ClientsResponse {
      clients: clients.into_iter().map(ClientDto::from).collect(),
    })
  }
}

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::invoice::PaginationDto;
use crate::domain::Page;
use crate::domain::client::{ClientError, ClientService};

use super::get_client::ClientDto;

#[derive(Debug, Clone, Default)]
pub struct ListClientsCommand {
  pub user_id: Uuid,
  pub page: Option<u32>,
  pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListClientsResponse {
  pub clients: Vec<ClientDto>,
  pub pagination: PaginationDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountClientsResponse {
  pub total_clients: i64,
}

pub struct ListClientsUseCase {
  client_service: Arc<ClientService>,
}

impl ListClientsUseCase {
  pub fn new(client_service: Arc<ClientService>) -> Self {
    Self { client_service }
  }

  pub async fn execute(&self, command: ListClientsCommand) -> Result<ListClientsResponse, ClientError> {
    let page = Page::new(command.page, command.limit);
    let (clients, total) = self
      .client_service
      .list_clients(command.user_id, page)
      .await?;

    Ok(ListClientsResponse {
      clients: clients.into_iter().map(ClientDto::from).collect(),
      pagination: PaginationDto {
        page: page.page,
        limit: page.limit,
        total,
      },
    })
  }

  pub async fn count(&self, user_id: Uuid) -> Result<CountClientsResponse, ClientError> {
    let total_clients = self.client_service.count_clients(user_id).await?;
    Ok(CountClientsResponse { total_clients })
  }
}

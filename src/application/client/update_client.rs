use std::sync::Arc;
use uuid::Uuid;

use crate::domain::client::{ClientError, ClientService, ClientUpdate};

use super::get_client::ClientDto;

#[derive(Debug, Clone)]
pub struct UpdateClientCommand {
  pub user_id: Uuid,
  pub client_id: Uuid,
  pub update: ClientUpdate,
}

pub struct UpdateClientUseCase {
  client_service: Arc<ClientService>,
}

impl UpdateClientUseCase {
  pub fn new(client_service: Arc<ClientService>) -> Self {
    Self { client_service }
  }

  pub async fn execute(&self, command: UpdateClientCommand) -> Result<ClientDto, ClientError> {
    let client = self
      .client_service
      .update_client(command.user_id, command.client_id, command.update)
      .await?;
    Ok(client.into())
  }
}

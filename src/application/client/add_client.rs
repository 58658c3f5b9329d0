use std::sync::Arc;
use uuid::Uuid;

use crate::domain::client::{ClientError, ClientService, NewClient};

use super::get_client::ClientDto;

#[derive(Debug, Clone)]
pub struct AddClientCommand {
  pub user_id: Uuid,
  pub client: NewClient,
}

pub struct AddClientUseCase {
  client_service: Arc<ClientService>,
}

impl AddClientUseCase {
  pub fn new(client_service: Arc<ClientService>) -> Self {
    Self { client_service }
  }

  pub async fn execute(&self, command: AddClientCommand) -> Result<ClientDto, ClientError> {
    let client = self
      .client_service
      .add_client(command.user_id, command.client)
      .await?;
    Ok(client.into())
  }
}

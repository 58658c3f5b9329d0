use std::sync::Arc;
use uuid::Uuid;

use crate::domain::client::{ClientError, ClientService};

pub struct DeleteClientUseCase {
  client_service: Arc<ClientService>,
}

impl DeleteClientUseCase {
  pub fn new(client_service: Arc<ClientService>) -> Self {
    Self { client_service }
  }

  pub async fn execute(&self, user_id: Uuid, client_id: Uuid) -> Result<(), ClientError> {
    self.client_service.delete_client(user_id, client_id).await
  }
}

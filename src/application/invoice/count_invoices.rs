use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Clone)]
pub struct CountCompletedInvoicesCommand {
  pub user_id: Uuid,
  pub client_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountCompletedInvoicesResponse {
  pub total_completed_invoices: i64,
}

pub struct CountCompletedInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CountCompletedInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: CountCompletedInvoicesCommand,
  ) -> Result<CountCompletedInvoicesResponse, InvoiceError> {
    let total_completed_invoices = self
      .invoice_service
      .count_completed(command.user_id, command.client_id)
      .await?;
    Ok(CountCompletedInvoicesResponse {
      total_completed_invoices,
    })
  }
}

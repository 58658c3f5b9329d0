use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService, InvoiceStatus};

use super::list_invoices::InvoiceListItemDto;

#[derive(Debug, Clone)]
pub struct FilterInvoicesCommand {
  pub user_id: Uuid,
  pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterInvoicesResponse {
  pub invoices: Vec<InvoiceListItemDto>,
}

pub struct FilterInvoicesByStatusUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl FilterInvoicesByStatusUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: FilterInvoicesCommand,
  ) -> Result<FilterInvoicesResponse, InvoiceError> {
    let status = command
      .status
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .ok_or_else(|| InvoiceError::Validation("Status is required".to_string()))?;
    let status = InvoiceStatus::from_str(status)?;

    let summaries = self
      .invoice_service
      .filter_by_status(command.user_id, status)
      .await?;

    Ok(FilterInvoicesResponse {
      invoices: summaries.into_iter().map(InvoiceListItemDto::from).collect(),
    })
  }
}

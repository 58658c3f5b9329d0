use chrono::NaiveDate;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoicePatch, InvoiceService, InvoiceStatus};

use super::create_invoice::{LineItemInput, parse_items};
use super::get_invoice::InvoiceDto;

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateInvoiceCommand {
  pub user_id: Uuid,
  pub invoice_id: Uuid,
  pub client_id: Option<Uuid>,
  pub items: Option<Vec<LineItemInput>>,
  pub issue_date: Option<NaiveDate>,
  pub due_date: Option<NaiveDate>,
  pub phone_number: Option<String>,
  pub email: Option<String>,
  pub account_id: Option<Uuid>,
  pub status: Option<String>,
}

pub struct UpdateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl UpdateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: UpdateInvoiceCommand) -> Result<InvoiceDto, InvoiceError> {
    let status = command
      .status
      .as_deref()
      .map(InvoiceStatus::from_str)
      .transpose()?;
    let items = command.items.map(parse_items).transpose()?;

    let invoice = self
      .invoice_service
      .update_invoice(
        command.user_id,
        command.invoice_id,
        InvoicePatch {
          client_id: command.client_id,
          items,
          issue_date: command.issue_date,
          due_date: command.due_date,
          phone_number: command.phone_number,
          email: command.email,
          account_id: command.account_id,
          status,
        },
      )
      .await?;

    Ok(invoice.into())
  }
}

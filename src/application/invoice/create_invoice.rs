use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService, InvoiceStatus, LineItem, NewInvoice};

use super::get_invoice::InvoiceDto;

#[derive(Debug, Clone)]
pub struct LineItemInput {
  pub item_name: String,
  pub quantity: Decimal,
  pub rate: Decimal,
  pub currency: String,
  pub description: Option<String>,
}

impl LineItemInput {
  pub(crate) fn into_line_item(self) -> Result<LineItem, InvoiceError> {
    Ok(LineItem::new(
      self.item_name,
      self.quantity,
      self.rate,
      self.currency,
      self.description,
    )?)
  }
}

pub(crate) fn parse_items(items: Vec<LineItemInput>) -> Result<Vec<LineItem>, InvoiceError> {
  items.into_iter().map(LineItemInput::into_line_item).collect()
}

#[derive(Debug, Clone)]
pub struct CreateInvoiceCommand {
  pub user_id: Uuid,
  pub client_id: Uuid,
  pub items: Vec<LineItemInput>,
  pub issue_date: Option<NaiveDate>,
  pub due_date: Option<NaiveDate>,
  pub phone_number: Option<String>,
  pub email: Option<String>,
  pub account_id: Option<Uuid>,
  pub status: Option<String>,
}

#[derive(Debug)]
pub struct CreateInvoiceResponse {
  pub message: String,
  pub invoice: InvoiceDto,
}

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: CreateInvoiceCommand,
  ) -> Result<CreateInvoiceResponse, InvoiceError> {
    let status = command
      .status
      .as_deref()
      .map(InvoiceStatus::from_str)
      .transpose()?;
    let items = parse_items(command.items)?;

    let invoice = self
      .invoice_service
      .create_invoice(
        command.user_id,
        NewInvoice {
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

    let message = match invoice.status {
      InvoiceStatus::Draft => "Invoice saved as draft",
      InvoiceStatus::Completed => "Invoice created successfully",
    };

    Ok(CreateInvoiceResponse {
      message: message.to_string(),
      invoice: invoice.into(),
    })
  }
}

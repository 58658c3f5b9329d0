use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Page;
use crate::domain::invoice::{
  InvoiceError, InvoiceListQuery, InvoiceService, InvoiceSortField, InvoiceSummary, SortOrder,
};

#[derive(Debug, Clone, Default)]
pub struct ListInvoicesCommand {
  pub user_id: Uuid,
  pub page: Option<u32>,
  pub limit: Option<u32>,
  pub sort_by: Option<String>,
  pub order: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListItemDto {
  pub id: Uuid,
  pub reference: Option<String>,
  pub invoice_number: String,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub total: Decimal,
  pub status: String,
  pub client_business_name: Option<String>,
}

impl From<InvoiceSummary> for InvoiceListItemDto {
  fn from(summary: InvoiceSummary) -> Self {
    Self {
      id: summary.id,
      reference: summary.reference,
      invoice_number: summary.invoice_number,
      issue_date: summary.issue_date,
      due_date: summary.due_date,
      total: summary.total,
      status: summary.status.as_str().to_string(),
      client_business_name: summary.client_business_name,
    }
  }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PaginationDto {
  pub page: u32,
  pub limit: u32,
  pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceListItemDto>,
  pub pagination: PaginationDto,
}

pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: ListInvoicesCommand,
  ) -> Result<ListInvoicesResponse, InvoiceError> {
    let sort_by = match command.sort_by.as_deref().filter(|s| !s.trim().is_empty()) {
      Some(value) => InvoiceSortField::from_str(value)?,
      None => InvoiceSortField::default(),
    };
    let order = match command.order.as_deref().filter(|s| !s.trim().is_empty()) {
      Some(value) => SortOrder::from_str(value)?,
      None => SortOrder::default(),
    };
    let page = Page::new(command.page, command.limit);

    let (summaries, total) = self
      .invoice_service
      .list_invoices(
        command.user_id,
        InvoiceListQuery {
          page: Some(page),
          sort_by,
          order,
          status: None,
        },
      )
      .await?;

    Ok(ListInvoicesResponse {
      invoices: summaries.into_iter().map(InvoiceListItemDto::from).collect(),
      pagination: PaginationDto {
        page: page.page,
        limit: page.limit,
        total,
      },
    })
  }
}

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{Invoice, InvoiceDocument, InvoiceError, InvoiceService, LineItem};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDto {
  pub item_name: String,
  pub quantity: Decimal,
  pub rate: Decimal,
  pub currency: String,
  pub description: Option<String>,
  pub amount: Decimal,
}

impl From<&LineItem> for LineItemDto {
  fn from(item: &LineItem) -> Self {
    Self {
      item_name: item.item_name.clone(),
      quantity: item.quantity,
      rate: item.rate,
      currency: item.currency.clone(),
      description: item.description.clone(),
      amount: item.amount(),
    }
  }
}

/// Invoice as returned by every invoice endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
  pub id: Uuid,
  pub invoice_number: String,
  pub reference: Option<String>,
  pub client_id: Uuid,
  pub company_id: Uuid,
  pub account_id: Option<Uuid>,
  pub account_number: Option<String>,
  pub items: Vec<LineItemDto>,
  pub sub_total: Decimal,
  pub tax: Decimal,
  pub total: Decimal,
  pub status: String,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub phone_number: Option<String>,
  pub email: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceDto {
  fn from(invoice: Invoice) -> Self {
    Self {
      id: invoice.id,
      invoice_number: invoice.invoice_number.into_inner(),
      reference: invoice.reference.map(|r| r.value().to_string()),
      client_id: invoice.client_id,
      company_id: invoice.company_id,
      account_id: invoice.account_id,
      account_number: invoice.account_number,
      items: invoice.items.iter().map(LineItemDto::from).collect(),
      sub_total: invoice.sub_total,
      tax: invoice.tax,
      total: invoice.total,
      status: invoice.status.as_str().to_string(),
      issue_date: invoice.issue_date,
      due_date: invoice.due_date,
      phone_number: invoice.phone_number,
      email: invoice.email,
      created_at: invoice.created_at,
      updated_at: invoice.updated_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceClientDto {
  pub id: Uuid,
  pub business_name: String,
  pub email: String,
  pub phone_number: Option<String>,
  pub address: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCompanyDto {
  pub id: Uuid,
  pub company_name: Option<String>,
  pub company_logo: Option<String>,
  pub tax_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceAccountDto {
  pub id: Uuid,
  pub bank_name: String,
  pub account_name: String,
  pub account_number: String,
  pub swift_code: Option<String>,
}

/// Populated view: the invoice with its parties resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetailsResponse {
  pub invoice: InvoiceDto,
  pub client: InvoiceClientDto,
  pub company: InvoiceCompanyDto,
  pub account: Option<InvoiceAccountDto>,
}

impl From<InvoiceDocument> for InvoiceDetailsResponse {
  fn from(document: InvoiceDocument) -> Self {
    let InvoiceDocument {
      invoice,
      client,
      company,
      account,
      ..
    } = document;

    Self {
      invoice: invoice.into(),
      client: InvoiceClientDto {
        id: client.id,
        address: client.address_line(),
        business_name: client.business_name,
        email: client.email,
        phone_number: client.phone_number,
      },
      company: InvoiceCompanyDto {
        id: company.id,
        company_name: company.company_name,
        company_logo: company.company_logo,
        tax_id: company.tax_id,
      },
      account: account.map(|a| InvoiceAccountDto {
        id: a.id,
        bank_name: a.bank_name,
        account_name: a.account_name,
        account_number: a.account_number.into_inner(),
        swift_code: a.swift_code,
      }),
    }
  }
}

pub struct GetInvoiceCommand {
  pub user_id: Uuid,
  pub invoice_id: Uuid,
}

pub struct GetInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: GetInvoiceCommand,
  ) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let document = self
      .invoice_service
      .get_invoice_document(command.user_id, command.invoice_id)
      .await?;
    Ok(document.into())
  }
}

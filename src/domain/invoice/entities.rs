use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::Page;
use crate::domain::auth::User;
use crate::domain::client::Client;
use crate::domain::company::{Account, Company};

use super::calculator::InvoiceTotals;
use super::errors::InvoiceError;
use super::value_objects::{
  InvoiceNumber, InvoiceReference, InvoiceStatus, LineItem, ValueObjectError,
};

// Invoice - Main invoice document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: Uuid,
  pub user_id: Uuid,
  pub company_id: Uuid,
  pub client_id: Uuid,
  pub account_id: Option<Uuid>,
  /// Account number captured when the account was linked
  pub account_number: Option<String>,
  pub invoice_number: InvoiceNumber,
  pub reference: Option<InvoiceReference>,
  pub items: Vec<LineItem>,
  pub sub_total: Decimal,
  pub tax: Decimal,
  pub total: Decimal,
  pub status: InvoiceStatus,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub phone_number: Option<String>,
  pub email: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Everything needed to build a new invoice row besides the generated number
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
  pub user_id: Uuid,
  pub company_id: Uuid,
  pub client_id: Uuid,
  pub account: Option<(Uuid, String)>,
  pub reference: InvoiceReference,
  pub items: Vec<LineItem>,
  pub totals: InvoiceTotals,
  pub status: InvoiceStatus,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub phone_number: Option<String>,
  pub email: Option<String>,
}

impl Invoice {
  pub fn new(draft: InvoiceDraft, invoice_number: InvoiceNumber) -> Self {
    let now = Utc::now();
    let (account_id, account_number) = match draft.account {
      Some((id, number)) => (Some(id), Some(number)),
      None => (None, None),
    };

    Self {
      id: Uuid::new_v4(),
      user_id: draft.user_id,
      company_id: draft.company_id,
      client_id: draft.client_id,
      account_id,
      account_number,
      invoice_number,
      reference: Some(draft.reference),
      items: draft.items,
      sub_total: draft.totals.sub_total,
      tax: draft.totals.tax,
      total: draft.totals.total,
      status: draft.status,
      issue_date: draft.issue_date,
      due_date: draft.due_date,
      phone_number: draft.phone_number,
      email: draft.email,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn is_editable(&self) -> bool {
    self.status.is_editable()
  }

  pub fn totals(&self) -> InvoiceTotals {
    InvoiceTotals {
      sub_total: self.sub_total,
      tax: self.tax,
      total: self.total,
    }
  }

  /// Applies an already validated patch
  ///
  /// The status gate is checked again here so no caller can mutate a Completed invoice.
  pub fn apply(&mut self, patch: ResolvedInvoicePatch) -> Result<(), InvoiceError> {
    if !self.is_editable() {
      return Err(InvoiceError::InvalidState);
    }
    if let Some(status) = patch.status {
      if !self.status.can_transition_to(status) {
        return Err(InvoiceError::InvalidState);
      }
    }

    if let Some((items, totals)) = patch.items {
      self.items = items;
      self.sub_total = totals.sub_total;
      self.tax = totals.tax;
      self.total = totals.total;
    }
    if let Some(client_id) = patch.client_id {
      self.client_id = client_id;
    }
    if let Some((account_id, account_number)) = patch.account {
      self.account_id = Some(account_id);
      self.account_number = Some(account_number);
    }
    if let Some(issue_date) = patch.issue_date {
      self.issue_date = issue_date;
    }
    if let Some(due_date) = patch.due_date {
      self.due_date = due_date;
    }
    if patch.phone_number.is_some() {
      self.phone_number = patch.phone_number;
    }
    if patch.email.is_some() {
      self.email = patch.email;
    }
    if let Some(status) = patch.status {
      self.status = status;
    }
    self.updated_at = Utc::now();
    Ok(())
  }
}

/// Partial invoice update as requested by a caller; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoicePatch {
  pub client_id: Option<Uuid>,
  pub items: Option<Vec<LineItem>>,
  pub issue_date: Option<NaiveDate>,
  pub due_date: Option<NaiveDate>,
  pub phone_number: Option<String>,
  pub email: Option<String>,
  pub account_id: Option<Uuid>,
  pub status: Option<InvoiceStatus>,
}

/// Patch after references were resolved and totals recomputed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedInvoicePatch {
  pub client_id: Option<Uuid>,
  pub items: Option<(Vec<LineItem>, InvoiceTotals)>,
  pub issue_date: Option<NaiveDate>,
  pub due_date: Option<NaiveDate>,
  pub phone_number: Option<String>,
  pub email: Option<String>,
  pub account: Option<(Uuid, String)>,
  pub status: Option<InvoiceStatus>,
}

/// List row: an invoice joined with its client's display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
  pub id: Uuid,
  pub reference: Option<String>,
  pub invoice_number: String,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub total: Decimal,
  pub status: InvoiceStatus,
  pub client_business_name: Option<String>,
}

impl InvoiceSummary {
  pub fn new(invoice: &Invoice, client_business_name: Option<String>) -> Self {
    Self {
      id: invoice.id,
      reference: invoice.reference.as_ref().map(|r| r.value().to_string()),
      invoice_number: invoice.invoice_number.value().to_string(),
      issue_date: invoice.issue_date,
      due_date: invoice.due_date,
      total: invoice.total,
      status: invoice.status,
      client_business_name,
    }
  }
}

/// Populated view of an invoice used for presentation only, never persisted
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
  pub invoice: Invoice,
  pub user: User,
  pub company: Company,
  pub client: Client,
  pub account: Option<Account>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvoiceSortField {
  #[default]
  IssueDate,
  DueDate,
  Total,
  CreatedAt,
  InvoiceNumber,
}

impl InvoiceSortField {
  /// Column name in the invoices table
  pub fn column(&self) -> &'static str {
    match self {
      InvoiceSortField::IssueDate => "issue_date",
      InvoiceSortField::DueDate => "due_date",
      InvoiceSortField::Total => "total",
      InvoiceSortField::CreatedAt => "created_at",
      InvoiceSortField::InvoiceNumber => "invoice_number",
    }
  }
}

impl FromStr for InvoiceSortField {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "issueDate" | "issue_date" => Ok(InvoiceSortField::IssueDate),
      "dueDate" | "due_date" => Ok(InvoiceSortField::DueDate),
      "total" => Ok(InvoiceSortField::Total),
      "createdAt" | "created_at" => Ok(InvoiceSortField::CreatedAt),
      "invoiceNumber" | "invoice_number" => Ok(InvoiceSortField::InvoiceNumber),
      _ => Err(ValueObjectError::InvalidSort(format!(
        "Unknown sort field: {}",
        s
      ))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
  Asc,
  #[default]
  Desc,
}

impl SortOrder {
  pub fn as_sql(&self) -> &'static str {
    match self {
      SortOrder::Asc => "ASC",
      SortOrder::Desc => "DESC",
    }
  }
}

impl FromStr for SortOrder {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "asc" => Ok(SortOrder::Asc),
      "desc" => Ok(SortOrder::Desc),
      _ => Err(ValueObjectError::InvalidSort(format!(
        "Unknown sort order: {}",
        s
      ))),
    }
  }
}

/// Owner-scoped list request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvoiceListQuery {
  /// `None` returns every match
  pub page: Option<Page>,
  pub sort_by: InvoiceSortField,
  pub order: SortOrder,
  pub status: Option<InvoiceStatus>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn draft() -> InvoiceDraft {
    let items = vec![LineItem::new("Design", dec!(2), dec!(50), "USD", None).unwrap()];
    InvoiceDraft {
      user_id: Uuid::new_v4(),
      company_id: Uuid::new_v4(),
      client_id: Uuid::new_v4(),
      account: None,
      reference: InvoiceReference::generate(),
      items,
      totals: InvoiceTotals {
        sub_total: dec!(100),
        tax: dec!(10),
        total: dec!(110),
      },
      status: InvoiceStatus::Draft,
      issue_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
      due_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
      phone_number: None,
      email: None,
    }
  }

  fn invoice() -> Invoice {
    Invoice::new(draft(), InvoiceNumber::from_digits(123456).unwrap())
  }

  #[test]
  fn test_new_invoice_copies_totals() {
    let invoice = invoice();
    assert_eq!(invoice.sub_total, dec!(100));
    assert_eq!(invoice.total, dec!(110));
    assert_eq!(invoice.status, InvoiceStatus::Draft);
    assert!(invoice.reference.is_some());
    assert!(invoice.account_id.is_none());
  }

  #[test]
  fn test_apply_patch_keeps_omitted_fields() {
    let mut invoice = invoice();
    let original_issue = invoice.issue_date;

    invoice
      .apply(ResolvedInvoicePatch {
        email: Some(String::new()),
        due_date: NaiveDate::from_ymd_opt(2024, 2, 15),
        ..Default::default()
      })
      .unwrap();

    assert_eq!(invoice.issue_date, original_issue);
    assert_eq!(invoice.due_date, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
    // An explicit empty string is a value, not "not provided"
    assert_eq!(invoice.email.as_deref(), Some(""));
  }

  #[test]
  fn test_apply_rejects_completed_invoice() {
    let mut invoice = invoice();
    invoice
      .apply(ResolvedInvoicePatch {
        status: Some(InvoiceStatus::Completed),
        ..Default::default()
      })
      .unwrap();
    let snapshot = invoice.clone();

    let result = invoice.apply(ResolvedInvoicePatch {
      email: Some("late@example.com".to_string()),
      ..Default::default()
    });
    assert!(matches!(result, Err(InvoiceError::InvalidState)));
    assert_eq!(invoice, snapshot);
  }

  #[test]
  fn test_sort_parsing() {
    assert_eq!(
      "issueDate".parse::<InvoiceSortField>().unwrap(),
      InvoiceSortField::IssueDate
    );
    assert_eq!("total".parse::<InvoiceSortField>().unwrap().column(), "total");
    assert!("password".parse::<InvoiceSortField>().is_err());
    assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
    assert!("sideways".parse::<SortOrder>().is_err());
  }

  #[test]
  fn test_summary_projection() {
    let invoice = invoice();
    let summary = InvoiceSummary::new(&invoice, Some("Globex".to_string()));
    assert_eq!(summary.invoice_number, "#INV_123456");
    assert_eq!(summary.total, dec!(110));
    assert_eq!(summary.client_business_name.as_deref(), Some("Globex"));
  }
}

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::invoice::{
  Invoice, InvoiceError, InvoiceListQuery, InvoiceRepository, InvoiceSortField, InvoiceStatus,
  SortOrder,
};

use super::paginate;

/// Enforces invoice number uniqueness the way the unique index does
#[derive(Default)]
pub struct InMemoryInvoiceRepository {
  invoices: RwLock<HashMap<Uuid, Invoice>>,
}

impl InMemoryInvoiceRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

fn compare(a: &Invoice, b: &Invoice, field: InvoiceSortField) -> Ordering {
  match field {
    InvoiceSortField::IssueDate => a.issue_date.cmp(&b.issue_date),
    InvoiceSortField::DueDate => a.due_date.cmp(&b.due_date),
    InvoiceSortField::Total => a.total.cmp(&b.total),
    InvoiceSortField::CreatedAt => a.created_at.cmp(&b.created_at),
    InvoiceSortField::InvoiceNumber => a.invoice_number.value().cmp(b.invoice_number.value()),
  }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    let mut invoices = self.invoices.write().await;
    if invoices
      .values()
      .any(|i| i.invoice_number == invoice.invoice_number)
    {
      return Err(InvoiceError::DuplicateInvoiceNumber(
        invoice.invoice_number.into_inner(),
      ));
    }
    invoices.insert(invoice.id, invoice.clone());
    Ok(invoice)
  }

  async fn update(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    let mut invoices = self.invoices.write().await;
    match invoices.get_mut(&invoice.id) {
      Some(slot) if slot.user_id == invoice.user_id => {
        *slot = invoice.clone();
        Ok(invoice)
      }
      _ => Err(InvoiceError::InvoiceNotFound(invoice.id)),
    }
  }

  async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    Ok(
      self
        .invoices
        .read()
        .await
        .get(&id)
        .filter(|i| i.user_id == user_id)
        .cloned(),
    )
  }

  async fn find_many(&self, user_id: Uuid, ids: &[Uuid]) -> Result<Vec<Invoice>, InvoiceError> {
    let invoices = self.invoices.read().await;
    Ok(
      ids
        .iter()
        .filter_map(|id| invoices.get(id))
        .filter(|i| i.user_id == user_id)
        .cloned()
        .collect(),
    )
  }

  async fn list(
    &self,
    user_id: Uuid,
    query: &InvoiceListQuery,
  ) -> Result<Vec<Invoice>, InvoiceError> {
    let mut rows: Vec<Invoice> = self
      .invoices
      .read()
      .await
      .values()
      .filter(|i| i.user_id == user_id)
      .filter(|i| query.status.is_none_or(|s| i.status == s))
      .cloned()
      .collect();

    rows.sort_by(|a, b| {
      let ordering = compare(a, b, query.sort_by).then_with(|| a.created_at.cmp(&b.created_at));
      match query.order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
      }
    });

    Ok(match query.page {
      Some(page) => paginate(rows, page),
      None => rows,
    })
  }

  async fn count(
    &self,
    user_id: Uuid,
    status: Option<InvoiceStatus>,
    client_id: Option<Uuid>,
  ) -> Result<i64, InvoiceError> {
    let invoices = self.invoices.read().await;
    Ok(
      invoices
        .values()
        .filter(|i| i.user_id == user_id)
        .filter(|i| status.is_none_or(|s| i.status == s))
        .filter(|i| client_id.is_none_or(|c| i.client_id == c))
        .count() as i64,
    )
  }

  async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, InvoiceError> {
    let mut invoices = self.invoices.write().await;
    if invoices.get(&id).is_some_and(|i| i.user_id == user_id) {
      invoices.remove(&id);
      return Ok(true);
    }
    Ok(false)
  }
}

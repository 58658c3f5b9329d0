use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;

use super::entities::{Invoice, InvoiceDocument, InvoiceListQuery};
use super::errors::InvoiceError;
use super::value_objects::InvoiceStatus;

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  /// Fails with `DuplicateInvoiceNumber` when the number is already taken
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError>;
  async fn update(&self, invoice: Invoice) -> Result<Invoice, InvoiceError>;
  /// Looks an invoice up by id, restricted to the owning user
  async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Invoice>, InvoiceError>;
  /// Invoices among `ids` owned by `user_id`, in no particular order
  async fn find_many(&self, user_id: Uuid, ids: &[Uuid]) -> Result<Vec<Invoice>, InvoiceError>;
  async fn list(
    &self,
    user_id: Uuid,
    query: &InvoiceListQuery,
  ) -> Result<Vec<Invoice>, InvoiceError>;
  async fn count(
    &self,
    user_id: Uuid,
    status: Option<InvoiceStatus>,
    client_id: Option<Uuid>,
  ) -> Result<i64, InvoiceError>;
  /// Returns `false` when nothing matched
  async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, InvoiceError>;
}

/// Turns a populated invoice into a document on disk
#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
  /// Writes the document and returns its path
  async fn render(&self, document: &InvoiceDocument) -> Result<PathBuf, InvoiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
  pub filename: String,
  pub content_type: String,
  pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
  pub to: String,
  pub subject: String,
  pub html_body: String,
  pub attachments: Vec<EmailAttachment>,
}

/// Outbound mail transport
#[async_trait]
pub trait EmailSender: Send + Sync {
  async fn send(&self, email: OutgoingEmail) -> Result<(), InvoiceError>;
}

/// Renders the HTML body of the share notification
pub trait ShareEmailTemplate: Send + Sync {
  fn render_share_invoice(
    &self,
    first_name: &str,
    attachments: &[String],
  ) -> Result<String, InvoiceError>;
}

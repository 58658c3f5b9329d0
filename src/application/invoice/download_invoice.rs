use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceRenderer, InvoiceService};

#[derive(Debug, Clone)]
pub struct DownloadInvoiceCommand {
  pub user_id: Uuid,
  pub invoice_id: Uuid,
}

#[derive(Debug)]
pub struct DownloadedInvoice {
  /// Name offered to the client in `Content-Disposition`
  pub filename: String,
  pub path: PathBuf,
  pub content: Vec<u8>,
}

pub struct DownloadInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
  renderer: Arc<dyn InvoiceRenderer>,
}

impl DownloadInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, renderer: Arc<dyn InvoiceRenderer>) -> Self {
    Self {
      invoice_service,
      renderer,
    }
  }

  pub async fn execute(
    &self,
    command: DownloadInvoiceCommand,
  ) -> Result<DownloadedInvoice, InvoiceError> {
    let document = self
      .invoice_service
      .get_invoice_document(command.user_id, command.invoice_id)
      .await?;

    let path = self.renderer.render(&document).await?;
    let content = tokio::fs::read(&path)
      .await
      .map_err(|e| InvoiceError::Render(format!("Failed to read rendered invoice: {}", e)))?;

    Ok(DownloadedInvoice {
      filename: document.invoice.invoice_number.attachment_file_name(),
      path,
      content,
    })
  }
}

use futures_util::{StreamExt, TryStreamExt, stream};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::domain::invoice::{
  EmailAttachment, EmailSender, InvoiceError, InvoiceRenderer, InvoiceService, OutgoingEmail,
  ShareEmailTemplate,
};

pub const SHARE_SUBJECT: &str = "Invoice sent";
/// Renders in flight at once for a single share request
pub const MAX_CONCURRENT_RENDERS: usize = 4;

#[derive(Debug, Clone)]
pub struct ShareInvoicesCommand {
  pub user_id: Uuid,
  pub first_name: String,
  /// Comma separated invoice ids as received in the path
  pub invoice_ids: String,
  pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SharedFileDto {
  pub filename: String,
  pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareInvoicesResponse {
  pub files: Vec<SharedFileDto>,
}

pub struct ShareInvoicesDependencies {
  pub invoice_service: Arc<InvoiceService>,
  pub renderer: Arc<dyn InvoiceRenderer>,
  pub email_sender: Arc<dyn EmailSender>,
  pub template: Arc<dyn ShareEmailTemplate>,
}

pub struct ShareInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
  renderer: Arc<dyn InvoiceRenderer>,
  email_sender: Arc<dyn EmailSender>,
  template: Arc<dyn ShareEmailTemplate>,
}

/// Parses a comma separated id list
///
/// Malformed entries are skipped with a warning; repeats keep their first position.
pub fn parse_invoice_ids(raw: &str) -> Vec<Uuid> {
  let mut seen = HashSet::new();
  raw
    .split(',')
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .filter_map(|part| match Uuid::parse_str(part) {
      Ok(id) => Some(id),
      Err(_) => {
        tracing::warn!(invoice_id = %part, "Dropping malformed invoice id from share request");
        None
      }
    })
    .filter(|id| seen.insert(*id))
    .collect()
}

impl ShareInvoicesUseCase {
  pub fn new(deps: ShareInvoicesDependencies) -> Self {
    Self {
      invoice_service: deps.invoice_service,
      renderer: deps.renderer,
      email_sender: deps.email_sender,
      template: deps.template,
    }
  }

  pub async fn execute(
    &self,
    command: ShareInvoicesCommand,
  ) -> Result<ShareInvoicesResponse, InvoiceError> {
    let recipient = command.email.trim().to_string();
    if !recipient.validate_email() {
      return Err(InvoiceError::Validation("Invalid email address".to_string()));
    }

    let ids = parse_invoice_ids(&command.invoice_ids);
    if ids.is_empty() {
      return Err(InvoiceError::Validation(
        "Invalid invoice IDs provided".to_string(),
      ));
    }

    let documents = self
      .invoice_service
      .resolve_documents(command.user_id, &ids)
      .await?;

    // Every invoice must render before anything is sent
    let paths: Vec<_> = stream::iter(documents.iter().map(|document| self.renderer.render(document)))
      .buffered(MAX_CONCURRENT_RENDERS)
      .try_collect()
      .await?;

    let mut attachments = Vec::with_capacity(paths.len());
    let mut files = Vec::with_capacity(paths.len());
    for (document, path) in documents.iter().zip(&paths) {
      let filename = document.invoice.invoice_number.attachment_file_name();
      let content = tokio::fs::read(path)
        .await
        .map_err(|e| InvoiceError::Render(format!("Failed to read rendered invoice: {}", e)))?;

      attachments.push(EmailAttachment {
        filename: filename.clone(),
        content_type: "application/pdf".to_string(),
        content,
      });
      files.push(SharedFileDto {
        filename,
        path: path.display().to_string(),
      });
    }

    let names: Vec<String> = files.iter().map(|f| f.filename.clone()).collect();
    let html_body = self
      .template
      .render_share_invoice(&command.first_name, &names)?;

    self
      .email_sender
      .send(OutgoingEmail {
        to: recipient.clone(),
        subject: SHARE_SUBJECT.to_string(),
        html_body,
        attachments,
      })
      .await?;

    tracing::info!(
      user_id = %command.user_id,
      to = %recipient,
      invoices = files.len(),
      "Invoices shared"
    );
    Ok(ShareInvoicesResponse { files })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use chrono::NaiveDate;
  use rust_decimal_macros::dec;
  use std::path::PathBuf;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use tempfile::TempDir;

  use crate::domain::auth::User;
  use crate::domain::client::Client;
  use crate::domain::company::Company;
  use crate::domain::invoice::{
    InvoiceCalculator, InvoiceDocument, InvoiceServiceConfig, InvoiceServiceDependencies,
    LineItem, NewInvoice, RandomInvoiceNumberGenerator,
  };
  use crate::infrastructure::email::RecordingEmailSender;
  use crate::infrastructure::persistence::Repositories;

  /// Writes a stub file per document and fails on the `fail_on`th call
  struct FlakyRenderer {
    dir: TempDir,
    calls: AtomicUsize,
    fail_on: usize,
  }

  impl FlakyRenderer {
    fn failing_on(fail_on: usize) -> Self {
      Self {
        dir: tempfile::tempdir().unwrap(),
        calls: AtomicUsize::new(0),
        fail_on,
      }
    }
  }

  #[async_trait]
  impl InvoiceRenderer for FlakyRenderer {
    async fn render(&self, document: &InvoiceDocument) -> Result<PathBuf, InvoiceError> {
      let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
      if call == self.fail_on {
        return Err(InvoiceError::Render("disk full".to_string()));
      }
      let path = self
        .dir
        .path()
        .join(format!("{}.pdf", document.invoice.id));
      tokio::fs::write(&path, b"%PDF-1.3").await.unwrap();
      Ok(path)
    }
  }

  struct RefusingSender;

  #[async_trait]
  impl EmailSender for RefusingSender {
    async fn send(&self, _email: OutgoingEmail) -> Result<(), InvoiceError> {
      Err(InvoiceError::Email("connection refused".to_string()))
    }
  }

  struct PlainTemplate;

  impl ShareEmailTemplate for PlainTemplate {
    fn render_share_invoice(
      &self,
      first_name: &str,
      attachments: &[String],
    ) -> Result<String, InvoiceError> {
      Ok(format!("{} sent {}", first_name, attachments.join(", ")))
    }
  }

  /// One user with two invoices for the same client
  async fn seeded_service() -> (Arc<InvoiceService>, Uuid, Vec<Uuid>) {
    let repos = Repositories::in_memory();
    let user = repos
      .users
      .create(User::new(
        "Ada".to_string(),
        "Lovelace".to_string(),
        "ada@example.com".to_string(),
      ))
      .await
      .unwrap();
    repos.companies.upsert(Company::new(user.id)).await.unwrap();
    let client = repos
      .clients
      .create(Client::new(
        user.id,
        "Globex".to_string(),
        "Retail".to_string(),
        "ap@globex.test".to_string(),
      ))
      .await
      .unwrap();

    let service = Arc::new(InvoiceService::new(InvoiceServiceDependencies {
      invoice_repo: repos.invoices.clone(),
      client_repo: repos.clients.clone(),
      company_repo: repos.companies.clone(),
      account_repo: repos.accounts.clone(),
      user_repo: repos.users.clone(),
      calculator: InvoiceCalculator::default(),
      number_generator: Arc::new(RandomInvoiceNumberGenerator::seeded(11)),
      config: InvoiceServiceConfig::default(),
    }));

    let mut ids = Vec::new();
    for rate in [dec!(100), dec!(250)] {
      let invoice = service
        .create_invoice(
          user.id,
          NewInvoice {
            client_id: client.id,
            items: vec![LineItem::new("Design", dec!(1), rate, "USD", None).unwrap()],
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
          },
        )
        .await
        .unwrap();
      ids.push(invoice.id);
    }
    (service, user.id, ids)
  }

  fn command(user_id: Uuid, ids: &[Uuid]) -> ShareInvoicesCommand {
    ShareInvoicesCommand {
      user_id,
      first_name: "Ada".to_string(),
      invoice_ids: ids
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(","),
      email: "client@globex.test".to_string(),
    }
  }

  #[tokio::test]
  async fn test_render_failure_sends_nothing() {
    let (service, user_id, ids) = seeded_service().await;
    let sender = Arc::new(RecordingEmailSender::new());
    let use_case = ShareInvoicesUseCase::new(ShareInvoicesDependencies {
      invoice_service: service,
      renderer: Arc::new(FlakyRenderer::failing_on(2)),
      email_sender: sender.clone(),
      template: Arc::new(PlainTemplate),
    });

    let result = use_case.execute(command(user_id, &ids)).await;

    assert!(matches!(result, Err(InvoiceError::Render(_))));
    assert!(sender.sent().await.is_empty());
  }

  #[tokio::test]
  async fn test_all_rendered_invoices_go_out_in_one_email() {
    let (service, user_id, ids) = seeded_service().await;
    let sender = Arc::new(RecordingEmailSender::new());
    let use_case = ShareInvoicesUseCase::new(ShareInvoicesDependencies {
      invoice_service: service,
      renderer: Arc::new(FlakyRenderer::failing_on(usize::MAX)),
      email_sender: sender.clone(),
      template: Arc::new(PlainTemplate),
    });

    let response = use_case.execute(command(user_id, &ids)).await.unwrap();

    let sent = sender.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "client@globex.test");
    assert_eq!(sent[0].subject, SHARE_SUBJECT);
    assert_eq!(sent[0].attachments.len(), 2);
    assert_eq!(response.files.len(), 2);
    assert!(
      response
        .files
        .iter()
        .all(|f| f.filename.starts_with("invoice_#INV_") && f.filename.ends_with(".pdf"))
    );
  }

  #[tokio::test]
  async fn test_transport_failure_is_email_error() {
    let (service, user_id, ids) = seeded_service().await;
    let use_case = ShareInvoicesUseCase::new(ShareInvoicesDependencies {
      invoice_service: service,
      renderer: Arc::new(FlakyRenderer::failing_on(usize::MAX)),
      email_sender: Arc::new(RefusingSender),
      template: Arc::new(PlainTemplate),
    });

    let result = use_case.execute(command(user_id, &ids)).await;
    assert!(matches!(result, Err(InvoiceError::Email(m)) if m.contains("connection refused")));
  }

  #[test]
  fn test_parse_invoice_ids_drops_malformed_and_repeats() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let raw = format!("{a}, not-a-uuid,{b},{a},,");

    assert_eq!(parse_invoice_ids(&raw), vec![a, b]);
  }

  #[test]
  fn test_parse_invoice_ids_all_invalid() {
    assert!(parse_invoice_ids("x,y,123").is_empty());
    assert!(parse_invoice_ids("").is_empty());
  }
}

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::invoice::{EmailSender, InvoiceError, OutgoingEmail};

/// Keeps outgoing mail in memory instead of delivering it
///
/// Used when SMTP is disabled and by tests that assert on sent mail.
#[derive(Default)]
pub struct RecordingEmailSender {
  sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingEmailSender {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn sent(&self) -> Vec<OutgoingEmail> {
    self.sent.lock().await.clone()
  }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
  async fn send(&self, email: OutgoingEmail) -> Result<(), InvoiceError> {
    tracing::info!(
      to = %email.to,
      subject = %email.subject,
      attachments = email.attachments.len(),
      "Email delivery disabled, message recorded"
    );
    self.sent.lock().await.push(email);
    Ok(())
  }
}

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::invoice::{EmailSender, InvoiceError, OutgoingEmail};
use crate::infrastructure::config::EmailConfig;

/// Delivers mail through an authenticated STARTTLS relay
pub struct SmtpEmailSender {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from: Mailbox,
}

impl SmtpEmailSender {
  pub fn new(config: &EmailConfig) -> Result<Self, InvoiceError> {
    let credentials = Credentials::new(config.username.clone(), config.password.clone());

    let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
      .map_err(|e| InvoiceError::Email(format!("Failed to create SMTP relay: {}", e)))?
      .port(config.port)
      .credentials(credentials)
      .build();

    let from = format!("{} <{}>", config.from_name, config.from_email)
      .parse::<Mailbox>()
      .map_err(|e| InvoiceError::Email(format!("Invalid from address: {}", e)))?;

    Ok(Self { transport, from })
  }

  fn build_message(&self, email: OutgoingEmail) -> Result<Message, InvoiceError> {
    let to = email
      .to
      .parse::<Mailbox>()
      .map_err(|e| InvoiceError::Email(format!("Invalid recipient: {}", e)))?;

    let mut body = MultiPart::mixed().singlepart(
      SinglePart::builder()
        .header(ContentType::TEXT_HTML)
        .body(email.html_body),
    );
    for attachment in email.attachments {
      let content_type = ContentType::parse(&attachment.content_type)
        .map_err(|e| InvoiceError::Email(format!("Invalid attachment type: {}", e)))?;
      body = body.singlepart(Attachment::new(attachment.filename).body(attachment.content, content_type));
    }

    Message::builder()
      .from(self.from.clone())
      .to(to)
      .subject(email.subject)
      .multipart(body)
      .map_err(|e| InvoiceError::Email(format!("Failed to build message: {}", e)))
  }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
  async fn send(&self, email: OutgoingEmail) -> Result<(), InvoiceError> {
    let recipient = email.to.clone();
    let message = self.build_message(email)?;

    self
      .transport
      .send(message)
      .await
      .map_err(|e| InvoiceError::Email(e.to_string()))?;

    tracing::info!(to = %recipient, "Email sent");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::EmailAttachment;

  fn config() -> EmailConfig {
    EmailConfig {
      enabled: true,
      host: "smtp.example.com".to_string(),
      port: 587,
      username: "mailer".to_string(),
      password: "secret".to_string(),
      from_email: "billing@example.com".to_string(),
      from_name: "Billing".to_string(),
    }
  }

  fn email(to: &str) -> OutgoingEmail {
    OutgoingEmail {
      to: to.to_string(),
      subject: "Invoice sent".to_string(),
      html_body: "<p>Hello</p>".to_string(),
      attachments: vec![EmailAttachment {
        filename: "invoice_#INV_123456.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        content: b"%PDF-1.3".to_vec(),
      }],
    }
  }

  #[tokio::test]
  async fn test_message_carries_attachment() {
    let sender = SmtpEmailSender::new(&config()).unwrap();
    let message = sender.build_message(email("ada@example.com")).unwrap();
    let raw = String::from_utf8_lossy(&message.formatted()).to_string();

    assert!(raw.contains("Subject: Invoice sent"));
    assert!(raw.contains("application/pdf"));
    assert!(raw.contains("invoice_#INV_123456.pdf"));
  }

  #[tokio::test]
  async fn test_invalid_recipient_is_email_error() {
    let sender = SmtpEmailSender::new(&config()).unwrap();
    assert!(matches!(
      sender.build_message(email("not an address")),
      Err(InvoiceError::Email(_))
    ));
  }
}

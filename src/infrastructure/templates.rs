use std::path::Path;
use std::sync::Arc;
use tera::Tera;

use crate::domain::invoice::{InvoiceError, ShareEmailTemplate};

pub const SHARE_INVOICE_TEMPLATE: &str = "emails/share_invoice.html.tera";
const SHARE_INVOICE_TITLE: &str = "Invoice sent successfully";

/// Template engine wrapper for rendering HTML email bodies
#[derive(Clone)]
pub struct TemplateEngine {
  tera: Arc<Tera>,
}

impl TemplateEngine {
  /// Loads every `*.html.tera` file under `templates/` relative to the working directory
  pub fn new() -> Result<Self, tera::Error> {
    Self::from_dir("templates")
  }

  pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, tera::Error> {
    let glob = format!("{}/**/*.html.tera", dir.as_ref().display());
    let mut tera = Tera::new(&glob)?;
    tera.autoescape_on(vec!["html.tera", ".html"]);

    Ok(Self {
      tera: Arc::new(tera),
    })
  }

  /// Render a template with the given context
  pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, tera::Error> {
    self.tera.render(template, context)
  }
}

impl ShareEmailTemplate for TemplateEngine {
  fn render_share_invoice(
    &self,
    first_name: &str,
    attachments: &[String],
  ) -> Result<String, InvoiceError> {
    let mut context = tera::Context::new();
    context.insert("title", SHARE_INVOICE_TITLE);
    context.insert("first_name", first_name);
    context.insert("attachments", attachments);

    self
      .render(SHARE_INVOICE_TEMPLATE, &context)
      .map_err(|e| InvoiceError::Internal(format!("Error rendering email template: {}", e)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn engine() -> TemplateEngine {
    TemplateEngine::from_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"))
      .expect("templates should load")
  }

  #[test]
  fn test_share_invoice_lists_attachments() {
    let html = engine()
      .render_share_invoice(
        "Ada",
        &[
          "invoice_#INV_123456.pdf".to_string(),
          "invoice_#INV_654321.pdf".to_string(),
        ],
      )
      .unwrap();

    assert!(html.contains("Invoice sent successfully"));
    assert!(html.contains("Hi Ada,"));
    assert!(html.contains("invoice_#INV_123456.pdf"));
    assert!(html.contains("invoice_#INV_654321.pdf"));
  }

  #[test]
  fn test_first_name_is_escaped() {
    let html = engine()
      .render_share_invoice("<b>Ada</b>", &[])
      .unwrap();
    assert!(html.contains("&lt;b&gt;Ada&lt;&#x2F;b&gt;"));
  }
}

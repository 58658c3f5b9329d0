use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::auth::AuthService;
use crate::domain::client::ClientService;
use crate::domain::company::CompanyService;
use crate::domain::invoice::{
  EmailSender, InvoiceCalculator, InvoiceError, InvoiceNumberGenerator, InvoiceRenderer,
  InvoiceService, InvoiceServiceConfig, InvoiceServiceDependencies, ShareEmailTemplate, TaxRate,
};

use super::config::Config;
use super::email::{RecordingEmailSender, SmtpEmailSender};
use super::pdf::{HttpAssetFetcher, PrintPdfInvoiceRenderer};
use super::persistence::Repositories;
use super::templates::TemplateEngine;

/// Domain services and outbound adapters shared by every request
#[derive(Clone)]
pub struct Services {
  pub auth: Arc<AuthService>,
  pub company: Arc<CompanyService>,
  pub client: Arc<ClientService>,
  pub invoice: Arc<InvoiceService>,
  pub renderer: Arc<dyn InvoiceRenderer>,
  pub email_sender: Arc<dyn EmailSender>,
  pub share_template: Arc<dyn ShareEmailTemplate>,
}

/// Outbound adapters that differ between production and tests
pub struct Outbound {
  pub renderer: Arc<dyn InvoiceRenderer>,
  pub email_sender: Arc<dyn EmailSender>,
  pub share_template: Arc<dyn ShareEmailTemplate>,
}

impl Outbound {
  /// printpdf renderer with an HTTP logo fetcher, Tera templates from `templates/`, and SMTP
  /// delivery unless email is disabled
  pub fn from_config(config: &Config) -> Result<Self, InvoiceError> {
    let tax_rate = tax_rate(config.invoice.tax_rate_percent)?;
    let fetcher = HttpAssetFetcher::new(Duration::from_secs(config.pdf.logo_fetch_timeout_seconds))?
      .with_max_bytes(config.pdf.logo_max_bytes);
    let renderer = PrintPdfInvoiceRenderer::new(&config.pdf.output_dir, tax_rate, Arc::new(fetcher));

    let email_sender: Arc<dyn EmailSender> = if config.email.enabled {
      Arc::new(SmtpEmailSender::new(&config.email)?)
    } else {
      tracing::warn!("Email delivery disabled; shared invoices are only logged");
      Arc::new(RecordingEmailSender::new())
    };

    let templates = TemplateEngine::new()
      .map_err(|e| InvoiceError::Internal(format!("Failed to load templates: {}", e)))?;

    Ok(Self {
      renderer: Arc::new(renderer),
      email_sender,
      share_template: Arc::new(templates),
    })
  }
}

pub fn tax_rate(percent: u32) -> Result<TaxRate, InvoiceError> {
  Ok(TaxRate::from_percent(Decimal::from(percent))?)
}

impl Services {
  pub fn new(
    repos: &Repositories,
    tax_rate: TaxRate,
    invoice_config: InvoiceServiceConfig,
    number_generator: Arc<dyn InvoiceNumberGenerator>,
    outbound: Outbound,
  ) -> Self {
    let invoice = InvoiceService::new(InvoiceServiceDependencies {
      invoice_repo: repos.invoices.clone(),
      client_repo: repos.clients.clone(),
      company_repo: repos.companies.clone(),
      account_repo: repos.accounts.clone(),
      user_repo: repos.users.clone(),
      calculator: InvoiceCalculator::new(tax_rate),
      number_generator,
      config: invoice_config,
    });

    Self {
      auth: Arc::new(AuthService::new(repos.users.clone(), repos.sessions.clone())),
      company: Arc::new(CompanyService::new(
        repos.companies.clone(),
        repos.accounts.clone(),
      )),
      client: Arc::new(ClientService::new(
        repos.clients.clone(),
        repos.companies.clone(),
        repos.invoices.clone(),
      )),
      invoice: Arc::new(invoice),
      renderer: outbound.renderer,
      email_sender: outbound.email_sender,
      share_template: outbound.share_template,
    }
  }
}

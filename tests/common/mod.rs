#![allow(dead_code)]

use actix_web::web;
use chrono::{Duration, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use invoiceu::{
  adapters::http::{ApiDependencies, configure_routes},
  domain::auth::{Session, SessionToken, User},
  domain::company::{Company, CompanyProfileUpdate},
  domain::invoice::{
    EmailSender, InvoiceServiceConfig, OutgoingEmail, RandomInvoiceNumberGenerator, TaxRate,
  },
  infrastructure::{
    email::RecordingEmailSender,
    pdf::{HttpAssetFetcher, PrintPdfInvoiceRenderer},
    persistence::Repositories,
    services::{Outbound, Services},
    templates::TemplateEngine,
  },
};

/// In-memory wiring of the full HTTP stack with one signed-in user
pub struct TestContext {
  pub repos: Repositories,
  pub deps: ApiDependencies,
  pub sender: Arc<RecordingEmailSender>,
  pub user: User,
  pub token: String,
  pub output_dir: PathBuf,
  _workdir: TempDir,
}

impl TestContext {
  pub async fn new() -> Self {
    Self::build(None).await
  }

  /// Same wiring, but mail goes through `email_sender` instead of the recorder
  pub async fn with_email_sender(email_sender: Arc<dyn EmailSender>) -> Self {
    Self::build(Some(email_sender)).await
  }

  async fn build(email_sender: Option<Arc<dyn EmailSender>>) -> Self {
    let workdir = tempfile::tempdir().unwrap();
    let output_dir = workdir.path().join("invoices");

    let repos = Repositories::in_memory();
    let sender = Arc::new(RecordingEmailSender::new());
    let templates =
      TemplateEngine::from_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")).unwrap();
    let fetcher = HttpAssetFetcher::new(std::time::Duration::from_secs(1)).unwrap();

    let outbound = Outbound {
      renderer: Arc::new(PrintPdfInvoiceRenderer::new(
        output_dir.clone(),
        TaxRate::default(),
        Arc::new(fetcher),
      )),
      email_sender: email_sender.unwrap_or_else(|| sender.clone() as Arc<dyn EmailSender>),
      share_template: Arc::new(templates),
    };
    let services = Services::new(
      &repos,
      TaxRate::default(),
      InvoiceServiceConfig::default(),
      Arc::new(RandomInvoiceNumberGenerator::seeded(7)),
      outbound,
    );
    let deps = ApiDependencies::from_services(&services);

    let (user, token) = sign_in(&repos, "Ada", "ada@example.com").await;
    complete_company(&repos, user.id).await;

    Self {
      repos,
      deps,
      sender,
      user,
      token,
      output_dir,
      _workdir: workdir,
    }
  }

  pub fn routes(&self) -> impl FnOnce(&mut web::ServiceConfig) + 'static {
    let deps = self.deps.clone();
    move |cfg| configure_routes(cfg, deps)
  }

  pub fn bearer(&self) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", self.token))
  }

  pub async fn sent(&self) -> Vec<OutgoingEmail> {
    self.sender.sent().await
  }
}

/// Creates a user with a live session and returns the raw bearer token
pub async fn sign_in(repos: &Repositories, first_name: &str, email: &str) -> (User, String) {
  let user = repos
    .users
    .create(User::new(
      first_name.to_string(),
      "Tester".to_string(),
      email.to_string(),
    ))
    .await
    .unwrap();

  let token = SessionToken::generate();
  repos
    .sessions
    .create(Session::new(
      user.id,
      token.hash().into_inner(),
      Utc::now() + Duration::hours(1),
    ))
    .await
    .unwrap();

  (user, token.as_str().to_string())
}

/// Profile with every field clients and invoices require; the logo is a relative path so
/// rendering never touches the network
pub async fn complete_company(repos: &Repositories, user_id: Uuid) -> Company {
  let mut company = Company::new(user_id);
  company.apply(CompanyProfileUpdate {
    company_name: Some("Acme Studio".to_string()),
    company_logo: Some("uploads/acme.png".to_string()),
    occupation: Some("Design".to_string()),
    industry: Some("Creative".to_string()),
    address: Some("1 Main St".to_string()),
    zip_code: Some("10001".to_string()),
    tax_id: Some("TX-42".to_string()),
    ..Default::default()
  });
  repos.companies.upsert(company).await.unwrap()
}

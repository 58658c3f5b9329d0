use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::auth::ports::UserRepository;
use crate::domain::client::ports::ClientRepository;
use crate::domain::company::entities::Account;
use crate::domain::company::ports::{AccountRepository, CompanyRepository};

use super::calculator::InvoiceCalculator;
use super::entities::{
  Invoice, InvoiceDocument, InvoiceDraft, InvoiceListQuery, InvoicePatch, InvoiceSummary,
  ResolvedInvoicePatch,
};
use super::errors::InvoiceError;
use super::numbering::InvoiceNumberGenerator;
use super::ports::InvoiceRepository;
use super::value_objects::{InvoiceReference, InvoiceStatus, LineItem};

/// Invoice creation data
#[derive(Debug, Clone, Default)]
pub struct NewInvoice {
  pub client_id: Uuid,
  pub items: Vec<LineItem>,
  pub issue_date: Option<NaiveDate>,
  pub due_date: Option<NaiveDate>,
  pub phone_number: Option<String>,
  pub email: Option<String>,
  pub account_id: Option<Uuid>,
  pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Clone, Copy)]
pub struct InvoiceServiceConfig {
  /// Total persist attempts when a generated number collides
  pub max_number_attempts: u32,
}

impl Default for InvoiceServiceConfig {
  fn default() -> Self {
    Self {
      max_number_attempts: 3,
    }
  }
}

pub struct InvoiceServiceDependencies {
  pub invoice_repo: Arc<dyn InvoiceRepository>,
  pub client_repo: Arc<dyn ClientRepository>,
  pub company_repo: Arc<dyn CompanyRepository>,
  pub account_repo: Arc<dyn AccountRepository>,
  pub user_repo: Arc<dyn UserRepository>,
  pub calculator: InvoiceCalculator,
  pub number_generator: Arc<dyn InvoiceNumberGenerator>,
  pub config: InvoiceServiceConfig,
}

pub struct InvoiceService {
  invoice_repo: Arc<dyn InvoiceRepository>,
  client_repo: Arc<dyn ClientRepository>,
  company_repo: Arc<dyn CompanyRepository>,
  account_repo: Arc<dyn AccountRepository>,
  user_repo: Arc<dyn UserRepository>,
  calculator: InvoiceCalculator,
  number_generator: Arc<dyn InvoiceNumberGenerator>,
  config: InvoiceServiceConfig,
}

impl InvoiceService {
  pub fn new(deps: InvoiceServiceDependencies) -> Self {
    Self {
      invoice_repo: deps.invoice_repo,
      client_repo: deps.client_repo,
      company_repo: deps.company_repo,
      account_repo: deps.account_repo,
      user_repo: deps.user_repo,
      calculator: deps.calculator,
      number_generator: deps.number_generator,
      config: deps.config,
    }
  }

  pub fn calculator(&self) -> &InvoiceCalculator {
    &self.calculator
  }

  pub async fn create_invoice(
    &self,
    user_id: Uuid,
    data: NewInvoice,
  ) -> Result<Invoice, InvoiceError> {
    if data.items.is_empty() {
      return Err(InvoiceError::Validation(
        "Invoice items are required".to_string(),
      ));
    }
    let (issue_date, due_date) = match (data.issue_date, data.due_date) {
      (Some(issue), Some(due)) => (issue, due),
      _ => {
        return Err(InvoiceError::Validation(
          "Issue date and due date are required".to_string(),
        ));
      }
    };

    let totals = self.calculator.compute_totals(&data.items)?;

    let user = self
      .user_repo
      .find_by_id(user_id)
      .await?
      .ok_or(InvoiceError::Unauthorized)?;
    let company = self
      .company_repo
      .find_by_user_id(user.id)
      .await?
      .ok_or(InvoiceError::CompanyNotFound)?;
    let client = self
      .client_repo
      .find_by_id(user.id, data.client_id)
      .await?
      .ok_or(InvoiceError::ClientNotFound(data.client_id))?;
    let account = match data.account_id {
      Some(account_id) => Some(self.resolve_account(user.id, account_id).await?),
      None => None,
    };

    let draft = InvoiceDraft {
      user_id: user.id,
      company_id: company.id,
      client_id: client.id,
      account: account.map(|a| (a.id, a.account_number.into_inner())),
      reference: InvoiceReference::generate(),
      items: data.items,
      totals,
      status: data.status.unwrap_or_default(),
      issue_date,
      due_date,
      phone_number: data.phone_number,
      email: data.email,
    };

    self.persist_with_fresh_number(draft).await
  }

  /// Inserts the draft, regenerating the number on collision
  async fn persist_with_fresh_number(&self, draft: InvoiceDraft) -> Result<Invoice, InvoiceError> {
    let attempts = self.config.max_number_attempts.max(1);
    let mut last_collision = String::new();

    for attempt in 1..=attempts {
      let invoice = Invoice::new(draft.clone(), self.number_generator.next_number());
      match self.invoice_repo.create(invoice).await {
        Ok(saved) => {
          info!(
            user_id = %saved.user_id,
            invoice_id = %saved.id,
            invoice_number = %saved.invoice_number,
            status = %saved.status,
            "Invoice created"
          );
          return Ok(saved);
        }
        Err(InvoiceError::DuplicateInvoiceNumber(number)) => {
          warn!(
            attempt,
            max_attempts = attempts,
            invoice_number = %number,
            "Invoice number collision"
          );
          last_collision = number;
        }
        Err(e) => return Err(e),
      }
    }

    Err(InvoiceError::DuplicateInvoiceNumber(last_collision))
  }

  pub async fn get_invoice(&self, user_id: Uuid, invoice_id: Uuid) -> Result<Invoice, InvoiceError> {
    self
      .invoice_repo
      .find_by_id(user_id, invoice_id)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(invoice_id))
  }

  /// Owner-scoped invoice with its user, company, client and account resolved
  pub async fn get_invoice_document(
    &self,
    user_id: Uuid,
    invoice_id: Uuid,
  ) -> Result<InvoiceDocument, InvoiceError> {
    let invoice = self.get_invoice(user_id, invoice_id).await?;
    self.populate(invoice).await
  }

  pub async fn list_invoices(
    &self,
    user_id: Uuid,
    query: InvoiceListQuery,
  ) -> Result<(Vec<InvoiceSummary>, i64), InvoiceError> {
    let invoices = self.invoice_repo.list(user_id, &query).await?;
    let total = self.invoice_repo.count(user_id, query.status, None).await?;
    let summaries = self.summarize(user_id, invoices).await?;
    Ok((summaries, total))
  }

  pub async fn filter_by_status(
    &self,
    user_id: Uuid,
    status: InvoiceStatus,
  ) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    let query = InvoiceListQuery {
      status: Some(status),
      ..Default::default()
    };
    let invoices = self.invoice_repo.list(user_id, &query).await?;
    self.summarize(user_id, invoices).await
  }

  /// Completed invoices of the user, optionally narrowed to one of their clients
  pub async fn count_completed(
    &self,
    user_id: Uuid,
    client_id: Option<Uuid>,
  ) -> Result<i64, InvoiceError> {
    if let Some(client_id) = client_id {
      if self.client_repo.find_by_id(user_id, client_id).await?.is_none() {
        return Err(InvoiceError::Validation(
          "Client does not belong to this user".to_string(),
        ));
      }
    }

    self
      .invoice_repo
      .count(user_id, Some(InvoiceStatus::Completed), client_id)
      .await
  }

  pub async fn update_invoice(
    &self,
    user_id: Uuid,
    invoice_id: Uuid,
    patch: InvoicePatch,
  ) -> Result<Invoice, InvoiceError> {
    let mut invoice = self.get_invoice(user_id, invoice_id).await?;

    if !invoice.is_editable() {
      return Err(InvoiceError::InvalidState);
    }
    if let Some(status) = patch.status {
      if !invoice.status.can_transition_to(status) {
        return Err(InvoiceError::InvalidState);
      }
    }

    let items = match patch.items {
      Some(items) if items.is_empty() => {
        return Err(InvoiceError::Validation(
          "Invoice items are required".to_string(),
        ));
      }
      Some(items) => {
        let totals = self.calculator.compute_totals(&items)?;
        Some((items, totals))
      }
      None => None,
    };

    let client_id = match patch.client_id {
      Some(client_id) => {
        let client = self
          .client_repo
          .find_by_id(user_id, client_id)
          .await?
          .ok_or(InvoiceError::ClientNotFound(client_id))?;
        Some(client.id)
      }
      None => None,
    };

    let account = match patch.account_id {
      Some(account_id) => {
        let account = self.resolve_account(user_id, account_id).await?;
        Some((account.id, account.account_number.into_inner()))
      }
      None => None,
    };

    invoice.apply(ResolvedInvoicePatch {
      client_id,
      items,
      issue_date: patch.issue_date,
      due_date: patch.due_date,
      phone_number: patch.phone_number,
      email: patch.email,
      account,
      status: patch.status,
    })?;

    let invoice = self.invoice_repo.update(invoice).await?;
    info!(
      user_id = %user_id,
      invoice_id = %invoice.id,
      status = %invoice.status,
      "Invoice updated"
    );
    Ok(invoice)
  }

  pub async fn delete_invoice(&self, user_id: Uuid, invoice_id: Uuid) -> Result<(), InvoiceError> {
    if !self.invoice_repo.delete(user_id, invoice_id).await? {
      return Err(InvoiceError::InvoiceNotFound(invoice_id));
    }
    info!(user_id = %user_id, invoice_id = %invoice_id, "Invoice deleted");
    Ok(())
  }

  /// Populated views for every id, in the given order
  ///
  /// Fails with `InvoicesNotFound` unless every id resolves for the caller.
  pub async fn resolve_documents(
    &self,
    user_id: Uuid,
    invoice_ids: &[Uuid],
  ) -> Result<Vec<InvoiceDocument>, InvoiceError> {
    let found = self.invoice_repo.find_many(user_id, invoice_ids).await?;
    let mut by_id: HashMap<Uuid, Invoice> = found.into_iter().map(|i| (i.id, i)).collect();

    let mut documents = Vec::with_capacity(invoice_ids.len());
    for id in invoice_ids {
      let invoice = by_id.remove(id).ok_or(InvoiceError::InvoicesNotFound)?;
      documents.push(self.populate(invoice).await?);
    }
    Ok(documents)
  }

  async fn resolve_account(&self, user_id: Uuid, account_id: Uuid) -> Result<Account, InvoiceError> {
    self
      .account_repo
      .find_by_id(user_id, account_id)
      .await?
      .ok_or(InvoiceError::AccountNotFound(account_id))
  }

  async fn populate(&self, invoice: Invoice) -> Result<InvoiceDocument, InvoiceError> {
    let user = self
      .user_repo
      .find_by_id(invoice.user_id)
      .await?
      .ok_or(InvoiceError::Unauthorized)?;
    let company = self
      .company_repo
      .find_by_id(invoice.company_id)
      .await?
      .ok_or(InvoiceError::CompanyNotFound)?;
    let client = self
      .client_repo
      .find_by_id(invoice.user_id, invoice.client_id)
      .await?
      .ok_or(InvoiceError::ClientNotFound(invoice.client_id))?;

    let account = match invoice.account_id {
      Some(account_id) => {
        let account = self.account_repo.find_by_id(invoice.user_id, account_id).await?;
        if account.is_none() {
          debug!(invoice_id = %invoice.id, account_id = %account_id, "Linked account no longer exists");
        }
        account
      }
      None => None,
    };

    Ok(InvoiceDocument {
      invoice,
      user,
      company,
      client,
      account,
    })
  }

  /// Attaches client business names, one lookup per distinct client
  async fn summarize(
    &self,
    user_id: Uuid,
    invoices: Vec<Invoice>,
  ) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    let mut names: HashMap<Uuid, Option<String>> = HashMap::new();
    for invoice in &invoices {
      if !names.contains_key(&invoice.client_id) {
        let name = self
          .client_repo
          .find_by_id(user_id, invoice.client_id)
          .await?
          .map(|c| c.business_name);
        names.insert(invoice.client_id, name);
      }
    }

    Ok(
      invoices
        .iter()
        .map(|invoice| {
          let name = names.get(&invoice.client_id).cloned().flatten();
          InvoiceSummary::new(invoice, name)
        })
        .collect(),
    )
  }
}

use actix_web::{error, web};
use std::sync::Arc;

use crate::application::auth::GetCurrentUserUseCase;
use crate::application::client::{
  AddClientUseCase, DeleteClientUseCase, GetClientUseCase, ListClientsUseCase,
  SearchClientsUseCase, UpdateClientUseCase,
};
use crate::application::company::{
  GetCompanyProfileUseCase, ManageAccountsUseCase, UpdateCompanyProfileUseCase,
};
use crate::application::invoice::{
  CountCompletedInvoicesUseCase, CreateInvoiceUseCase, DeleteInvoiceUseCase,
  DownloadInvoiceUseCase, FilterInvoicesByStatusUseCase, GetInvoiceUseCase, ListInvoicesUseCase,
  ShareInvoicesDependencies, ShareInvoicesUseCase, UpdateInvoiceUseCase,
};
use crate::infrastructure::services::Services;

use super::errors::ApiError;
use super::handlers::{accounts, clients, company, health, invoices};
use super::middleware::AuthMiddleware;

/// Every use case the JSON API dispatches to
#[derive(Clone)]
pub struct ApiDependencies {
  pub get_current_user: Arc<GetCurrentUserUseCase>,

  pub create_invoice: Arc<CreateInvoiceUseCase>,
  pub get_invoice: Arc<GetInvoiceUseCase>,
  pub list_invoices: Arc<ListInvoicesUseCase>,
  pub filter_invoices: Arc<FilterInvoicesByStatusUseCase>,
  pub count_invoices: Arc<CountCompletedInvoicesUseCase>,
  pub update_invoice: Arc<UpdateInvoiceUseCase>,
  pub delete_invoice: Arc<DeleteInvoiceUseCase>,
  pub download_invoice: Arc<DownloadInvoiceUseCase>,
  pub share_invoices: Arc<ShareInvoicesUseCase>,

  pub add_client: Arc<AddClientUseCase>,
  pub get_client: Arc<GetClientUseCase>,
  pub list_clients: Arc<ListClientsUseCase>,
  pub update_client: Arc<UpdateClientUseCase>,
  pub search_clients: Arc<SearchClientsUseCase>,
  pub delete_client: Arc<DeleteClientUseCase>,

  pub accounts: Arc<ManageAccountsUseCase>,
  pub get_company_profile: Arc<GetCompanyProfileUseCase>,
  pub update_company_profile: Arc<UpdateCompanyProfileUseCase>,
}

impl ApiDependencies {
  pub fn from_services(services: &Services) -> Self {
    let invoice = &services.invoice;
    let client = &services.client;
    let company = &services.company;

    Self {
      get_current_user: Arc::new(GetCurrentUserUseCase::new(services.auth.clone())),

      create_invoice: Arc::new(CreateInvoiceUseCase::new(invoice.clone())),
      get_invoice: Arc::new(GetInvoiceUseCase::new(invoice.clone())),
      list_invoices: Arc::new(ListInvoicesUseCase::new(invoice.clone())),
      filter_invoices: Arc::new(FilterInvoicesByStatusUseCase::new(invoice.clone())),
      count_invoices: Arc::new(CountCompletedInvoicesUseCase::new(invoice.clone())),
      update_invoice: Arc::new(UpdateInvoiceUseCase::new(invoice.clone())),
      delete_invoice: Arc::new(DeleteInvoiceUseCase::new(invoice.clone())),
      download_invoice: Arc::new(DownloadInvoiceUseCase::new(
        invoice.clone(),
        services.renderer.clone(),
      )),
      share_invoices: Arc::new(ShareInvoicesUseCase::new(ShareInvoicesDependencies {
        invoice_service: invoice.clone(),
        renderer: services.renderer.clone(),
        email_sender: services.email_sender.clone(),
        template: services.share_template.clone(),
      })),

      add_client: Arc::new(AddClientUseCase::new(client.clone())),
      get_client: Arc::new(GetClientUseCase::new(client.clone())),
      list_clients: Arc::new(ListClientsUseCase::new(client.clone())),
      update_client: Arc::new(UpdateClientUseCase::new(client.clone())),
      search_clients: Arc::new(SearchClientsUseCase::new(client.clone())),
      delete_client: Arc::new(DeleteClientUseCase::new(client.clone())),

      accounts: Arc::new(ManageAccountsUseCase::new(company.clone())),
      get_company_profile: Arc::new(GetCompanyProfileUseCase::new(company.clone())),
      update_company_profile: Arc::new(UpdateCompanyProfileUseCase::new(company.clone())),
    }
  }
}

/// Mounts `/health` and the authenticated `/api/v1` scope
///
/// ```no_run
/// use actix_web::App;
/// # use invoiceu::adapters::http::routes::{ApiDependencies, configure_routes};
///
/// # fn example(deps: ApiDependencies) {
/// let app = App::new().configure(|cfg| configure_routes(cfg, deps.clone()));
/// # }
/// ```
pub fn configure_routes(cfg: &mut web::ServiceConfig, deps: ApiDependencies) {
  cfg
    .app_data(extractor_errors::path_config())
    .app_data(extractor_errors::json_config())
    .app_data(extractor_errors::query_config())
    .route("/health", web::get().to(health::health_handler));

  cfg.service(
    web::scope("/api/v1")
      .wrap(AuthMiddleware::new(deps.get_current_user.clone()))
      .service(web::scope("/invoices").configure(|cfg| configure_invoice_routes(cfg, &deps)))
      .service(web::scope("/clients").configure(|cfg| configure_client_routes(cfg, &deps)))
      .service(web::scope("/accounts").configure(|cfg| configure_account_routes(cfg, &deps)))
      .service(web::scope("/company").configure(|cfg| configure_company_routes(cfg, &deps))),
  );
}

/// Invoice lifecycle, PDF download and sharing
pub fn configure_invoice_routes(cfg: &mut web::ServiceConfig, deps: &ApiDependencies) {
  cfg
    .app_data(web::Data::new(deps.create_invoice.clone()))
    .app_data(web::Data::new(deps.get_invoice.clone()))
    .app_data(web::Data::new(deps.list_invoices.clone()))
    .app_data(web::Data::new(deps.filter_invoices.clone()))
    .app_data(web::Data::new(deps.count_invoices.clone()))
    .app_data(web::Data::new(deps.update_invoice.clone()))
    .app_data(web::Data::new(deps.delete_invoice.clone()))
    .app_data(web::Data::new(deps.download_invoice.clone()))
    .app_data(web::Data::new(deps.share_invoices.clone()))
    .route("/createinvoice", web::post().to(invoices::create_invoice_handler))
    .route("/getinvoice/{id}", web::get().to(invoices::get_invoice_handler))
    .route("/getallinvoice", web::get().to(invoices::list_invoices_handler))
    .route("/filterbystatus", web::get().to(invoices::filter_invoices_handler))
    .route("/invoicecount", web::get().to(invoices::count_invoices_handler))
    .route("/updateinvoice/{id}", web::put().to(invoices::update_invoice_handler))
    .route("/delete/{id}", web::delete().to(invoices::delete_invoice_handler))
    .route("/download/{id}", web::get().to(invoices::download_invoice_handler))
    .route("/share/{ids}/{email}", web::post().to(invoices::share_invoices_handler));
}

pub fn configure_client_routes(cfg: &mut web::ServiceConfig, deps: &ApiDependencies) {
  cfg
    .app_data(web::Data::new(deps.add_client.clone()))
    .app_data(web::Data::new(deps.get_client.clone()))
    .app_data(web::Data::new(deps.list_clients.clone()))
    .app_data(web::Data::new(deps.update_client.clone()))
    .app_data(web::Data::new(deps.search_clients.clone()))
    .app_data(web::Data::new(deps.delete_client.clone()))
    .route("/addclient", web::post().to(clients::add_client_handler))
    .route("/getclients", web::get().to(clients::list_clients_handler))
    .route("/getclient/{id}", web::get().to(clients::get_client_handler))
    .route("/updateclient/{id}", web::put().to(clients::update_client_handler))
    .route("/search", web::get().to(clients::search_clients_handler))
    .route("/filter", web::get().to(clients::filter_clients_handler))
    .route("/deleteclient/{id}", web::delete().to(clients::delete_client_handler))
    .route("/count", web::get().to(clients::count_clients_handler));
}

pub fn configure_account_routes(cfg: &mut web::ServiceConfig, deps: &ApiDependencies) {
  cfg
    .app_data(web::Data::new(deps.accounts.clone()))
    .route("/addaccount", web::post().to(accounts::add_account_handler))
    .route("/getaccounts", web::get().to(accounts::list_accounts_handler))
    .route("/getaccount/{id}", web::get().to(accounts::get_account_handler))
    .route("/updateaccount/{id}", web::put().to(accounts::update_account_handler))
    .route("/deleteaccount/{id}", web::delete().to(accounts::delete_account_handler));
}

pub fn configure_company_routes(cfg: &mut web::ServiceConfig, deps: &ApiDependencies) {
  cfg
    .app_data(web::Data::new(deps.get_company_profile.clone()))
    .app_data(web::Data::new(deps.update_company_profile.clone()))
    .route("/profile", web::get().to(company::get_company_profile_handler))
    .route("/profile", web::put().to(company::update_company_profile_handler));
}

/// Extractor failures answer with the JSON error envelope instead of actix's plain text
mod extractor_errors {
  use super::*;

  pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
      tracing::debug!(path = %req.path(), error = %err, "Rejected path parameters");
      let message = if req.path().contains("/invoices/") {
        "Invalid invoice ID"
      } else if req.path().contains("/clients/") {
        "Invalid client ID"
      } else if req.path().contains("/accounts/") {
        "Invalid account ID"
      } else {
        "Invalid path parameter"
      };
      error::Error::from(ApiError::Validation(message.to_string()))
    })
  }

  pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
      error::Error::from(ApiError::Validation(format!("Invalid request body: {}", err)))
    })
  }

  pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
      error::Error::from(ApiError::Validation(format!("Invalid query string: {}", err)))
    })
  }
}

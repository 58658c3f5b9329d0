use actix_web::{
  HttpRequest, HttpResponse,
  http::header::{ContentDisposition, DispositionParam, DispositionType},
  web,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{
      ApiResponse, CreateInvoiceRequest, InvoiceCountQuery, ListInvoicesQuery, StatusQuery,
      UpdateInvoiceRequest,
    },
    errors::ApiError,
    middleware::AuthUser,
  },
  application::invoice::{
    CountCompletedInvoicesCommand, CountCompletedInvoicesUseCase, CreateInvoiceCommand,
    CreateInvoiceUseCase, DeleteInvoiceCommand, DeleteInvoiceUseCase, DownloadInvoiceCommand,
    DownloadInvoiceUseCase, FilterInvoicesByStatusUseCase, FilterInvoicesCommand,
    GetInvoiceCommand, GetInvoiceUseCase, ListInvoicesCommand, ListInvoicesUseCase,
    ShareInvoicesCommand, ShareInvoicesUseCase, UpdateInvoiceCommand, UpdateInvoiceUseCase,
  },
};

/// Create invoice
/// POST /api/v1/invoices/createinvoice
pub async fn create_invoice_handler(
  request: web::Json<CreateInvoiceRequest>,
  use_case: web::Data<Arc<CreateInvoiceUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let request = request.into_inner();
  request.validate()?;

  let command = CreateInvoiceCommand {
    user_id: user.id,
    client_id: request.client_id,
    items: request.items.into_iter().map(Into::into).collect(),
    issue_date: request.issue_date,
    due_date: request.due_date,
    phone_number: request.phone_number,
    email: request.email,
    account_id: request.account_details_id,
    status: request.status,
  };

  let response = use_case.execute(command).await?;
  Ok(HttpResponse::Created().json(ApiResponse::success(response.message, response.invoice)))
}

/// Get invoice with client, company and account
/// GET /api/v1/invoices/getinvoice/{id}
pub async fn get_invoice_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetInvoiceUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let details = use_case
    .execute(GetInvoiceCommand {
      user_id: user.id,
      invoice_id: invoice_id.into_inner(),
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::success("Invoice retrieved successfully", details)))
}

/// List invoices, paginated and sorted
/// GET /api/v1/invoices/getallinvoice
pub async fn list_invoices_handler(
  query: web::Query<ListInvoicesQuery>,
  use_case: web::Data<Arc<ListInvoicesUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let query = query.into_inner();
  let response = use_case
    .execute(ListInvoicesCommand {
      user_id: user.id,
      page: query.page,
      limit: query.limit,
      sort_by: query.sort_by,
      order: query.order,
    })
    .await?;

  let message = if response.invoices.is_empty() {
    "No invoices found"
  } else {
    "Invoices retrieved successfully"
  };
  Ok(HttpResponse::Ok().json(ApiResponse::success(message, response)))
}

/// Invoices with the given status
/// GET /api/v1/invoices/filterbystatus?status=
pub async fn filter_invoices_handler(
  query: web::Query<StatusQuery>,
  use_case: web::Data<Arc<FilterInvoicesByStatusUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let response = use_case
    .execute(FilterInvoicesCommand {
      user_id: user.id,
      status: query.into_inner().status,
    })
    .await?;

  let message = if response.invoices.is_empty() {
    "No invoices found for the given status"
  } else {
    "Invoices retrieved successfully"
  };
  Ok(HttpResponse::Ok().json(ApiResponse::success(message, response)))
}

/// Count of completed invoices, optionally for one client
/// GET /api/v1/invoices/invoicecount?clientId=
pub async fn count_invoices_handler(
  query: web::Query<InvoiceCountQuery>,
  use_case: web::Data<Arc<CountCompletedInvoicesUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let response = use_case
    .execute(CountCompletedInvoicesCommand {
      user_id: user.id,
      client_id: query.into_inner().client_id,
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::success(
    "Completed invoices counted successfully",
    response,
  )))
}

/// Update a draft invoice
/// PUT /api/v1/invoices/updateinvoice/{id}
pub async fn update_invoice_handler(
  invoice_id: web::Path<Uuid>,
  request: web::Json<UpdateInvoiceRequest>,
  use_case: web::Data<Arc<UpdateInvoiceUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let request = request.into_inner();
  request.validate()?;

  let command = UpdateInvoiceCommand {
    user_id: user.id,
    invoice_id: invoice_id.into_inner(),
    client_id: request.client_id,
    items: request
      .items
      .map(|items| items.into_iter().map(Into::into).collect()),
    issue_date: request.issue_date,
    due_date: request.due_date,
    phone_number: request.phone_number,
    email: request.email,
    account_id: request.account_details_id,
    status: request.status,
  };

  let invoice = use_case.execute(command).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Invoice updated successfully", invoice)))
}

/// Delete invoice
/// DELETE /api/v1/invoices/delete/{id}
pub async fn delete_invoice_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteInvoiceUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  use_case
    .execute(DeleteInvoiceCommand {
      user_id: user.id,
      invoice_id: invoice_id.into_inner(),
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::message("Invoice deleted successfully")))
}

/// Render and download the invoice PDF
/// GET /api/v1/invoices/download/{id}
pub async fn download_invoice_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DownloadInvoiceUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let download = use_case
    .execute(DownloadInvoiceCommand {
      user_id: user.id,
      invoice_id: invoice_id.into_inner(),
    })
    .await?;

  Ok(
    HttpResponse::Ok()
      .content_type("application/pdf")
      .insert_header(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(download.filename)],
      })
      .body(download.content),
  )
}

/// Email one or more invoices as PDF attachments
/// POST /api/v1/invoices/share/{ids}/{email}
///
/// `ids` is a comma-separated list of invoice ids.
pub async fn share_invoices_handler(
  path: web::Path<(String, String)>,
  use_case: web::Data<Arc<ShareInvoicesUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let (invoice_ids, email) = path.into_inner();

  let response = use_case
    .execute(ShareInvoicesCommand {
      user_id: user.id,
      first_name: user.first_name,
      invoice_ids,
      email,
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::success(
    "PDF files generated successfully",
    response,
  )))
}

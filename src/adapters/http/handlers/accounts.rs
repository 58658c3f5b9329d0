use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{AddAccountRequest, ApiResponse, PageQuery, UpdateAccountRequest},
    errors::ApiError,
    middleware::AuthUser,
  },
  application::company::ManageAccountsUseCase,
  domain::company::{AccountUpdate, CompanyError, NewAccount},
};

/// Add bank account
/// POST /api/v1/accounts/addaccount
pub async fn add_account_handler(
  request: web::Json<AddAccountRequest>,
  use_case: web::Data<Arc<ManageAccountsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let request = request.into_inner();
  request.validate()?;

  let data = NewAccount::try_from(request).map_err(CompanyError::from)?;
  let account = use_case.add(user.id, data).await?;

  Ok(HttpResponse::Created().json(ApiResponse::success("Account created successfully", account)))
}

/// GET /api/v1/accounts/getaccounts
pub async fn list_accounts_handler(
  query: web::Query<PageQuery>,
  use_case: web::Data<Arc<ManageAccountsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let query = query.into_inner();
  let response = use_case.list(user.id, query.page, query.limit).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Account successfully retrieved", response)))
}

/// GET /api/v1/accounts/getaccount/{id}
pub async fn get_account_handler(
  account_id: web::Path<Uuid>,
  use_case: web::Data<Arc<ManageAccountsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let account = use_case.get(user.id, account_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Account successfully retrieved", account)))
}

/// Update bank account
/// PUT /api/v1/accounts/updateaccount/{id}
pub async fn update_account_handler(
  account_id: web::Path<Uuid>,
  request: web::Json<UpdateAccountRequest>,
  use_case: web::Data<Arc<ManageAccountsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let request = request.into_inner();
  request.validate()?;

  let update = AccountUpdate::try_from(request).map_err(CompanyError::from)?;
  let account = use_case
    .update(user.id, account_id.into_inner(), update)
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::success("Account updated successfully", account)))
}

/// DELETE /api/v1/accounts/deleteaccount/{id}
pub async fn delete_account_handler(
  account_id: web::Path<Uuid>,
  use_case: web::Data<Arc<ManageAccountsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  use_case.delete(user.id, account_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::message("Account deleted successfully")))
}

use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{ApiResponse, CompanyProfileRequest},
    errors::ApiError,
    middleware::AuthUser,
  },
  application::company::{GetCompanyProfileUseCase, UpdateCompanyProfileUseCase},
};

/// GET /api/v1/company/profile
pub async fn get_company_profile_handler(
  use_case: web::Data<Arc<GetCompanyProfileUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let profile = use_case.execute(user.id).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Company details retrieved", profile)))
}

/// Partial update of the caller's company profile
/// PUT /api/v1/company/profile
pub async fn update_company_profile_handler(
  request: web::Json<CompanyProfileRequest>,
  use_case: web::Data<Arc<UpdateCompanyProfileUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let request = request.into_inner();
  request.validate()?;

  let profile = use_case.execute(user.id, request.into()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success(
    "Company details updated successfully",
    profile,
  )))
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::company::{Company, CompanyError, CompanyProfileUpdate, CompanyService};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfileDto {
  pub id: Uuid,
  pub company_name: Option<String>,
  pub company_logo: Option<String>,
  pub occupation: Option<String>,
  pub industry: Option<String>,
  pub country: Option<String>,
  pub city: Option<String>,
  pub state: Option<String>,
  pub zip_code: Option<String>,
  pub address: Option<String>,
  pub tax_id: Option<String>,
  pub is_complete: bool,
  pub updated_at: DateTime<Utc>,
}

impl From<Company> for CompanyProfileDto {
  fn from(company: Company) -> Self {
    Self {
      is_complete: company.is_complete(),
      id: company.id,
      company_name: company.company_name,
      company_logo: company.company_logo,
      occupation: company.occupation,
      industry: company.industry,
      country: company.country,
      city: company.city,
      state: company.state,
      zip_code: company.zip_code,
      address: company.address,
      tax_id: company.tax_id,
      updated_at: company.updated_at,
    }
  }
}

pub struct GetCompanyProfileUseCase {
  company_service: Arc<CompanyService>,
}

impl GetCompanyProfileUseCase {
  pub fn new(company_service: Arc<CompanyService>) -> Self {
    Self { company_service }
  }

  pub async fn execute(&self, user_id: Uuid) -> Result<CompanyProfileDto, CompanyError> {
    let company = self.company_service.get_profile(user_id).await?;
    Ok(company.into())
  }
}

pub struct UpdateCompanyProfileUseCase {
  company_service: Arc<CompanyService>,
}

impl UpdateCompanyProfileUseCase {
  pub fn new(company_service: Arc<CompanyService>) -> Self {
    Self { company_service }
  }

  pub async fn execute(
    &self,
    user_id: Uuid,
    update: CompanyProfileUpdate,
  ) -> Result<CompanyProfileDto, CompanyError> {
    let company = self.company_service.edit_profile(user_id, update).await?;
    Ok(company.into())
  }
}

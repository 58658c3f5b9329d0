use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::company::{Company, CompanyError, CompanyRepository};

const COMPANY_COLUMNS: &str = "id, user_id, company_name, company_logo, occupation, industry, \
  country, city, state, zip_code, address, tax_id, created_at, updated_at";

#[derive(Debug, FromRow)]
struct CompanyRow {
  id: Uuid,
  user_id: Uuid,
  company_name: Option<String>,
  company_logo: Option<String>,
  occupation: Option<String>,
  industry: Option<String>,
  country: Option<String>,
  city: Option<String>,
  state: Option<String>,
  zip_code: Option<String>,
  address: Option<String>,
  tax_id: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
  fn from(row: CompanyRow) -> Self {
    Company {
      id: row.id,
      user_id: row.user_id,
      company_name: row.company_name,
      company_logo: row.company_logo,
      occupation: row.occupation,
      industry: row.industry,
      country: row.country,
      city: row.city,
      state: row.state,
      zip_code: row.zip_code,
      address: row.address,
      tax_id: row.tax_id,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

pub struct PostgresCompanyRepository {
  pool: PgPool,
}

impl PostgresCompanyRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, CompanyError> {
    let row = sqlx::query_as::<_, CompanyRow>(&format!(
      "SELECT {} FROM companies WHERE id = $1",
      COMPANY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Company>, CompanyError> {
    let row = sqlx::query_as::<_, CompanyRow>(&format!(
      "SELECT {} FROM companies WHERE user_id = $1",
      COMPANY_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn upsert(&self, company: Company) -> Result<Company, CompanyError> {
    let row = sqlx::query_as::<_, CompanyRow>(&format!(
      r#"
            INSERT INTO companies ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT ON CONSTRAINT companies_user_unique DO UPDATE
            SET company_name = EXCLUDED.company_name,
                company_logo = EXCLUDED.company_logo,
                occupation = EXCLUDED.occupation,
                industry = EXCLUDED.industry,
                country = EXCLUDED.country,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                zip_code = EXCLUDED.zip_code,
                address = EXCLUDED.address,
                tax_id = EXCLUDED.tax_id,
                updated_at = EXCLUDED.updated_at
            RETURNING {columns}
            "#,
      columns = COMPANY_COLUMNS
    ))
    .bind(company.id)
    .bind(company.user_id)
    .bind(&company.company_name)
    .bind(&company.company_logo)
    .bind(&company.occupation)
    .bind(&company.industry)
    .bind(&company.country)
    .bind(&company.city)
    .bind(&company.state)
    .bind(&company.zip_code)
    .bind(&company.address)
    .bind(&company.tax_id)
    .bind(company.created_at)
    .bind(company.updated_at)
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::company::CompanyProfileUpdate;
  use crate::infrastructure::persistence::postgres::test_support::{seed_user, setup_test_db};

  #[tokio::test]
  #[ignore = "requires a Docker daemon"]
  async fn test_upsert_keeps_one_row_per_user() {
    let (pool, _container) = setup_test_db().await;
    let user = seed_user(&pool, "company@example.com").await;
    let repo = PostgresCompanyRepository::new(pool);

    let mut first = Company::new(user.id);
    first.apply(CompanyProfileUpdate {
      company_name: Some("Acme".to_string()),
      ..Default::default()
    });
    let first = repo.upsert(first).await.unwrap();

    // A fresh id for the same user updates the existing row
    let mut second = Company::new(user.id);
    second.company_name = Some("Acme Ltd".to_string());
    let second = repo.upsert(second).await.unwrap();

    assert_eq!(first.id, second.id);
    let stored = repo.find_by_user_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.company_name.as_deref(), Some("Acme Ltd"));
    assert_eq!(repo.find_by_id(first.id).await.unwrap().unwrap().user_id, user.id);
  }
}

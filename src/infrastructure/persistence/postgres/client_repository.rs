use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::Page;
use crate::domain::client::{Client, ClientError, ClientFilter, ClientRepository};

use super::{is_foreign_key_violation, is_unique_violation};

const CLIENT_COLUMNS: &str = "id, user_id, business_name, client_industry, email, phone_number, \
  country, city, zip_code, address, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ClientRow {
  id: Uuid,
  user_id: Uuid,
  business_name: String,
  client_industry: String,
  email: String,
  phone_number: Option<String>,
  country: Option<String>,
  city: Option<String>,
  zip_code: Option<String>,
  address: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<ClientRow> for Client {
  fn from(row: ClientRow) -> Self {
    Client {
      id: row.id,
      user_id: row.user_id,
      business_name: row.business_name,
      client_industry: row.client_industry,
      email: row.email,
      phone_number: row.phone_number,
      country: row.country,
      city: row.city,
      zip_code: row.zip_code,
      address: row.address,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

pub struct PostgresClientRepository {
  pool: PgPool,
}

impl PostgresClientRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn map_write_error(e: sqlx::Error) -> ClientError {
  if is_unique_violation(&e, "clients_user_business_name_unique") {
    return ClientError::BusinessNameAlreadyExists;
  }
  ClientError::Database(e)
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
  async fn create(&self, client: Client) -> Result<Client, ClientError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      r#"
            INSERT INTO clients ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {columns}
            "#,
      columns = CLIENT_COLUMNS
    ))
    .bind(client.id)
    .bind(client.user_id)
    .bind(&client.business_name)
    .bind(&client.client_industry)
    .bind(&client.email)
    .bind(&client.phone_number)
    .bind(&client.country)
    .bind(&client.city)
    .bind(&client.zip_code)
    .bind(&client.address)
    .bind(client.created_at)
    .bind(client.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(map_write_error)?;

    Ok(row.into())
  }

  async fn update(&self, client: Client) -> Result<Client, ClientError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      r#"
            UPDATE clients
            SET business_name = $3, client_industry = $4, email = $5, phone_number = $6,
                country = $7, city = $8, zip_code = $9, address = $10, updated_at = $11
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
      CLIENT_COLUMNS
    ))
    .bind(client.id)
    .bind(client.user_id)
    .bind(&client.business_name)
    .bind(&client.client_industry)
    .bind(&client.email)
    .bind(&client.phone_number)
    .bind(&client.country)
    .bind(&client.city)
    .bind(&client.zip_code)
    .bind(&client.address)
    .bind(client.updated_at)
    .fetch_optional(&self.pool)
    .await
    .map_err(map_write_error)?;

    row.map(Into::into).ok_or(ClientError::NotFound(client.id))
  }

  async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Client>, ClientError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      "SELECT {} FROM clients WHERE id = $1 AND user_id = $2",
      CLIENT_COLUMNS
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn list_by_user(&self, user_id: Uuid, page: Page) -> Result<Vec<Client>, ClientError> {
    let rows = sqlx::query_as::<_, ClientRow>(&format!(
      r#"
            SELECT {} FROM clients
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
      CLIENT_COLUMNS
    ))
    .bind(user_id)
    .bind(i64::from(page.limit))
    .bind(page.offset())
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn filter(&self, user_id: Uuid, filter: &ClientFilter) -> Result<Vec<Client>, ClientError> {
    let rows = sqlx::query_as::<_, ClientRow>(&format!(
      r#"
            SELECT {} FROM clients
            WHERE user_id = $1
              AND ($2::text IS NULL OR business_name ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR client_industry = $3)
              AND ($4::text IS NULL OR city ILIKE '%' || $4 || '%')
            ORDER BY created_at DESC
            "#,
      CLIENT_COLUMNS
    ))
    .bind(user_id)
    .bind(filter.search.as_deref())
    .bind(filter.industry.as_deref())
    .bind(filter.city.as_deref())
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn count_by_user(&self, user_id: Uuid) -> Result<i64, ClientError> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients WHERE user_id = $1")
      .bind(user_id)
      .fetch_one(&self.pool)
      .await?;

    Ok(count.0)
  }

  async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, ClientError> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND user_id = $2")
      .bind(id)
      .bind(user_id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        if is_foreign_key_violation(&e, "invoices_client_id_fkey") {
          return ClientError::HasInvoices;
        }
        ClientError::Database(e)
      })?;

    Ok(result.rows_affected() > 0)
  }

  async fn exists_by_business_name(
    &self,
    user_id: Uuid,
    business_name: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, ClientError> {
    let exists: (bool,) = sqlx::query_as(
      r#"
            SELECT EXISTS(
                SELECT 1 FROM clients
                WHERE user_id = $1
                  AND lower(business_name) = lower($2)
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
    )
    .bind(user_id)
    .bind(business_name.trim())
    .bind(exclude_id)
    .fetch_one(&self.pool)
    .await?;

    Ok(exists.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_support::{seed_user, setup_test_db};

  fn client(user_id: Uuid, name: &str, city: &str) -> Client {
    let mut client = Client::new(
      user_id,
      name.to_string(),
      "Retail".to_string(),
      "ap@client.test".to_string(),
    );
    client.city = Some(city.to_string());
    client
  }

  #[tokio::test]
  #[ignore = "requires a Docker daemon"]
  async fn test_business_name_unique_index_ignores_case() {
    let (pool, _container) = setup_test_db().await;
    let user = seed_user(&pool, "clients@example.com").await;
    let other = seed_user(&pool, "other@example.com").await;
    let repo = PostgresClientRepository::new(pool);

    repo.create(client(user.id, "Globex", "Lagos")).await.unwrap();
    let result = repo.create(client(user.id, "GLOBEX", "Abuja")).await;
    assert!(matches!(result, Err(ClientError::BusinessNameAlreadyExists)));

    // Same name under a different user is fine
    repo.create(client(other.id, "Globex", "Lagos")).await.unwrap();
    assert!(
      repo
        .exists_by_business_name(user.id, "globex", None)
        .await
        .unwrap()
    );
  }

  #[tokio::test]
  #[ignore = "requires a Docker daemon"]
  async fn test_filter_combines_conditions() {
    let (pool, _container) = setup_test_db().await;
    let user = seed_user(&pool, "filter@example.com").await;
    let repo = PostgresClientRepository::new(pool);

    repo.create(client(user.id, "Globex", "Lagos")).await.unwrap();
    repo.create(client(user.id, "Initech", "Abuja")).await.unwrap();

    let rows = repo
      .filter(
        user.id,
        &ClientFilter {
          search: Some("glo".to_string()),
          industry: Some("Retail".to_string()),
          city: Some("lag".to_string()),
        },
      )
      .await
      .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].business_name, "Globex");
    assert_eq!(repo.count_by_user(user.id).await.unwrap(), 2);
  }
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::invoice::{
  Invoice, InvoiceError, InvoiceListQuery, InvoiceNumber, InvoiceReference, InvoiceRepository,
  InvoiceStatus, LineItem,
};

use super::is_unique_violation;

const INVOICE_COLUMNS: &str = "id, user_id, company_id, client_id, account_id, account_number, \
  invoice_number, reference, items, sub_total, tax, total, status, issue_date, due_date, \
  phone_number, email, created_at, updated_at";

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: Uuid,
  user_id: Uuid,
  company_id: Uuid,
  client_id: Uuid,
  account_id: Option<Uuid>,
  account_number: Option<String>,
  invoice_number: String,
  reference: Option<String>,
  items: Json<Vec<LineItem>>,
  sub_total: Decimal,
  tax: Decimal,
  total: Decimal,
  status: String,
  issue_date: NaiveDate,
  due_date: NaiveDate,
  phone_number: Option<String>,
  email: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
  type Error = InvoiceError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    let invoice_number = InvoiceNumber::new(row.invoice_number)?;
    let status = InvoiceStatus::from_str(&row.status)?;

    Ok(Invoice {
      id: row.id,
      user_id: row.user_id,
      company_id: row.company_id,
      client_id: row.client_id,
      account_id: row.account_id,
      account_number: row.account_number,
      invoice_number,
      reference: row.reference.map(InvoiceReference::from_stored),
      items: row.items.0,
      sub_total: row.sub_total,
      tax: row.tax,
      total: row.total,
      status,
      issue_date: row.issue_date,
      due_date: row.due_date,
      phone_number: row.phone_number,
      email: row.email,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    let invoice_number_value = invoice.invoice_number.value().to_string();

    let row = sqlx::query_as::<_, InvoiceRow>(&format!(
      r#"
            INSERT INTO invoices ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {columns}
            "#,
      columns = INVOICE_COLUMNS
    ))
    .bind(invoice.id)
    .bind(invoice.user_id)
    .bind(invoice.company_id)
    .bind(invoice.client_id)
    .bind(invoice.account_id)
    .bind(&invoice.account_number)
    .bind(invoice.invoice_number.value())
    .bind(invoice.reference.as_ref().map(|r| r.value()))
    .bind(Json(&invoice.items))
    .bind(invoice.sub_total)
    .bind(invoice.tax)
    .bind(invoice.total)
    .bind(invoice.status.as_str())
    .bind(invoice.issue_date)
    .bind(invoice.due_date)
    .bind(&invoice.phone_number)
    .bind(&invoice.email)
    .bind(invoice.created_at)
    .bind(invoice.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      // PostgreSQL unique violation on the invoice number
      if is_unique_violation(&e, "invoices_invoice_number_unique") {
        return InvoiceError::DuplicateInvoiceNumber(invoice_number_value);
      }
      InvoiceError::Database(e)
    })?;

    row.try_into()
  }

  async fn update(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(&format!(
      r#"
            UPDATE invoices
            SET client_id = $3, account_id = $4, account_number = $5, items = $6,
                sub_total = $7, tax = $8, total = $9, status = $10, issue_date = $11,
                due_date = $12, phone_number = $13, email = $14, updated_at = $15
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
      INVOICE_COLUMNS
    ))
    .bind(invoice.id)
    .bind(invoice.user_id)
    .bind(invoice.client_id)
    .bind(invoice.account_id)
    .bind(&invoice.account_number)
    .bind(Json(&invoice.items))
    .bind(invoice.sub_total)
    .bind(invoice.tax)
    .bind(invoice.total)
    .bind(invoice.status.as_str())
    .bind(invoice.issue_date)
    .bind(invoice.due_date)
    .bind(&invoice.phone_number)
    .bind(&invoice.email)
    .bind(invoice.updated_at)
    .fetch_optional(&self.pool)
    .await?;

    row
      .ok_or(InvoiceError::InvoiceNotFound(invoice.id))?
      .try_into()
  }

  async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(&format!(
      "SELECT {} FROM invoices WHERE id = $1 AND user_id = $2",
      INVOICE_COLUMNS
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Invoice::try_from).transpose()
  }

  async fn find_many(&self, user_id: Uuid, ids: &[Uuid]) -> Result<Vec<Invoice>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
      "SELECT {} FROM invoices WHERE user_id = $1 AND id = ANY($2)",
      INVOICE_COLUMNS
    ))
    .bind(user_id)
    .bind(ids)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(Invoice::try_from).collect()
  }

  async fn list(
    &self,
    user_id: Uuid,
    query: &InvoiceListQuery,
  ) -> Result<Vec<Invoice>, InvoiceError> {
    // Sort column and direction come from closed enums, never from raw input
    let sql = format!(
      r#"
            SELECT {} FROM invoices
            WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY {} {}, created_at {}
            LIMIT $3 OFFSET $4
            "#,
      INVOICE_COLUMNS,
      query.sort_by.column(),
      query.order.as_sql(),
      query.order.as_sql()
    );

    let rows = sqlx::query_as::<_, InvoiceRow>(&sql)
      .bind(user_id)
      .bind(query.status.map(|s| s.as_str()))
      .bind(query.page.map(|p| i64::from(p.limit)))
      .bind(query.page.map(|p| p.offset()))
      .fetch_all(&self.pool)
      .await?;

    rows.into_iter().map(Invoice::try_from).collect()
  }

  async fn count(
    &self,
    user_id: Uuid,
    status: Option<InvoiceStatus>,
    client_id: Option<Uuid>,
  ) -> Result<i64, InvoiceError> {
    let count: (i64,) = sqlx::query_as(
      r#"
            SELECT COUNT(*) FROM invoices
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR client_id = $3)
            "#,
    )
    .bind(user_id)
    .bind(status.map(|s| s.as_str()))
    .bind(client_id)
    .fetch_one(&self.pool)
    .await?;

    Ok(count.0)
  }

  async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, InvoiceError> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1 AND user_id = $2")
      .bind(id)
      .bind(user_id)
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected() > 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Page;
  use crate::domain::client::{Client, ClientError, ClientRepository};
  use crate::domain::company::{Company, CompanyRepository};
  use crate::domain::invoice::entities::InvoiceDraft;
  use crate::domain::invoice::{InvoiceCalculator, InvoiceSortField, SortOrder};
  use crate::infrastructure::persistence::postgres::test_support::{seed_user, setup_test_db};
  use crate::infrastructure::persistence::postgres::{
    PostgresClientRepository, PostgresCompanyRepository,
  };
  use rust_decimal_macros::dec;

  struct Seeded {
    user_id: Uuid,
    company_id: Uuid,
    client_id: Uuid,
  }

  async fn seed(pool: &PgPool) -> Seeded {
    let user = seed_user(pool, "invoices@example.com").await;
    let company = PostgresCompanyRepository::new(pool.clone())
      .upsert(Company::new(user.id))
      .await
      .unwrap();
    let client = PostgresClientRepository::new(pool.clone())
      .create(Client::new(
        user.id,
        "Globex".to_string(),
        "Retail".to_string(),
        "ap@globex.test".to_string(),
      ))
      .await
      .unwrap();
    Seeded {
      user_id: user.id,
      company_id: company.id,
      client_id: client.id,
    }
  }

  fn invoice(seeded: &Seeded, digits: u32, day: u32) -> Invoice {
    let items = vec![
      LineItem::new("Design", dec!(2), dec!(50), "USD", None).unwrap(),
      LineItem::new("Hosting", dec!(1), dec!(10), "USD", Some("Monthly".to_string())).unwrap(),
    ];
    let totals = InvoiceCalculator::default().compute_totals(&items).unwrap();
    Invoice::new(
      InvoiceDraft {
        user_id: seeded.user_id,
        company_id: seeded.company_id,
        client_id: seeded.client_id,
        account: None,
        reference: InvoiceReference::generate(),
        items,
        totals,
        status: InvoiceStatus::Draft,
        issue_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
        phone_number: None,
        email: None,
      },
      InvoiceNumber::from_digits(digits).unwrap(),
    )
  }

  #[tokio::test]
  #[ignore = "requires a Docker daemon"]
  async fn test_items_and_totals_round_trip() {
    let (pool, _container) = setup_test_db().await;
    let seeded = seed(&pool).await;
    let repo = PostgresInvoiceRepository::new(pool);

    let created = repo.create(invoice(&seeded, 123456, 1)).await.unwrap();
    let found = repo
      .find_by_id(seeded.user_id, created.id)
      .await
      .unwrap()
      .unwrap();

    assert_eq!(found.invoice_number.value(), "#INV_123456");
    assert_eq!(found.items, created.items);
    assert_eq!(found.sub_total, dec!(110));
    assert_eq!(found.tax, dec!(11));
    assert_eq!(found.total, dec!(121));
    assert!(repo.find_by_id(Uuid::new_v4(), created.id).await.unwrap().is_none());
  }

  #[tokio::test]
  #[ignore = "requires a Docker daemon"]
  async fn test_duplicate_number_is_reported() {
    let (pool, _container) = setup_test_db().await;
    let seeded = seed(&pool).await;
    let repo = PostgresInvoiceRepository::new(pool);

    repo.create(invoice(&seeded, 555555, 1)).await.unwrap();
    let result = repo.create(invoice(&seeded, 555555, 2)).await;
    assert!(matches!(
      result,
      Err(InvoiceError::DuplicateInvoiceNumber(n)) if n == "#INV_555555"
    ));
  }

  #[tokio::test]
  #[ignore = "requires a Docker daemon"]
  async fn test_list_sort_page_and_count() {
    let (pool, _container) = setup_test_db().await;
    let seeded = seed(&pool).await;
    let repo = PostgresInvoiceRepository::new(pool);

    for (digits, day) in [(100001, 10), (100002, 3), (100003, 20)] {
      repo.create(invoice(&seeded, digits, day)).await.unwrap();
    }

    let rows = repo
      .list(
        seeded.user_id,
        &InvoiceListQuery {
          page: Some(Page::new(Some(1), Some(2))),
          sort_by: InvoiceSortField::IssueDate,
          order: SortOrder::Desc,
          status: None,
        },
      )
      .await
      .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].issue_date.format("%d").to_string(), "20");
    assert_eq!(rows[1].issue_date.format("%d").to_string(), "10");

    assert_eq!(repo.count(seeded.user_id, None, None).await.unwrap(), 3);
    assert_eq!(
      repo
        .count(seeded.user_id, Some(InvoiceStatus::Completed), Some(seeded.client_id))
        .await
        .unwrap(),
      0
    );
  }

  #[tokio::test]
  #[ignore = "requires a Docker daemon"]
  async fn test_delete_is_scoped_and_not_repeatable() {
    let (pool, _container) = setup_test_db().await;
    let seeded = seed(&pool).await;
    let repo = PostgresInvoiceRepository::new(pool);

    let created = repo.create(invoice(&seeded, 777777, 1)).await.unwrap();
    assert!(!repo.delete(Uuid::new_v4(), created.id).await.unwrap());
    assert!(repo.delete(seeded.user_id, created.id).await.unwrap());
    assert!(!repo.delete(seeded.user_id, created.id).await.unwrap());
  }

  #[tokio::test]
  #[ignore = "requires a Docker daemon"]
  async fn test_invoiced_client_delete_is_restricted() {
    let (pool, _container) = setup_test_db().await;
    let seeded = seed(&pool).await;
    let invoices = PostgresInvoiceRepository::new(pool.clone());
    let clients = PostgresClientRepository::new(pool);

    let created = invoices.create(invoice(&seeded, 333333, 3)).await.unwrap();
    let result = clients.delete(seeded.user_id, seeded.client_id).await;
    assert!(matches!(result, Err(ClientError::HasInvoices)));

    invoices.delete(seeded.user_id, created.id).await.unwrap();
    assert!(clients.delete(seeded.user_id, seeded.client_id).await.unwrap());
  }
}

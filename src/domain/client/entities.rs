use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A billable counterparty belonging to a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
  pub id: Uuid,
  pub user_id: Uuid,
  pub business_name: String,
  pub client_industry: String,
  pub email: String,
  pub phone_number: Option<String>,
  pub country: Option<String>,
  pub city: Option<String>,
  pub zip_code: Option<String>,
  pub address: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Partial client edit; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientUpdate {
  pub business_name: Option<String>,
  pub client_industry: Option<String>,
  pub email: Option<String>,
  pub phone_number: Option<String>,
  pub country: Option<String>,
  pub city: Option<String>,
  pub zip_code: Option<String>,
  pub address: Option<String>,
}

/// Combinable list filter; every set field must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
  /// Case-insensitive substring of the business name
  pub search: Option<String>,
  /// Exact industry
  pub industry: Option<String>,
  /// Case-insensitive substring of the city
  pub city: Option<String>,
}

impl Client {
  pub fn new(
    user_id: Uuid,
    business_name: String,
    client_industry: String,
    email: String,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      user_id,
      business_name,
      client_industry,
      email,
      phone_number: None,
      country: None,
      city: None,
      zip_code: None,
      address: None,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn apply(&mut self, update: ClientUpdate) {
    if let Some(business_name) = update.business_name {
      self.business_name = business_name;
    }
    if let Some(client_industry) = update.client_industry {
      self.client_industry = client_industry;
    }
    if let Some(email) = update.email {
      self.email = email;
    }
    for (target, value) in [
      (&mut self.phone_number, update.phone_number),
      (&mut self.country, update.country),
      (&mut self.city, update.city),
      (&mut self.zip_code, update.zip_code),
      (&mut self.address, update.address),
    ] {
      if value.is_some() {
        *target = value;
      }
    }
    self.updated_at = Utc::now();
  }

  /// Single-line address for document billing blocks
  pub fn address_line(&self) -> String {
    [
      self.address.as_deref(),
      self.city.as_deref(),
      self.zip_code.as_deref(),
      self.country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
  }

  pub fn matches(&self, filter: &ClientFilter) -> bool {
    fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
      haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
    }

    filter
      .search
      .as_deref()
      .is_none_or(|s| contains_ci(Some(&self.business_name), s))
      && filter
        .industry
        .as_deref()
        .is_none_or(|i| self.client_industry == i)
      && filter
        .city
        .as_deref()
        .is_none_or(|c| contains_ci(self.city.as_deref(), c))
  }
}

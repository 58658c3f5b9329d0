use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::AccountNumber;

/// Business profile of a user; at most one per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
  pub id: Uuid,
  pub user_id: Uuid,
  pub company_name: Option<String>,
  /// Public URL of an uploaded logo
  pub company_logo: Option<String>,
  pub occupation: Option<String>,
  pub industry: Option<String>,
  pub country: Option<String>,
  pub city: Option<String>,
  pub state: Option<String>,
  pub zip_code: Option<String>,
  pub address: Option<String>,
  pub tax_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Partial profile edit; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfileUpdate {
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
}

impl Company {
  /// Creates an empty profile owned by `user_id`
  pub fn new(user_id: Uuid) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      user_id,
      company_name: None,
      company_logo: None,
      occupation: None,
      industry: None,
      country: None,
      city: None,
      state: None,
      zip_code: None,
      address: None,
      tax_id: None,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn apply(&mut self, update: CompanyProfileUpdate) {
    fn merge(target: &mut Option<String>, value: Option<String>) {
      if value.is_some() {
        *target = value;
      }
    }

    merge(&mut self.company_name, update.company_name);
    merge(&mut self.company_logo, update.company_logo);
    merge(&mut self.occupation, update.occupation);
    merge(&mut self.industry, update.industry);
    merge(&mut self.country, update.country);
    merge(&mut self.city, update.city);
    merge(&mut self.state, update.state);
    merge(&mut self.zip_code, update.zip_code);
    merge(&mut self.address, update.address);
    merge(&mut self.tax_id, update.tax_id);
    self.updated_at = Utc::now();
  }

  /// A profile is complete once name, logo, occupation and industry are all set
  pub fn is_complete(&self) -> bool {
    [
      &self.company_name,
      &self.company_logo,
      &self.occupation,
      &self.industry,
    ]
    .iter()
    .all(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
  }

  pub fn display_name(&self) -> &str {
    self.company_name.as_deref().unwrap_or_default()
  }

  /// Single-line "address, zip" used in document headers
  pub fn address_line(&self) -> String {
    [self.address.as_deref(), self.zip_code.as_deref()]
      .into_iter()
      .flatten()
      .filter(|part| !part.is_empty())
      .collect::<Vec<_>>()
      .join(", ")
  }
}

/// Bank account record a user can attach to invoices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
  pub id: Uuid,
  pub user_id: Uuid,
  pub account_type: String,
  pub bank_name: String,
  pub account_name: String,
  pub account_number: AccountNumber,
  pub swift_code: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Partial account edit; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountUpdate {
  pub account_type: Option<String>,
  pub bank_name: Option<String>,
  pub account_name: Option<String>,
  pub account_number: Option<AccountNumber>,
  pub swift_code: Option<String>,
}

impl Account {
  pub fn new(
    user_id: Uuid,
    account_type: String,
    bank_name: String,
    account_name: String,
    account_number: AccountNumber,
    swift_code: Option<String>,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      user_id,
      account_type,
      bank_name,
      account_name,
      account_number,
      swift_code,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn apply(&mut self, update: AccountUpdate) {
    if let Some(account_type) = update.account_type {
      self.account_type = account_type;
    }
    if let Some(bank_name) = update.bank_name {
      self.bank_name = bank_name;
    }
    if let Some(account_name) = update.account_name {
      self.account_name = account_name;
    }
    if let Some(account_number) = update.account_number {
      self.account_number = account_number;
    }
    if update.swift_code.is_some() {
      self.swift_code = update.swift_code;
    }
    self.updated_at = Utc::now();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_profile_apply_keeps_omitted_fields() {
    let mut company = Company::new(Uuid::new_v4());
    company.apply(CompanyProfileUpdate {
      company_name: Some("Acme".to_string()),
      city: Some("Lagos".to_string()),
      ..Default::default()
    });
    company.apply(CompanyProfileUpdate {
      city: Some("Abuja".to_string()),
      ..Default::default()
    });

    assert_eq!(company.company_name.as_deref(), Some("Acme"));
    assert_eq!(company.city.as_deref(), Some("Abuja"));
  }

  #[test]
  fn test_profile_completeness() {
    let mut company = Company::new(Uuid::new_v4());
    assert!(!company.is_complete());

    company.apply(CompanyProfileUpdate {
      company_name: Some("Acme".to_string()),
      company_logo: Some("https://cdn.example.com/logo.png".to_string()),
      occupation: Some("Consulting".to_string()),
      industry: Some("  ".to_string()),
      ..Default::default()
    });
    assert!(!company.is_complete());

    company.apply(CompanyProfileUpdate {
      industry: Some("Software".to_string()),
      ..Default::default()
    });
    assert!(company.is_complete());
  }

  #[test]
  fn test_address_line() {
    let mut company = Company::new(Uuid::new_v4());
    assert_eq!(company.address_line(), "");

    company.address = Some("1 Main St".to_string());
    company.zip_code = Some("10001".to_string());
    assert_eq!(company.address_line(), "1 Main St, 10001");
  }
}

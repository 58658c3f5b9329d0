use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::invoice::LineItemInput;
use crate::domain::client::{ClientFilter, ClientUpdate, NewClient};
use crate::domain::company::value_objects::ACCOUNT_NUMBER_REGEX;
use crate::domain::company::{
  AccountNumber, AccountUpdate, CompanyProfileUpdate, NewAccount, ValidationError,
};

/// Success envelope shared by every JSON endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
  pub status: &'static str,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
  pub fn success(message: impl Into<String>, data: T) -> Self {
    Self {
      status: "success",
      message: message.into(),
      data: Some(data),
    }
  }
}

impl ApiResponse<()> {
  pub fn message(message: impl Into<String>) -> Self {
    Self {
      status: "success",
      message: message.into(),
      data: None,
    }
  }
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  pub status: &'static str,
  /// Human-readable error message
  pub message: String,
}

impl ErrorResponse {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      status: "error",
      message: message.into(),
    }
  }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>,
{
  let value: Option<String> = Option::deserialize(deserializer)?;
  let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
    return Ok(None);
  };

  NaiveDate::parse_from_str(&value, "%Y-%m-%d")
    .or_else(|_| DateTime::parse_from_rfc3339(&value).map(|dt| dt.date_naive()))
    .map(Some)
    .map_err(|_| serde::de::Error::custom(format!("invalid date: {}", value)))
}

// Invoices

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
  #[validate(length(min = 1, max = 500, message = "Item name is required"))]
  pub item_name: String,
  pub quantity: Decimal,
  pub rate: Decimal,
  #[serde(default = "default_currency")]
  #[validate(length(min = 1, max = 10, message = "Currency is required"))]
  pub currency: String,
  #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
  pub description: Option<String>,
}

fn default_currency() -> String {
  "USD".to_string()
}

impl From<LineItemRequest> for LineItemInput {
  fn from(item: LineItemRequest) -> Self {
    Self {
      item_name: item.item_name,
      quantity: item.quantity,
      rate: item.rate,
      currency: item.currency,
      description: item.description,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
  pub client_id: Uuid,
  #[serde(default)]
  #[validate(nested)]
  pub items: Vec<LineItemRequest>,
  #[serde(default, deserialize_with = "deserialize_date")]
  pub issue_date: Option<NaiveDate>,
  #[serde(default, deserialize_with = "deserialize_date")]
  pub due_date: Option<NaiveDate>,
  #[validate(length(max = 50, message = "Phone number cannot exceed 50 characters"))]
  pub phone_number: Option<String>,
  #[validate(email(message = "Invalid email format"))]
  pub email: Option<String>,
  pub account_details_id: Option<Uuid>,
  pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
  pub client_id: Option<Uuid>,
  #[validate(nested)]
  pub items: Option<Vec<LineItemRequest>>,
  #[serde(default, deserialize_with = "deserialize_date")]
  pub issue_date: Option<NaiveDate>,
  #[serde(default, deserialize_with = "deserialize_date")]
  pub due_date: Option<NaiveDate>,
  #[validate(length(max = 50, message = "Phone number cannot exceed 50 characters"))]
  pub phone_number: Option<String>,
  #[validate(email(message = "Invalid email format"))]
  pub email: Option<String>,
  pub account_details_id: Option<Uuid>,
  pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvoicesQuery {
  pub page: Option<u32>,
  pub limit: Option<u32>,
  pub sort_by: Option<String>,
  pub order: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
  pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCountQuery {
  pub client_id: Option<Uuid>,
}

// Clients

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddClientRequest {
  #[validate(length(min = 1, max = 255, message = "Business name is required"))]
  pub business_name: String,
  #[validate(length(min = 1, max = 255, message = "Client industry is required"))]
  pub client_industry: String,
  #[validate(email(message = "Invalid email format"))]
  pub email: String,
  pub phone_number: Option<String>,
  pub country: Option<String>,
  pub city: Option<String>,
  pub zip_code: Option<String>,
  pub address: Option<String>,
}

impl From<AddClientRequest> for NewClient {
  fn from(request: AddClientRequest) -> Self {
    Self {
      business_name: request.business_name,
      client_industry: request.client_industry,
      email: request.email,
      phone_number: request.phone_number,
      country: request.country,
      city: request.city,
      zip_code: request.zip_code,
      address: request.address,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
  #[validate(length(min = 1, max = 255, message = "Business name cannot be empty"))]
  pub business_name: Option<String>,
  #[validate(length(min = 1, max = 255, message = "Client industry cannot be empty"))]
  pub client_industry: Option<String>,
  #[validate(email(message = "Invalid email format"))]
  pub email: Option<String>,
  pub phone_number: Option<String>,
  pub country: Option<String>,
  pub city: Option<String>,
  pub zip_code: Option<String>,
  pub address: Option<String>,
}

impl From<UpdateClientRequest> for ClientUpdate {
  fn from(request: UpdateClientRequest) -> Self {
    Self {
      business_name: request.business_name,
      client_industry: request.client_industry,
      email: request.email,
      phone_number: request.phone_number,
      country: request.country,
      city: request.city,
      zip_code: request.zip_code,
      address: request.address,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
  pub page: Option<u32>,
  pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
  pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilterQuery {
  pub search: Option<String>,
  pub industry: Option<String>,
  pub city: Option<String>,
}

impl From<ClientFilterQuery> for ClientFilter {
  fn from(query: ClientFilterQuery) -> Self {
    Self {
      search: query.search,
      industry: query.industry,
      city: query.city,
    }
  }
}

// Accounts

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddAccountRequest {
  #[validate(length(min = 1, max = 100, message = "Account type is required"))]
  pub account_type: String,
  #[validate(length(min = 1, max = 255, message = "Bank name is required"))]
  pub bank_name: String,
  #[validate(length(min = 1, max = 255, message = "Account name is required"))]
  pub account_name: String,
  #[validate(regex(
    path = *ACCOUNT_NUMBER_REGEX,
    message = "Account number must be exactly 10 digits."
  ))]
  pub account_number: String,
  #[validate(length(max = 20, message = "SWIFT code cannot exceed 20 characters"))]
  pub swift_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
  #[validate(length(min = 1, max = 100, message = "Account type cannot be empty"))]
  pub account_type: Option<String>,
  #[validate(length(min = 1, max = 255, message = "Bank name cannot be empty"))]
  pub bank_name: Option<String>,
  #[validate(length(min = 1, max = 255, message = "Account name cannot be empty"))]
  pub account_name: Option<String>,
  #[validate(regex(
    path = *ACCOUNT_NUMBER_REGEX,
    message = "Account number must be exactly 10 digits."
  ))]
  pub account_number: Option<String>,
  #[validate(length(max = 20, message = "SWIFT code cannot exceed 20 characters"))]
  pub swift_code: Option<String>,
}

impl TryFrom<AddAccountRequest> for NewAccount {
  type Error = ValidationError;

  fn try_from(request: AddAccountRequest) -> Result<Self, Self::Error> {
    Ok(Self {
      account_type: request.account_type,
      bank_name: request.bank_name,
      account_name: request.account_name,
      account_number: AccountNumber::new(request.account_number)?,
      swift_code: request.swift_code,
    })
  }
}

impl TryFrom<UpdateAccountRequest> for AccountUpdate {
  type Error = ValidationError;

  fn try_from(request: UpdateAccountRequest) -> Result<Self, Self::Error> {
    Ok(Self {
      account_type: request.account_type,
      bank_name: request.bank_name,
      account_name: request.account_name,
      account_number: request.account_number.map(AccountNumber::new).transpose()?,
      swift_code: request.swift_code,
    })
  }
}

// Company

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfileRequest {
  #[validate(length(max = 255, message = "Company name cannot exceed 255 characters"))]
  pub company_name: Option<String>,
  #[validate(url(message = "Company logo must be a URL"))]
  pub company_logo: Option<String>,
  pub occupation: Option<String>,
  pub industry: Option<String>,
  pub country: Option<String>,
  pub city: Option<String>,
  pub state: Option<String>,
  pub zip_code: Option<String>,
  pub address: Option<String>,
  #[validate(length(max = 50, message = "Tax ID cannot exceed 50 characters"))]
  pub tax_id: Option<String>,
}

impl From<CompanyProfileRequest> for CompanyProfileUpdate {
  fn from(request: CompanyProfileRequest) -> Self {
    Self {
      company_name: request.company_name,
      company_logo: request.company_logo,
      occupation: request.occupation,
      industry: request.industry,
      country: request.country,
      city: request.city,
      state: request.state,
      zip_code: request.zip_code,
      address: request.address,
      tax_id: request.tax_id,
    }
  }
}

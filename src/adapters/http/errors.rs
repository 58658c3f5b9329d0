use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::auth::AuthError;
use crate::domain::client::ClientError;
use crate::domain::company::CompanyError;
use crate::domain::invoice::InvoiceError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Missing or malformed input, or a rejected state change (400 Bad Request)
  Validation(String),

  /// No authenticated caller (401 Unauthorized)
  Unauthorized(String),

  /// Referenced record absent or not owned by the caller (404 Not Found)
  NotFound(String),

  /// Uniqueness or referential conflict (409 Conflict)
  Conflict(String),

  /// PDF or email pipeline failure; the message names the stage (500)
  Pipeline(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::Pipeline(msg) => write!(f, "Pipeline error: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Pipeline(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let message = match self {
      ApiError::Validation(msg)
      | ApiError::Unauthorized(msg)
      | ApiError::NotFound(msg)
      | ApiError::Conflict(msg) => msg.clone(),
      ApiError::Pipeline(msg) => {
        tracing::error!("Invoice pipeline failed: {}", msg);
        msg.clone()
      }
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        "Server error".to_string()
      }
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(ErrorResponse::new(message))
  }
}

impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    match error {
      InvoiceError::Validation(msg) => ApiError::Validation(msg),
      InvoiceError::ValueObject(e) => ApiError::Validation(e.to_string()),
      InvoiceError::InvalidState | InvoiceError::InvalidAmount => {
        ApiError::Validation(error.to_string())
      }
      InvoiceError::Unauthorized => ApiError::Unauthorized(error.to_string()),
      InvoiceError::CompanyNotFound
      | InvoiceError::ClientNotFound(_)
      | InvoiceError::AccountNotFound(_)
      | InvoiceError::InvoicesNotFound => ApiError::NotFound(error.to_string()),
      InvoiceError::InvoiceNotFound(_) => ApiError::NotFound("Invoice not found".to_string()),
      InvoiceError::DuplicateInvoiceNumber(_) => ApiError::Conflict(error.to_string()),
      InvoiceError::AssetFetch(e) => {
        tracing::error!("Asset fetch failed: {}", e);
        ApiError::Pipeline("Failed to fetch invoice assets".to_string())
      }
      InvoiceError::Render(e) => {
        tracing::error!("Render failed: {}", e);
        ApiError::Pipeline("Failed to generate invoice PDF".to_string())
      }
      InvoiceError::Email(e) => {
        tracing::error!("Email delivery failed: {}", e);
        ApiError::Pipeline("Failed to send invoice email".to_string())
      }
      InvoiceError::Repository(e) | InvoiceError::Internal(e) => ApiError::Internal(e),
      InvoiceError::Database(e) => ApiError::Internal(e.to_string()),
    }
  }
}

impl From<ClientError> for ApiError {
  fn from(error: ClientError) -> Self {
    match error {
      ClientError::NotFound(_) => ApiError::NotFound("Client not found".to_string()),
      ClientError::CompanyProfileNotFound => ApiError::NotFound(error.to_string()),
      ClientError::CompanyProfileIncomplete
      | ClientError::InvalidInput(_)
      | ClientError::Validation(_) => ApiError::Validation(error.to_string()),
      ClientError::BusinessNameAlreadyExists | ClientError::HasInvoices => {
        ApiError::Conflict(error.to_string())
      }
      ClientError::Company(e) => ApiError::from(e),
      ClientError::Repository(e) => ApiError::Internal(e),
      ClientError::Database(e) => ApiError::Internal(e.to_string()),
    }
  }
}

impl From<CompanyError> for ApiError {
  fn from(error: CompanyError) -> Self {
    match error {
      CompanyError::NotFound | CompanyError::AccountNotFound => {
        ApiError::NotFound(error.to_string())
      }
      CompanyError::AccountNumberAlreadyExists(_) => ApiError::Conflict(error.to_string()),
      CompanyError::Validation(e) => ApiError::Validation(e.to_string()),
      CompanyError::Repository(e) => ApiError::Internal(e),
      CompanyError::Database(e) => ApiError::Internal(e.to_string()),
    }
  }
}

impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidSession | AuthError::UserNotFound | AuthError::ValueObject(_) => {
        ApiError::Unauthorized("Invalid or expired session".to_string())
      }
      AuthError::Repository(e) => ApiError::Internal(e),
      AuthError::Database(e) => ApiError::Internal(e.to_string()),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    if messages.is_empty() {
      messages.push("Invalid request".to_string());
    }
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use uuid::Uuid;

  #[test]
  fn test_invoice_error_status_codes() {
    let cases = [
      (InvoiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
      (InvoiceError::InvalidState, StatusCode::BAD_REQUEST),
      (InvoiceError::InvalidAmount, StatusCode::BAD_REQUEST),
      (InvoiceError::Unauthorized, StatusCode::UNAUTHORIZED),
      (InvoiceError::CompanyNotFound, StatusCode::NOT_FOUND),
      (InvoiceError::ClientNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
      (InvoiceError::InvoiceNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
      (InvoiceError::InvoicesNotFound, StatusCode::NOT_FOUND),
      (
        InvoiceError::DuplicateInvoiceNumber("#INV_123456".into()),
        StatusCode::CONFLICT,
      ),
      (InvoiceError::AssetFetch("dns".into()), StatusCode::INTERNAL_SERVER_ERROR),
      (InvoiceError::Render("io".into()), StatusCode::INTERNAL_SERVER_ERROR),
      (InvoiceError::Email("smtp".into()), StatusCode::INTERNAL_SERVER_ERROR),
      (InvoiceError::Repository("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, status) in cases {
      assert_eq!(ApiError::from(error).status_code(), status);
    }
  }

  #[test]
  fn test_conflicts() {
    assert_eq!(
      ApiError::from(ClientError::BusinessNameAlreadyExists).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::from(ClientError::HasInvoices).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::from(CompanyError::AccountNumberAlreadyExists("0123456789".into())).status_code(),
      StatusCode::CONFLICT
    );
  }

  #[actix_web::test]
  async fn test_internal_details_are_hidden() {
    let response = ApiError::Internal("connection refused on 10.0.0.3".into()).error_response();
    let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Server error");
  }
}

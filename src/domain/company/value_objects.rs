use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ValidationError;

lazy_static! {
  /// Bank account numbers are exactly ten ASCII digits
  pub static ref ACCOUNT_NUMBER_REGEX: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

/// Bank account number value object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountNumber(String);

impl AccountNumber {
  pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
    let value = value.into().trim().to_string();
    if !ACCOUNT_NUMBER_REGEX.is_match(&value) {
      return Err(ValidationError::AccountNumberInvalid);
    }
    Ok(Self(value))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for AccountNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Trims a required text field, rejecting empty and oversized values
pub fn required_text(
  value: impl Into<String>,
  field: &'static str,
  max: usize,
) -> Result<String, ValidationError> {
  let trimmed = value.into().trim().to_string();
  if trimmed.is_empty() {
    return Err(ValidationError::MissingField { field });
  }
  if trimmed.len() > max {
    return Err(ValidationError::FieldTooLong { field, max });
  }
  Ok(trimmed)
}

/// Trims an optional text field; blank becomes `None`
pub fn optional_text(
  value: Option<String>,
  field: &'static str,
  max: usize,
) -> Result<Option<String>, ValidationError> {
  match value {
    Some(s) => {
      let trimmed = s.trim().to_string();
      if trimmed.is_empty() {
        Ok(None)
      } else if trimmed.len() > max {
        Err(ValidationError::FieldTooLong { field, max })
      } else {
        Ok(Some(trimmed))
      }
    }
    None => Ok(None),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_account_number_accepts_ten_digits() {
    let number = AccountNumber::new(" 0123456789 ").unwrap();
    assert_eq!(number.as_str(), "0123456789");
  }

  #[test]
  fn test_account_number_rejects_other_shapes() {
    for bad in ["012345678", "01234567890", "01234abc89", "", "０１２３４５６７８９"] {
      assert!(
        matches!(AccountNumber::new(bad), Err(ValidationError::AccountNumberInvalid)),
        "{bad} should be rejected"
      );
    }
  }

  #[test]
  fn test_required_text() {
    assert_eq!(required_text("  Acme ", "name", 10).unwrap(), "Acme");
    assert!(matches!(
      required_text("   ", "name", 10),
      Err(ValidationError::MissingField { field: "name" })
    ));
    assert!(matches!(
      required_text("x".repeat(11), "name", 10),
      Err(ValidationError::FieldTooLong { max: 10, .. })
    ));
  }

  #[test]
  fn test_optional_text_blank_is_none() {
    assert_eq!(optional_text(Some("  ".into()), "city", 10).unwrap(), None);
    assert_eq!(optional_text(None, "city", 10).unwrap(), None);
    assert_eq!(
      optional_text(Some(" Oslo ".into()), "city", 10).unwrap(),
      Some("Oslo".to_string())
    );
  }
}

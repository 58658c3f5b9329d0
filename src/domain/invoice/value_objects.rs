use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::calculator::DEFAULT_TAX_RATE_PERCENT;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid invoice number: {0}")]
  InvalidInvoiceNumber(String),
  #[error("Invalid invoice status: {0}")]
  InvalidStatus(String),
  #[error("Invalid line item: {0}")]
  InvalidLineItem(String),
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid rate: {0}")]
  InvalidRate(String),
  #[error("Invalid tax rate: {0}")]
  InvalidTaxRate(String),
  #[error("Invalid sort option: {0}")]
  InvalidSort(String),
}

// Invoice Number - server generated, `#INV_` followed by six digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
  pub const PREFIX: &'static str = "#INV_";
  pub const MIN_DIGITS: u32 = 100_000;
  pub const MAX_DIGITS: u32 = 999_999;

  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let digits = value
      .strip_prefix(Self::PREFIX)
      .ok_or_else(|| ValueObjectError::InvalidInvoiceNumber(value.clone()))?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_digit()) {
      return Err(ValueObjectError::InvalidInvoiceNumber(value));
    }
    Ok(Self(value))
  }

  pub fn from_digits(digits: u32) -> Result<Self, ValueObjectError> {
    if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
      return Err(ValueObjectError::InvalidInvoiceNumber(digits.to_string()));
    }
    Ok(Self(format!("{}{}", Self::PREFIX, digits)))
  }

  /// Builds a number from a generator draw, clamping into the six-digit range
  pub(crate) fn generated(digits: u32) -> Self {
    let digits = digits.clamp(Self::MIN_DIGITS, Self::MAX_DIGITS);
    Self(format!("{}{}", Self::PREFIX, digits))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }

  /// Name a rendered invoice is offered under, in downloads and email attachments
  pub fn attachment_file_name(&self) -> String {
    format!("invoice_{}.pdf", self.0)
  }
}

impl fmt::Display for InvoiceNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Invoice Reference - human readable, not unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceReference(String);

impl InvoiceReference {
  pub const PREFIX: &'static str = "#AB";

  /// `#AB` followed by the epoch milliseconds of `at`
  pub fn at(at: DateTime<Utc>) -> Self {
    Self(format!("{}{}", Self::PREFIX, at.timestamp_millis()))
  }

  pub fn generate() -> Self {
    Self::at(Utc::now())
  }

  /// Rehydrates a stored reference without re-validating it
  pub fn from_stored(value: String) -> Self {
    Self(value)
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for InvoiceReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Invoice Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InvoiceStatus {
  #[default]
  Draft,
  Completed,
}

impl InvoiceStatus {
  /// Draft may be re-saved or completed; Completed is terminal
  pub fn can_transition_to(&self, new_status: InvoiceStatus) -> bool {
    matches!(
      (self, new_status),
      (InvoiceStatus::Draft, InvoiceStatus::Draft) | (InvoiceStatus::Draft, InvoiceStatus::Completed)
    )
  }

  pub fn is_editable(&self) -> bool {
    matches!(self, InvoiceStatus::Draft)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Draft => "Draft",
      InvoiceStatus::Completed => "Completed",
    }
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "draft" => Ok(InvoiceStatus::Draft),
      "completed" => Ok(InvoiceStatus::Completed),
      _ => Err(ValueObjectError::InvalidStatus(s.to_string())),
    }
  }
}

// Line Item - embedded in the invoice document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
  pub item_name: String,
  pub quantity: Decimal,
  pub rate: Decimal,
  pub currency: String,
  pub description: Option<String>,
}

impl LineItem {
  const MAX_TEXT: usize = 500;

  pub fn new(
    item_name: impl Into<String>,
    quantity: Decimal,
    rate: Decimal,
    currency: impl Into<String>,
    description: Option<String>,
  ) -> Result<Self, ValueObjectError> {
    let item_name = item_name.into().trim().to_string();
    if item_name.is_empty() {
      return Err(ValueObjectError::InvalidLineItem(
        "Item name is required".to_string(),
      ));
    }
    if item_name.len() > Self::MAX_TEXT {
      return Err(ValueObjectError::InvalidLineItem(format!(
        "Item name cannot exceed {} characters",
        Self::MAX_TEXT
      )));
    }

    let currency = currency.into().trim().to_uppercase();
    if currency.is_empty() {
      return Err(ValueObjectError::InvalidLineItem(
        "Currency is required".to_string(),
      ));
    }

    if quantity <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be greater than zero".to_string(),
      ));
    }
    if rate <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidRate(
        "Rate must be greater than zero".to_string(),
      ));
    }

    let description = description
      .map(|d| d.trim().to_string())
      .filter(|d| !d.is_empty());

    Ok(Self {
      item_name,
      quantity,
      rate,
      currency,
      description,
    })
  }

  /// quantity * rate
  pub fn amount(&self) -> Decimal {
    self.quantity * self.rate
  }

  /// Text shown in the description column of documents
  pub fn display_label(&self) -> &str {
    self.description.as_deref().unwrap_or(&self.item_name)
  }
}

// Tax Rate - percentage applied to the subtotal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(Decimal);

impl TaxRate {
  pub fn from_percent(percent: Decimal) -> Result<Self, ValueObjectError> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
      return Err(ValueObjectError::InvalidTaxRate(
        "Tax rate must be between 0 and 100".to_string(),
      ));
    }
    Ok(Self(percent))
  }

  pub fn percent(&self) -> Decimal {
    self.0
  }

  pub fn as_multiplier(&self) -> Decimal {
    self.0 / Decimal::ONE_HUNDRED
  }
}

impl Default for TaxRate {
  fn default() -> Self {
    Self(Decimal::from(DEFAULT_TAX_RATE_PERCENT))
  }
}

impl fmt::Display for TaxRate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}%", self.0.normalize())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use rust_decimal_macros::dec;

  #[test]
  fn test_invoice_number_format() {
    let number = InvoiceNumber::from_digits(123456).unwrap();
    assert_eq!(number.value(), "#INV_123456");
    assert_eq!(InvoiceNumber::new("#INV_123456".to_string()).unwrap(), number);

    assert!(InvoiceNumber::from_digits(99_999).is_err());
    assert!(InvoiceNumber::from_digits(1_000_000).is_err());
    assert!(InvoiceNumber::new("INV_123456".to_string()).is_err());
    assert!(InvoiceNumber::new("#INV_12345a".to_string()).is_err());
    assert!(InvoiceNumber::new("#INV_1234567".to_string()).is_err());
    assert_eq!(number.attachment_file_name(), "invoice_#INV_123456.pdf");
  }

  #[test]
  fn test_reference_uses_epoch_millis() {
    let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    assert_eq!(InvoiceReference::at(at).value(), "#AB1700000000123");
  }

  #[test]
  fn test_status_transitions() {
    assert!(InvoiceStatus::Draft.can_transition_to(InvoiceStatus::Draft));
    assert!(InvoiceStatus::Draft.can_transition_to(InvoiceStatus::Completed));
    assert!(!InvoiceStatus::Completed.can_transition_to(InvoiceStatus::Draft));
    assert!(!InvoiceStatus::Completed.can_transition_to(InvoiceStatus::Completed));
    assert!(InvoiceStatus::Draft.is_editable());
    assert!(!InvoiceStatus::Completed.is_editable());
  }

  #[test]
  fn test_status_parsing() {
    assert_eq!("Draft".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Draft);
    assert_eq!(
      "completed".parse::<InvoiceStatus>().unwrap(),
      InvoiceStatus::Completed
    );
    assert!("Paid".parse::<InvoiceStatus>().is_err());
    assert_eq!(InvoiceStatus::default(), InvoiceStatus::Draft);
  }

  #[test]
  fn test_line_item_validation() {
    let item = LineItem::new(" Design ", dec!(2), dec!(50), "usd", None).unwrap();
    assert_eq!(item.item_name, "Design");
    assert_eq!(item.currency, "USD");
    assert_eq!(item.amount(), dec!(100));
    assert_eq!(item.display_label(), "Design");

    assert!(LineItem::new("", dec!(1), dec!(1), "USD", None).is_err());
    assert!(LineItem::new("X", dec!(-1), dec!(1), "USD", None).is_err());
    assert!(LineItem::new("X", dec!(1), dec!(-1), "USD", None).is_err());
    assert!(LineItem::new("X", dec!(1), dec!(1), " ", None).is_err());
  }

  #[test]
  fn test_line_item_rejects_zero_quantity_and_rate() {
    assert!(matches!(
      LineItem::new("Free", dec!(0), dec!(10), "USD", None),
      Err(ValueObjectError::InvalidQuantity(_))
    ));
    assert!(matches!(
      LineItem::new("Gift", dec!(1), dec!(0), "USD", None),
      Err(ValueObjectError::InvalidRate(_))
    ));
    assert!(matches!(
      LineItem::new("Gift", dec!(1), dec!(0.00), "USD", None),
      Err(ValueObjectError::InvalidRate(_))
    ));
  }

  #[test]
  fn test_line_item_prefers_description_for_display() {
    let item = LineItem::new(
      "Design",
      dec!(1),
      dec!(1),
      "USD",
      Some("Logo design, 3 rounds".to_string()),
    )
    .unwrap();
    assert_eq!(item.display_label(), "Logo design, 3 rounds");
  }

  #[test]
  fn test_tax_rate() {
    let rate = TaxRate::from_percent(dec!(10)).unwrap();
    assert_eq!(rate.as_multiplier(), dec!(0.1));
    assert_eq!(rate.to_string(), "10%");
    assert!(TaxRate::from_percent(dec!(-1)).is_err());
    assert!(TaxRate::from_percent(dec!(101)).is_err());
  }
}

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::errors::InvoiceError;
use super::value_objects::{LineItem, TaxRate};

/// Tax applied to every invoice unless configured otherwise
pub const DEFAULT_TAX_RATE_PERCENT: u32 = 10;

/// Derived financial totals of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
  pub sub_total: Decimal,
  pub tax: Decimal,
  pub total: Decimal,
}

/// Pure totals computation for a configured tax rate
#[derive(Debug, Clone, Copy)]
pub struct InvoiceCalculator {
  tax_rate: TaxRate,
}

impl InvoiceCalculator {
  pub fn new(tax_rate: TaxRate) -> Self {
    Self { tax_rate }
  }

  pub fn tax_rate(&self) -> TaxRate {
    self.tax_rate
  }

  /// subTotal = Σ quantity * rate, tax = subTotal * rate, total = subTotal + tax
  ///
  /// Tax is rounded to cents (half away from zero). Fails with `InvalidAmount` when the
  /// subtotal is not positive, which covers an empty list.
  pub fn compute_totals(&self, items: &[LineItem]) -> Result<InvoiceTotals, InvoiceError> {
    let sub_total: Decimal = items.iter().map(LineItem::amount).sum();
    if sub_total <= Decimal::ZERO {
      return Err(InvoiceError::InvalidAmount);
    }

    let tax = (sub_total * self.tax_rate.as_multiplier())
      .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Ok(InvoiceTotals {
      sub_total,
      tax,
      total: sub_total + tax,
    })
  }
}

impl Default for InvoiceCalculator {
  fn default() -> Self {
    Self::new(TaxRate::default())
  }
}

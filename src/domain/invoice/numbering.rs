use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use super::value_objects::InvoiceNumber;

/// Source of candidate invoice numbers
///
/// Candidates are not unique by construction; the store's unique index is the guarantee.
pub trait InvoiceNumberGenerator: Send + Sync {
  fn next_number(&self) -> InvoiceNumber;
}

/// Uniform draw from `#INV_100000..=#INV_999999`
pub struct RandomInvoiceNumberGenerator {
  rng: Mutex<StdRng>,
}

impl RandomInvoiceNumberGenerator {
  pub fn new() -> Self {
    Self {
      rng: Mutex::new(StdRng::from_entropy()),
    }
  }

  /// Deterministic sequence; two generators with the same seed yield the same numbers
  pub fn seeded(seed: u64) -> Self {
    Self {
      rng: Mutex::new(StdRng::seed_from_u64(seed)),
    }
  }
}

impl Default for RandomInvoiceNumberGenerator {
  fn default() -> Self {
    Self::new()
  }
}

impl InvoiceNumberGenerator for RandomInvoiceNumberGenerator {
  fn next_number(&self) -> InvoiceNumber {
    let digits = {
      let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
      rng.gen_range(InvoiceNumber::MIN_DIGITS..=InvoiceNumber::MAX_DIGITS)
    };
    InvoiceNumber::generated(digits)
  }
}

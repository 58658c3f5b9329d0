use serde::Serialize;

/// One-based page request shared by every list operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
  pub page: u32,
  pub limit: u32,
}

impl Page {
  pub const DEFAULT_PAGE: u32 = 1;
  pub const DEFAULT_LIMIT: u32 = 10;
  pub const MAX_LIMIT: u32 = 100;

  /// Builds a page, falling back to defaults for missing or zero values and capping the limit
  pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
    let page = page.filter(|p| *p > 0).unwrap_or(Self::DEFAULT_PAGE);
    let limit = limit
      .filter(|l| *l > 0)
      .unwrap_or(Self::DEFAULT_LIMIT)
      .min(Self::MAX_LIMIT);
    Self { page, limit }
  }

  pub fn offset(&self) -> i64 {
    (self.page as i64 - 1) * self.limit as i64
  }
}

impl Default for Page {
  fn default() -> Self {
    Self::new(None, None)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let page = Page::new(None, None);
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 10);
    assert_eq!(page.offset(), 0);
  }

  #[test]
  fn test_offset_and_cap() {
    let page = Page::new(Some(3), Some(20));
    assert_eq!(page.offset(), 40);

    let page = Page::new(Some(0), Some(1000));
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, Page::MAX_LIMIT);
  }
}

//! Page layout for invoice documents
//!
//! Coordinates are PDF points measured from the top-left corner of an A4 page.
//! The painter converts them to the bottom-left millimetre space printpdf uses.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::invoice::{InvoiceDocument, TaxRate};

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 50.0;

pub const LOGO_SIZE: f32 = 70.0;

// Item table columns
const COL_DESCRIPTION_X: f32 = MARGIN;
const COL_DESCRIPTION_WIDTH: f32 = 200.0;
const COL_QTY_WIDTH: f32 = 50.0;
const COL_RATE_WIDTH: f32 = 100.0;
const COL_AMOUNT_WIDTH: f32 = 100.0;
const TABLE_RIGHT: f32 =
  COL_DESCRIPTION_X + COL_DESCRIPTION_WIDTH + COL_QTY_WIDTH + COL_RATE_WIDTH + COL_AMOUNT_WIDTH;

const BODY_SIZE: f32 = 10.0;
const LINE_GAP: f32 = 4.0;

pub const THANK_YOU: &str = "Thank you for your business!";
pub const PAYMENT_TERMS: &str = "Please make payment within 30 days of receiving this invoice.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
  Regular,
  Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
  /// `y` is the top of the text line
  Text {
    text: String,
    x: f32,
    y: f32,
    size: f32,
    weight: FontWeight,
  },
  Rule {
    x1: f32,
    x2: f32,
    y: f32,
  },
  /// Placement box for the company logo
  Logo {
    x: f32,
    y: f32,
    size: f32,
  },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceLayout {
  pub pages: Vec<Vec<DrawOp>>,
}

impl InvoiceLayout {
  /// Every text run in drawing order, across pages
  pub fn texts(&self) -> impl Iterator<Item = &str> {
    self.pages.iter().flatten().filter_map(|op| match op {
      DrawOp::Text { text, .. } => Some(text.as_str()),
      _ => None,
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
  Left,
  Right,
  Center,
}

/// Cursor-driven page builder that starts a new page when content would cross the bottom margin
struct PageWriter {
  pages: Vec<Vec<DrawOp>>,
  y: f32,
}

impl PageWriter {
  fn new() -> Self {
    Self {
      pages: vec![Vec::new()],
      y: MARGIN,
    }
  }

  fn current(&mut self) -> &mut Vec<DrawOp> {
    // pages is never empty
    let last = self.pages.len() - 1;
    &mut self.pages[last]
  }

  fn ensure_space(&mut self, height: f32) {
    if self.y + height > PAGE_HEIGHT - MARGIN {
      self.pages.push(Vec::new());
      self.y = MARGIN;
    }
  }

  fn text_at(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, weight: FontWeight) {
    self.current().push(DrawOp::Text {
      text: text.into(),
      x,
      y,
      size,
      weight,
    });
  }

  /// Writes one line inside `[left, left + width]` and advances the cursor
  fn line(
    &mut self,
    text: impl Into<String>,
    size: f32,
    weight: FontWeight,
    align: Align,
    left: f32,
    width: f32,
  ) {
    let text = text.into();
    self.ensure_space(size + LINE_GAP);
    let x = aligned_x(&text, size, align, left, width);
    let y = self.y;
    self.text_at(text, x, y, size, weight);
    self.y += size + LINE_GAP;
  }

  fn full_line(&mut self, text: impl Into<String>, size: f32, weight: FontWeight, align: Align) {
    self.line(text, size, weight, align, MARGIN, PAGE_WIDTH - 2.0 * MARGIN);
  }

  fn rule(&mut self, x1: f32, x2: f32) {
    let y = self.y;
    self.current().push(DrawOp::Rule { x1, x2, y });
  }

  fn gap(&mut self, height: f32) {
    self.y += height;
  }

  fn finish(self) -> InvoiceLayout {
    InvoiceLayout { pages: self.pages }
  }
}

/// Approximate Helvetica advance width
pub fn text_width(text: &str, size: f32) -> f32 {
  let em: f32 = text
    .chars()
    .map(|c| match c {
      ' ' | '.' | ',' | ':' | ';' | '!' | 'i' | 'j' | 'l' | 'I' | '\'' | '|' => 0.278,
      'f' | 't' | 'r' | '(' | ')' | '-' | '/' => 0.333,
      'm' | 'M' | 'W' => 0.833,
      'w' => 0.722,
      c if c.is_ascii_digit() => 0.556,
      c if c.is_ascii_uppercase() => 0.667,
      '#' | '$' | '_' => 0.556,
      _ => 0.5,
    })
    .sum();
  em * size
}

fn aligned_x(text: &str, size: f32, align: Align, left: f32, width: f32) -> f32 {
  match align {
    Align::Left => left,
    Align::Right => (left + width - text_width(text, size)).max(left),
    Align::Center => (left + (width - text_width(text, size)) / 2.0).max(left),
  }
}

/// Greedy word wrap against the estimated width
fn wrap(text: &str, size: f32, width: f32) -> Vec<String> {
  let mut lines = Vec::new();
  let mut current = String::new();

  for word in text.split_whitespace() {
    let candidate = if current.is_empty() {
      word.to_string()
    } else {
      format!("{} {}", current, word)
    };
    if text_width(&candidate, size) <= width || current.is_empty() {
      current = candidate;
    } else {
      lines.push(std::mem::replace(&mut current, word.to_string()));
    }
  }
  if !current.is_empty() || lines.is_empty() {
    lines.push(current);
  }
  lines
}

/// `$` followed by exactly two fractional digits, half-cents rounded away from zero
pub fn format_money(value: Decimal) -> String {
  let cents = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  format!("${:.2}", cents)
}

/// Quantities print as given, without trailing zeros
pub fn format_quantity(value: Decimal) -> String {
  value.normalize().to_string()
}

/// Positions every element of the invoice
///
/// `with_logo` reserves the logo box; the painter fills it with the fetched image.
pub fn layout_invoice(document: &InvoiceDocument, tax_rate: TaxRate, with_logo: bool) -> InvoiceLayout {
  let invoice = &document.invoice;
  let company = &document.company;
  let client = &document.client;

  let mut page = PageWriter::new();
  let content_width = PAGE_WIDTH - 2.0 * MARGIN;

  // Header: logo, company name on the left, address and tax id on the right
  if with_logo {
    page.current().push(DrawOp::Logo {
      x: MARGIN,
      y: MARGIN,
      size: LOGO_SIZE,
    });
  }
  let header_y = MARGIN + if with_logo { LOGO_SIZE + 10.0 } else { 0.0 };
  page.text_at(company.display_name(), MARGIN, header_y, 20.0, FontWeight::Bold);

  let right_block_left = MARGIN + 180.0;
  let right_block_width = PAGE_WIDTH - MARGIN - right_block_left;
  let address = company.address_line();
  if !address.is_empty() {
    let x = aligned_x(&address, BODY_SIZE, Align::Right, right_block_left, right_block_width);
    page.text_at(address, x, header_y, BODY_SIZE, FontWeight::Regular);
  }
  if let Some(tax_id) = company.tax_id.as_deref().filter(|t| !t.is_empty()) {
    let text = format!("TAX ID: {}", tax_id);
    let x = aligned_x(&text, BODY_SIZE, Align::Right, right_block_left, right_block_width);
    page.text_at(text, x, header_y + 20.0, BODY_SIZE, FontWeight::Regular);
  }
  page.y = header_y + 50.0;

  // Title
  page.full_line("Invoice", 16.0, FontWeight::Bold, Align::Center);
  page.gap(12.0);

  // Billing block
  page.full_line(
    format!("Billed to: {}", client.business_name),
    12.0,
    FontWeight::Regular,
    Align::Left,
  );
  let client_address = client.address_line();
  if !client_address.is_empty() {
    page.full_line(client_address, 12.0, FontWeight::Regular, Align::Left);
  }
  if let Some(phone) = client.phone_number.as_deref().filter(|p| !p.is_empty()) {
    page.full_line(phone, 12.0, FontWeight::Regular, Align::Left);
  }
  page.gap(12.0);

  // Metadata
  page.full_line(
    format!("Invoice date: {}", invoice.issue_date.format("%Y-%m-%d")),
    BODY_SIZE,
    FontWeight::Regular,
    Align::Left,
  );
  page.full_line(
    format!("Due date: {}", invoice.due_date.format("%Y-%m-%d")),
    BODY_SIZE,
    FontWeight::Regular,
    Align::Left,
  );
  page.full_line(
    format!("Invoice number: {}", invoice.invoice_number),
    BODY_SIZE,
    FontWeight::Regular,
    Align::Left,
  );
  if let Some(reference) = &invoice.reference {
    page.full_line(
      format!("Reference: {}", reference),
      BODY_SIZE,
      FontWeight::Regular,
      Align::Left,
    );
  }
  page.gap(24.0);

  // Item table header
  let qty_left = COL_DESCRIPTION_X + COL_DESCRIPTION_WIDTH;
  let rate_left = qty_left + COL_QTY_WIDTH;
  let amount_left = rate_left + COL_RATE_WIDTH;

  page.ensure_space(BODY_SIZE * 3.0);
  let header_row_y = page.y;
  page.text_at("Item Description", COL_DESCRIPTION_X, header_row_y, BODY_SIZE, FontWeight::Bold);
  for (label, left, width) in [
    ("Qty", qty_left, COL_QTY_WIDTH),
    ("Rate", rate_left, COL_RATE_WIDTH),
    ("Amount", amount_left, COL_AMOUNT_WIDTH),
  ] {
    let x = aligned_x(label, BODY_SIZE, Align::Right, left, width);
    page.text_at(label, x, header_row_y, BODY_SIZE, FontWeight::Bold);
  }
  page.gap(BODY_SIZE + 8.0);
  page.rule(COL_DESCRIPTION_X, TABLE_RIGHT);
  page.gap(10.0);

  // Item rows
  for item in &invoice.items {
    let description = wrap(item.display_label(), BODY_SIZE, COL_DESCRIPTION_WIDTH - 5.0);
    let row_height = description.len() as f32 * (BODY_SIZE + LINE_GAP) + 10.0;
    page.ensure_space(row_height);

    let row_y = page.y;
    for (i, line) in description.iter().enumerate() {
      let y = row_y + i as f32 * (BODY_SIZE + LINE_GAP);
      page.text_at(line.clone(), COL_DESCRIPTION_X, y, BODY_SIZE, FontWeight::Regular);
    }
    for (value, left, width) in [
      (format_quantity(item.quantity), qty_left, COL_QTY_WIDTH),
      (format_money(item.rate), rate_left, COL_RATE_WIDTH),
      (format_money(item.amount()), amount_left, COL_AMOUNT_WIDTH),
    ] {
      let x = aligned_x(&value, BODY_SIZE, Align::Right, left, width);
      page.text_at(value, x, row_y, BODY_SIZE, FontWeight::Regular);
    }
    page.gap(row_height);
  }
  page.rule(COL_DESCRIPTION_X, TABLE_RIGHT);
  page.gap(12.0);

  // Summary, right-aligned to the table edge
  let summary_left = rate_left;
  let summary_width = TABLE_RIGHT - summary_left;
  page.line(
    format!("Subtotal: {}", format_money(invoice.sub_total)),
    BODY_SIZE,
    FontWeight::Regular,
    Align::Right,
    summary_left,
    summary_width,
  );
  page.line(
    format!("Tax ({}): {}", tax_rate, format_money(invoice.tax)),
    BODY_SIZE,
    FontWeight::Regular,
    Align::Right,
    summary_left,
    summary_width,
  );
  page.line(
    format!("Total: {}", format_money(invoice.total)),
    12.0,
    FontWeight::Bold,
    Align::Right,
    summary_left,
    summary_width,
  );

  // Payment details only when an account resolved
  if let Some(account) = &document.account {
    page.gap(12.0);
    page.ensure_space(4.0 * (BODY_SIZE + LINE_GAP));
    page.full_line("Payment details:", BODY_SIZE, FontWeight::Bold, Align::Left);
    page.full_line(
      format!("Bank: {}", account.bank_name),
      BODY_SIZE,
      FontWeight::Regular,
      Align::Left,
    );
    if let Some(swift) = account.swift_code.as_deref().filter(|s| !s.is_empty()) {
      page.full_line(
        format!("SWIFT: {}", swift),
        BODY_SIZE,
        FontWeight::Regular,
        Align::Left,
      );
    }
    page.full_line(
      format!("Account Number: {}", account.account_number),
      BODY_SIZE,
      FontWeight::Regular,
      Align::Left,
    );
  }

  // Closing
  page.gap(12.0);
  page.ensure_space(2.0 * (BODY_SIZE + LINE_GAP));
  page.line(THANK_YOU, BODY_SIZE, FontWeight::Regular, Align::Center, MARGIN, content_width);
  page.line(PAYMENT_TERMS, BODY_SIZE, FontWeight::Regular, Align::Center, MARGIN, content_width);

  page.finish()
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::domain::auth::User;
  use crate::domain::client::Client;
  use crate::domain::company::{Account, AccountNumber, Company};
  use crate::domain::invoice::entities::InvoiceDraft;
  use crate::domain::invoice::{
    Invoice, InvoiceCalculator, InvoiceNumber, InvoiceReference, InvoiceStatus, LineItem,
  };
  use chrono::NaiveDate;
  use rust_decimal_macros::dec;

  pub(crate) fn document(items: Vec<LineItem>, with_account: bool) -> InvoiceDocument {
    let user = User::new(
      "Ada".to_string(),
      "Lovelace".to_string(),
      "ada@example.com".to_string(),
    );
    let mut company = Company::new(user.id);
    company.company_name = Some("Acme".to_string());
    company.address = Some("1 Main St".to_string());
    company.zip_code = Some("10001".to_string());
    company.tax_id = Some("TX-42".to_string());

    let mut client = Client::new(
      user.id,
      "Globex".to_string(),
      "Retail".to_string(),
      "ap@globex.test".to_string(),
    );
    client.phone_number = Some("+1 555 0100".to_string());

    let account = with_account.then(|| {
      Account::new(
        user.id,
        "Savings".to_string(),
        "First Bank".to_string(),
        "Acme Ltd".to_string(),
        AccountNumber::new("0123456789").unwrap(),
        Some("FBNINGLA".to_string()),
      )
    });

    let totals = InvoiceCalculator::default().compute_totals(&items).unwrap();
    let invoice = Invoice::new(
      InvoiceDraft {
        user_id: user.id,
        company_id: company.id,
        client_id: client.id,
        account: account
          .as_ref()
          .map(|a| (a.id, a.account_number.as_str().to_string())),
        reference: InvoiceReference::from_stored("#AB1700000000000".to_string()),
        items,
        totals,
        status: InvoiceStatus::Draft,
        issue_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        phone_number: None,
        email: None,
      },
      InvoiceNumber::from_digits(123456).unwrap(),
    );

    InvoiceDocument {
      invoice,
      user,
      company,
      client,
      account,
    }
  }

  pub(crate) fn items() -> Vec<LineItem> {
    vec![
      LineItem::new("Design", dec!(2), dec!(50), "USD", None).unwrap(),
      LineItem::new("Hosting", dec!(1), dec!(10), "USD", None).unwrap(),
    ]
  }

  #[test]
  fn test_money_and_quantity_formatting() {
    assert_eq!(format_money(dec!(110)), "$110.00");
    assert_eq!(format_money(dec!(0.5)), "$0.50");
    assert_eq!(format_money(dec!(2.999)), "$3.00");
    assert_eq!(format_money(dec!(0.055)), "$0.06");
    assert_eq!(format_money(dec!(1.235)), "$1.24");
    assert_eq!(format_money(dec!(1.234)), "$1.23");
    assert_eq!(format_quantity(dec!(2.00)), "2");
    assert_eq!(format_quantity(dec!(1.5)), "1.5");
  }

  #[test]
  fn test_sections_in_order() {
    let layout = layout_invoice(&document(items(), true), TaxRate::default(), false);
    let texts: Vec<&str> = layout.texts().collect();

    let position = |needle: &str| {
      texts
        .iter()
        .position(|t| t.starts_with(needle))
        .unwrap_or_else(|| panic!("missing {needle}"))
    };

    assert!(position("Acme") < position("Invoice"));
    assert!(position("Invoice") < position("Billed to: Globex"));
    assert!(position("Billed to") < position("Invoice date: 2024-01-01"));
    assert!(position("Due date: 2024-01-31") < position("Invoice number: #INV_123456"));
    assert!(position("Reference: #AB1700000000000") < position("Item Description"));
    assert!(position("Item Description") < position("Subtotal: $110.00"));
    assert!(position("Tax (10%): $11.00") < position("Total: $121.00"));
    assert!(position("Total") < position("Payment details:"));
    assert!(position("Account Number: 0123456789") < position(THANK_YOU));
    assert!(texts.contains(&"TAX ID: TX-42"));
    assert!(texts.contains(&"$100.00"));
    assert!(texts.contains(&"$10.00"));
  }

  #[test]
  fn test_payment_block_omitted_without_account() {
    let layout = layout_invoice(&document(items(), false), TaxRate::default(), false);
    let texts: Vec<&str> = layout.texts().collect();

    assert!(!texts.iter().any(|t| t.starts_with("Payment details")));
    assert!(!texts.iter().any(|t| t.starts_with("Account Number")));
    assert!(texts.contains(&PAYMENT_TERMS));
  }

  #[test]
  fn test_logo_box_reserved_only_when_requested() {
    let has_logo = |layout: &InvoiceLayout| {
      layout.pages[0]
        .iter()
        .any(|op| matches!(op, DrawOp::Logo { .. }))
    };
    assert!(has_logo(&layout_invoice(&document(items(), false), TaxRate::default(), true)));
    assert!(!has_logo(&layout_invoice(&document(items(), false), TaxRate::default(), false)));
  }

  #[test]
  fn test_many_items_overflow_to_new_pages() {
    let many: Vec<LineItem> = (0..80)
      .map(|i| LineItem::new(format!("Item {i}"), dec!(1), dec!(1), "USD", None).unwrap())
      .collect();
    let layout = layout_invoice(&document(many, false), TaxRate::default(), false);

    assert!(layout.pages.len() > 1);
    for op in layout.pages.iter().flatten() {
      if let DrawOp::Text { y, .. } = op {
        assert!(*y >= MARGIN && *y <= PAGE_HEIGHT - MARGIN);
      }
    }
    assert_eq!(layout.texts().filter(|t| t.starts_with("Item ")).count(), 81);
  }

  #[test]
  fn test_wrap_long_descriptions() {
    let lines = wrap(
      "A very long description that certainly does not fit into a two hundred point column",
      BODY_SIZE,
      COL_DESCRIPTION_WIDTH - 5.0,
    );
    assert!(lines.len() > 1);
    assert!(wrap("", BODY_SIZE, 100.0) == vec![String::new()]);
  }

  #[test]
  fn test_tax_label_uses_configured_rate() {
    let rate = TaxRate::from_percent(dec!(7.5)).unwrap();
    let layout = layout_invoice(&document(items(), false), rate, false);
    assert!(layout.texts().any(|t| t.starts_with("Tax (7.5%): ")));
  }
}

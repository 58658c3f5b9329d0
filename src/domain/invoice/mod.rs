pub mod calculator;
pub mod entities;
pub mod errors;
pub mod numbering;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use calculator::{DEFAULT_TAX_RATE_PERCENT, InvoiceCalculator, InvoiceTotals};
pub use entities::{
  Invoice, InvoiceDocument, InvoiceListQuery, InvoicePatch, InvoiceSortField, InvoiceSummary,
  SortOrder,
};
pub use errors::InvoiceError;
pub use numbering::{InvoiceNumberGenerator, RandomInvoiceNumberGenerator};
pub use ports::{
  EmailAttachment, EmailSender, InvoiceRenderer, InvoiceRepository, OutgoingEmail,
  ShareEmailTemplate,
};
pub use services::{InvoiceService, InvoiceServiceConfig, InvoiceServiceDependencies, NewInvoice};
pub use value_objects::{
  InvoiceNumber, InvoiceReference, InvoiceStatus, LineItem, TaxRate, ValueObjectError,
};

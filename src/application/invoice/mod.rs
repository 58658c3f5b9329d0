pub mod count_invoices;
pub mod create_invoice;
pub mod delete_invoice;
pub mod download_invoice;
pub mod filter_invoices;
pub mod get_invoice;
pub mod list_invoices;
pub mod share_invoices;
pub mod update_invoice;

pub use count_invoices::{
  CountCompletedInvoicesCommand, CountCompletedInvoicesResponse, CountCompletedInvoicesUseCase,
};
pub use create_invoice::{
  CreateInvoiceCommand, CreateInvoiceResponse, CreateInvoiceUseCase, LineItemInput,
};
pub use delete_invoice::{DeleteInvoiceCommand, DeleteInvoiceUseCase};
pub use download_invoice::{DownloadInvoiceCommand, DownloadInvoiceUseCase, DownloadedInvoice};
pub use filter_invoices::{
  FilterInvoicesByStatusUseCase, FilterInvoicesCommand, FilterInvoicesResponse,
};
pub use get_invoice::{
  GetInvoiceCommand, GetInvoiceUseCase, InvoiceAccountDto, InvoiceClientDto, InvoiceCompanyDto,
  InvoiceDetailsResponse, InvoiceDto, LineItemDto,
};
pub use list_invoices::{
  InvoiceListItemDto, ListInvoicesCommand, ListInvoicesResponse, ListInvoicesUseCase,
  PaginationDto,
};
pub use share_invoices::{
  ShareInvoicesCommand, ShareInvoicesDependencies, ShareInvoicesResponse, ShareInvoicesUseCase,
  SharedFileDto, parse_invoice_ids,
};
pub use update_invoice::{UpdateInvoiceCommand, UpdateInvoiceUseCase};

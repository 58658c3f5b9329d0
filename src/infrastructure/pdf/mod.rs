pub mod asset_fetcher;
pub mod layout;
pub mod printpdf_renderer;

pub use asset_fetcher::{AssetFetcher, FetchedAsset, HttpAssetFetcher};
pub use printpdf_renderer::{PrintPdfInvoiceRenderer, output_file_name};

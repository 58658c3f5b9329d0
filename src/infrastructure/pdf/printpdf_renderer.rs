use async_trait::async_trait;
use printpdf::image_crate::GenericImageView;
use printpdf::{
  BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference,
  Point,
};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::invoice::{InvoiceDocument, InvoiceError, InvoiceRenderer, TaxRate};

use super::asset_fetcher::{AssetFetcher, is_fetchable};
use super::layout::{self, DrawOp, FontWeight, InvoiceLayout, PAGE_HEIGHT, PAGE_WIDTH};

const PT_TO_MM: f32 = 25.4 / 72.0;
// Distance from the top of a text line to its baseline, as a fraction of font size
const ASCENT: f32 = 0.8;

/// File name on disk; anything outside `[A-Za-z0-9_-]` becomes `_`
pub fn output_file_name(invoice_number: &str) -> String {
  let sanitized: String = invoice_number
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
        c
      } else {
        '_'
      }
    })
    .collect();
  format!("invoice_{}.pdf", sanitized)
}

/// Renders invoices to A4 PDF files with printpdf
pub struct PrintPdfInvoiceRenderer {
  output_dir: PathBuf,
  tax_rate: TaxRate,
  fetcher: Arc<dyn AssetFetcher>,
}

impl PrintPdfInvoiceRenderer {
  pub fn new(output_dir: impl Into<PathBuf>, tax_rate: TaxRate, fetcher: Arc<dyn AssetFetcher>) -> Self {
    Self {
      output_dir: output_dir.into(),
      tax_rate,
      fetcher,
    }
  }

  pub fn output_dir(&self) -> &Path {
    &self.output_dir
  }

  async fn load_logo(&self, document: &InvoiceDocument) -> Result<Option<Vec<u8>>, InvoiceError> {
    let Some(url) = document
      .company
      .company_logo
      .as_deref()
      .filter(|url| is_fetchable(url))
    else {
      return Ok(None);
    };

    let asset = self.fetcher.fetch(url.trim()).await?;
    Ok(Some(asset.read().await?))
  }
}

#[async_trait]
impl InvoiceRenderer for PrintPdfInvoiceRenderer {
  async fn render(&self, document: &InvoiceDocument) -> Result<PathBuf, InvoiceError> {
    let invoice_number = document.invoice.invoice_number.value().to_string();
    let logo = self.load_logo(document).await?;

    let page_layout = layout::layout_invoice(document, self.tax_rate, logo.is_some());
    let title = format!("Invoice {}", invoice_number);

    // The printpdf document is not Send; build it off the async executor
    let bytes = tokio::task::spawn_blocking(move || paint(&title, &page_layout, logo.as_deref()))
      .await
      .map_err(|e| InvoiceError::Render(format!("Render task failed: {}", e)))??;

    tokio::fs::create_dir_all(&self.output_dir)
      .await
      .map_err(|e| InvoiceError::Render(format!("Failed to create output directory: {}", e)))?;

    let path = self.output_dir.join(output_file_name(&invoice_number));
    tokio::fs::write(&path, &bytes)
      .await
      .map_err(|e| InvoiceError::Render(format!("Failed to write {}: {}", path.display(), e)))?;

    tracing::info!(
      invoice_id = %document.invoice.id,
      invoice_number = %invoice_number,
      path = %path.display(),
      "Invoice PDF rendered"
    );
    Ok(path)
  }
}

fn mm(points: f32) -> Mm {
  Mm(points * PT_TO_MM)
}

/// Converts a top-left point offset to printpdf's bottom-left origin
fn from_top(points: f32) -> Mm {
  mm(PAGE_HEIGHT - points)
}

fn paint(title: &str, page_layout: &InvoiceLayout, logo: Option<&[u8]>) -> Result<Vec<u8>, InvoiceError> {
  let render_err = |e: printpdf::Error| InvoiceError::Render(e.to_string());

  let logo = logo
    .map(|bytes| {
      printpdf::image_crate::load_from_memory(bytes)
        .map(|image| printpdf::image_crate::DynamicImage::ImageRgb8(image.to_rgb8()))
        .map_err(|e| InvoiceError::AssetFetch(format!("Logo is not a supported image: {}", e)))
    })
    .transpose()?;

  let (doc, first_page, first_layer) =
    PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
  let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?;
  let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_err)?;

  for (index, ops) in page_layout.pages.iter().enumerate() {
    let layer = if index == 0 {
      doc.get_page(first_page).get_layer(first_layer)
    } else {
      let (page, layer) = doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
      doc.get_page(page).get_layer(layer)
    };

    for op in ops {
      match op {
        DrawOp::Text {
          text,
          x,
          y,
          size,
          weight,
        } => {
          let font = match weight {
            FontWeight::Regular => &regular,
            FontWeight::Bold => &bold,
          };
          put_text(&layer, font, text, *size, *x, *y + size * ASCENT);
        }
        DrawOp::Rule { x1, x2, y } => {
          layer.add_line(Line {
            points: vec![
              (Point::new(mm(*x1), from_top(*y)), false),
              (Point::new(mm(*x2), from_top(*y)), false),
            ],
            is_closed: false,
          });
        }
        DrawOp::Logo { x, y, size } => {
          if let Some(image) = &logo {
            place_logo(&layer, image, *x, *y, *size);
          }
        }
      }
    }
  }

  let mut writer = BufWriter::new(Vec::<u8>::new());
  doc.save(&mut writer).map_err(render_err)?;
  writer
    .into_inner()
    .map_err(|e| InvoiceError::Render(e.to_string()))
}

fn put_text(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, size: f32, x: f32, baseline: f32) {
  layer.use_text(text, size, mm(x), from_top(baseline), font);
}

/// Fits the image into a `size` x `size` box anchored at the box's top-left corner
fn place_logo(
  layer: &PdfLayerReference,
  image: &printpdf::image_crate::DynamicImage,
  x: f32,
  y: f32,
  size: f32,
) {
  let (width_px, height_px) = (image.width().max(1) as f32, image.height().max(1) as f32);
  let box_mm = size * PT_TO_MM;
  let dpi = width_px.max(height_px) * 25.4 / box_mm;
  let drawn_height = height_px / dpi * 25.4 / PT_TO_MM;

  Image::from_dynamic_image(image).add_to_layer(
    layer.clone(),
    ImageTransform {
      translate_x: Some(mm(x)),
      translate_y: Some(from_top(y + drawn_height)),
      dpi: Some(dpi),
      ..Default::default()
    },
  );
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::pdf::asset_fetcher::FetchedAsset;
  use crate::infrastructure::pdf::layout::tests::{document, items};
  use printpdf::image_crate::{DynamicImage, ImageFormat, RgbImage};
  use std::io::Cursor;
  use std::sync::atomic::{AtomicUsize, Ordering};

  struct StaticFetcher {
    bytes: Vec<u8>,
    calls: AtomicUsize,
  }

  #[async_trait]
  impl AssetFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchedAsset, InvoiceError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      FetchedAsset::from_bytes(&self.bytes)
    }
  }

  struct FailingFetcher;

  #[async_trait]
  impl AssetFetcher for FailingFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedAsset, InvoiceError> {
      Err(InvoiceError::AssetFetch(format!("{} unreachable", url)))
    }
  }

  fn png() -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(8, 4))
      .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
      .unwrap();
    bytes
  }

  fn static_fetcher(bytes: Vec<u8>) -> Arc<StaticFetcher> {
    Arc::new(StaticFetcher {
      bytes,
      calls: AtomicUsize::new(0),
    })
  }

  #[test]
  fn test_file_names() {
    assert_eq!(output_file_name("#INV_123456"), "invoice__INV_123456.pdf");
    assert_eq!(output_file_name("../x"), "invoice____x.pdf");
  }

  #[tokio::test]
  async fn test_render_without_logo_writes_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = static_fetcher(png());
    let renderer = PrintPdfInvoiceRenderer::new(
      dir.path().join("out"),
      TaxRate::default(),
      fetcher.clone(),
    );

    let path = renderer.render(&document(items(), true)).await.unwrap();

    assert_eq!(path, dir.path().join("out").join("invoice__INV_123456.pdf"));
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_render_with_logo_fetches_once() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = static_fetcher(png());
    let renderer = PrintPdfInvoiceRenderer::new(dir.path(), TaxRate::default(), fetcher.clone());

    let mut doc = document(items(), false);
    doc.company.company_logo = Some("https://cdn.example.com/logo.png".to_string());

    let path = renderer.render(&doc).await.unwrap();
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_non_http_logo_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let renderer =
      PrintPdfInvoiceRenderer::new(dir.path(), TaxRate::default(), Arc::new(FailingFetcher));

    let mut doc = document(items(), false);
    doc.company.company_logo = Some("uploads/logo.png".to_string());

    assert!(renderer.render(&doc).await.is_ok());
  }

  #[tokio::test]
  async fn test_logo_fetch_failure_aborts_render() {
    let dir = tempfile::tempdir().unwrap();
    let renderer =
      PrintPdfInvoiceRenderer::new(dir.path(), TaxRate::default(), Arc::new(FailingFetcher));

    let mut doc = document(items(), false);
    doc.company.company_logo = Some("https://cdn.example.com/logo.png".to_string());

    let result = renderer.render(&doc).await;
    assert!(matches!(result, Err(InvoiceError::AssetFetch(_))));
    assert!(!dir.path().join("invoice__INV_123456.pdf").exists());
  }

  #[tokio::test]
  async fn test_undecodable_logo_is_asset_error() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = PrintPdfInvoiceRenderer::new(
      dir.path(),
      TaxRate::default(),
      static_fetcher(b"not an image".to_vec()),
    );

    let mut doc = document(items(), false);
    doc.company.company_logo = Some("https://cdn.example.com/logo.png".to_string());

    assert!(matches!(
      renderer.render(&doc).await,
      Err(InvoiceError::AssetFetch(_))
    ));
  }
}

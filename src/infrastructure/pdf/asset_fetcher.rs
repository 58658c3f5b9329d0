use async_trait::async_trait;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

use crate::domain::invoice::InvoiceError;

/// A remote asset staged on local disk
///
/// The file is removed when this value is dropped.
#[derive(Debug)]
pub struct FetchedAsset {
  file: NamedTempFile,
}

impl FetchedAsset {
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, InvoiceError> {
    let mut file = NamedTempFile::new()
      .map_err(|e| InvoiceError::AssetFetch(format!("Failed to create temp file: {}", e)))?;
    file
      .write_all(bytes)
      .and_then(|_| file.flush())
      .map_err(|e| InvoiceError::AssetFetch(format!("Failed to stage asset: {}", e)))?;
    Ok(Self { file })
  }

  pub fn path(&self) -> &std::path::Path {
    self.file.path()
  }

  pub async fn read(&self) -> Result<Vec<u8>, InvoiceError> {
    tokio::fs::read(self.file.path())
      .await
      .map_err(|e| InvoiceError::AssetFetch(format!("Failed to read staged asset: {}", e)))
  }
}

#[async_trait]
pub trait AssetFetcher: Send + Sync {
  async fn fetch(&self, url: &str) -> Result<FetchedAsset, InvoiceError>;
}

/// Default cap on a downloaded asset
pub const DEFAULT_MAX_ASSET_BYTES: u64 = 2 * 1024 * 1024;

/// Downloads assets over HTTP(S), refusing bodies above `max_bytes`
pub struct HttpAssetFetcher {
  client: reqwest::Client,
  max_bytes: u64,
}

impl HttpAssetFetcher {
  pub fn new(timeout: Duration) -> Result<Self, InvoiceError> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| InvoiceError::Internal(format!("Failed to build HTTP client: {}", e)))?;
    Ok(Self {
      client,
      max_bytes: DEFAULT_MAX_ASSET_BYTES,
    })
  }

  pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
    self.max_bytes = max_bytes;
    self
  }

  fn too_large(&self, url: &str) -> InvoiceError {
    InvoiceError::AssetFetch(format!("{} exceeds the {} byte limit", url, self.max_bytes))
  }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
  async fn fetch(&self, url: &str) -> Result<FetchedAsset, InvoiceError> {
    tracing::debug!(url = %url, "Fetching remote asset");

    let mut response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| InvoiceError::AssetFetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      return Err(InvoiceError::AssetFetch(format!(
        "{} responded with status {}",
        url, status
      )));
    }

    // Declared length first, then the bytes actually read
    if response.content_length().is_some_and(|len| len > self.max_bytes) {
      return Err(self.too_large(url));
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response
      .chunk()
      .await
      .map_err(|e| InvoiceError::AssetFetch(e.to_string()))?
    {
      if (bytes.len() + chunk.len()) as u64 > self.max_bytes {
        return Err(self.too_large(url));
      }
      bytes.extend_from_slice(&chunk);
    }
    if bytes.is_empty() {
      return Err(InvoiceError::AssetFetch(format!("{} returned no data", url)));
    }

    FetchedAsset::from_bytes(&bytes)
  }
}

/// Only absolute http(s) URLs are fetched; anything else means no logo
pub fn is_fetchable(url: &str) -> bool {
  let url = url.trim();
  url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_is_fetchable() {
    assert!(is_fetchable("https://cdn.example.com/logo.png"));
    assert!(is_fetchable("http://localhost/logo.png"));
    assert!(!is_fetchable(""));
    assert!(!is_fetchable("logo.png"));
    assert!(!is_fetchable("ftp://example.com/logo.png"));
  }

  #[tokio::test]
  async fn test_staged_asset_round_trips_and_is_removed() {
    let asset = FetchedAsset::from_bytes(b"\x89PNG").unwrap();
    let path = asset.path().to_path_buf();
    assert!(path.exists());
    assert_eq!(asset.read().await.unwrap(), b"\x89PNG");

    drop(asset);
    assert!(!path.exists());
  }

  /// Serves one raw HTTP response on a loopback port and returns its URL
  async fn serve_once(head: String, body: Vec<u8>) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.unwrap();
      let mut request = [0u8; 1024];
      let _ = socket.read(&mut request).await;
      let _ = socket.write_all(head.as_bytes()).await;
      let _ = socket.write_all(&body).await;
      let _ = socket.shutdown().await;
    });
    format!("http://{}/logo.png", addr)
  }

  #[tokio::test]
  async fn test_declared_oversized_logo_is_rejected() {
    let body = vec![7u8; 64];
    let head = format!(
      "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
      body.len()
    );
    let url = serve_once(head, body).await;

    let fetcher = HttpAssetFetcher::new(Duration::from_secs(2))
      .unwrap()
      .with_max_bytes(16);
    let result = fetcher.fetch(&url).await;
    assert!(matches!(result, Err(InvoiceError::AssetFetch(m)) if m.contains("byte limit")));
  }

  #[tokio::test]
  async fn test_undeclared_oversized_logo_is_rejected() {
    let head = "HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n".to_string();
    let url = serve_once(head, vec![7u8; 64]).await;

    let fetcher = HttpAssetFetcher::new(Duration::from_secs(2))
      .unwrap()
      .with_max_bytes(16);
    let result = fetcher.fetch(&url).await;
    assert!(matches!(result, Err(InvoiceError::AssetFetch(m)) if m.contains("byte limit")));
  }

  #[tokio::test]
  async fn test_logo_within_limit_is_staged() {
    let body = b"\x89PNG small".to_vec();
    let head = format!(
      "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
      body.len()
    );
    let url = serve_once(head, body.clone()).await;

    let fetcher = HttpAssetFetcher::new(Duration::from_secs(2)).unwrap();
    let asset = fetcher.fetch(&url).await.unwrap();
    assert_eq!(asset.read().await.unwrap(), body);
  }

  #[tokio::test]
  async fn test_unreachable_host_is_asset_error() {
    let fetcher = HttpAssetFetcher::new(Duration::from_millis(500)).unwrap();
    let result = fetcher.fetch("http://127.0.0.1:9/logo.png").await;
    assert!(matches!(result, Err(InvoiceError::AssetFetch(_))));
  }
}

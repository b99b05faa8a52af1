//! HTTP client wrapper for fetching the index page and linked files.
//!
//! This module provides the `HttpClient` struct which performs plain GET
//! requests with the browser User-Agent (set once, on the client builder), reads whole response bodies and
//! writes them to disk.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use reqwest::ClientBuilder;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};
use url::Url;

use super::error::DownloadError;
use crate::user_agent::BROWSER_USER_AGENT;

/// Optional HTTP timeouts. `None` leaves the transport default (no timeout).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Time allowed to establish the TCP/TLS connection.
    pub connect: Option<Duration>,
    /// Time allowed for a whole request, from send to last body byte.
    pub read: Option<Duration>,
}

impl HttpTimeouts {
    /// Builds timeouts from optional second counts.
    #[must_use]
    pub fn from_secs(connect_secs: Option<u64>, read_secs: Option<u64>) -> Self {
        Self {
            connect: connect_secs.map(Duration::from_secs),
            read: read_secs.map(Duration::from_secs),
        }
    }
}

/// HTTP client for the page fetch and the file downloads.
///
/// Create once and reuse for every request of a run so connections are pooled.
///
/// # Example
///
/// ```no_run
/// use harvester_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let page = client.fetch_bytes("http://example.com/docs/index.html").await?;
/// println!("fetched {} bytes", page.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client without timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeouts(HttpTimeouts::default())
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeouts(timeouts: HttpTimeouts) -> Self {
        let client = base_client_builder(timeouts)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches `url` and returns the complete response body.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (DNS, connection refused, timeout)
    /// - The server returns a non-success status
    /// - The body transfer is interrupted
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.send_get(url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| map_transport_error(url, e))?;
        debug!(bytes = body.len(), "response body received");
        Ok(body.to_vec())
    }

    /// Fetches `url` and writes the body to `path`, returning the byte count.
    ///
    /// The destination is only created (or truncated) once the whole body has
    /// arrived, so a failed fetch leaves any existing file untouched. A failed
    /// write removes the partially written file.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`fetch_bytes`](Self::fetch_bytes), plus
    /// `DownloadError::Io` when the file cannot be created or written.
    #[instrument(skip(self), fields(url = %url, path = %path.display()))]
    pub async fn download_to_path(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        let body = self.fetch_bytes(url).await?;
        write_file(path, &body).await?;
        let bytes = body.len() as u64;
        info!(bytes, "download complete");
        Ok(bytes)
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| map_transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "non-success response");
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

fn map_transport_error(url: &str, error: reqwest::Error) -> DownloadError {
    if error.is_timeout() {
        DownloadError::timeout(url)
    } else {
        DownloadError::network(url, error)
    }
}

/// Creates/truncates `path` and writes `body`, removing the file if the write fails.
async fn write_file(path: &Path, body: &[u8]) -> Result<(), DownloadError> {
    let mut file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    let written = async {
        file.write_all(body).await?;
        file.flush().await
    }
    .await;
    drop(file);

    if let Err(error) = written {
        debug!(path = %path.display(), "cleaning up partial file after error");
        let _ = tokio::fs::remove_file(path).await;
        return Err(DownloadError::io(path, error));
    }
    Ok(())
}

fn base_client_builder(timeouts: HttpTimeouts) -> ClientBuilder {
    let mut builder = Client::builder().user_agent(BROWSER_USER_AGENT);
    if let Some(connect) = timeouts.connect {
        builder = builder.connect_timeout(connect);
    }
    if let Some(read) = timeouts.read {
        builder = builder.timeout(read);
    }
    builder
}

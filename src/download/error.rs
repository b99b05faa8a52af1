//! Error types for the download module.
//!
//! Every failure that aborts a harvest run is a [`DownloadError`]. Variants
//! carry the URL or path involved so the top-level report says what broke.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching the index page or a linked file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, truncated body, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Request hit a configured timeout before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while writing a download.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The link or URL cannot be parsed or resolved.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL or link text.
        url: String,
    },

    /// The resolved URL has no final path segment to use as a file name.
    #[error("no file name in URL path: {url}")]
    MissingFilename {
        /// The resolved URL.
        url: String,
    },
}

/// Coarse classification of a [`DownloadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP GET could not be completed.
    Network,
    /// The destination file could not be written.
    Filesystem,
    /// The link could not be turned into a URL and a file name.
    InvalidTarget,
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a missing file name error.
    pub fn missing_filename(url: impl Into<String>) -> Self {
        Self::MissingFilename { url: url.into() }
    }

    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } | Self::Timeout { .. } | Self::HttpStatus { .. } => {
                ErrorKind::Network
            }
            Self::Io { .. } => ErrorKind::Filesystem,
            Self::InvalidUrl { .. } | Self::MissingFilename { .. } => ErrorKind::InvalidTarget,
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// url or path, which the source errors don't carry.

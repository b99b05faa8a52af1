//! HTTP fetching, link resolution and file writing.
//!
//! This module provides:
//! - [`HttpClient`] - GET wrapper that returns whole response bodies
//! - [`DownloadTarget`] - a harvested link resolved to a URL and a local path
//! - [`DownloadError`] - structured error types for network and disk failures

mod client;
mod constants;
mod error;
mod filename;
mod target;

pub use client::{HttpClient, HttpTimeouts};
pub use constants::{MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS};
pub use error::{DownloadError, ErrorKind};
pub use filename::basename_from_url;
pub use target::{DownloadTarget, plan_targets, resolve_link};

//! Harvester Core Library
//!
//! This library provides the core functionality for the harvester tool,
//! which fetches a single HTML index page, picks out the links whose file
//! names end with a configured extension, and downloads each of them into a
//! local directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Run configuration and the extension-suffix filter
//! - [`markup`] - HTML event scanner and anchor link extraction
//! - [`download`] - HTTP fetching, link resolution and file writing
//! - [`harvest`] - The fetch → extract → resolve → download pipeline

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod harvest;
pub mod markup;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use config::{
    DEFAULT_EXTENSION, DEFAULT_MAX_PARSE_RECOVERIES, DEFAULT_OUTPUT_DIR, DEFAULT_PAGE_URL,
    ExtensionFilter, HarvestConfig,
};
pub use download::{
    DownloadError, DownloadTarget, ErrorKind, HttpClient, HttpTimeouts, resolve_link,
};
pub use harvest::{HarvestPlan, HarvestReport, Harvester, ProgressReporter, SilentProgress};
pub use markup::{LinkCollector, ScanError, Scanner, Token, extract_links};
pub use user_agent::BROWSER_USER_AGENT;

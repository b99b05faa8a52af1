//! HTML scanning and anchor link extraction.
//!
//! This module provides:
//! - [`Scanner`] - lazy markup event iterator with recoverable errors
//! - [`LinkCollector`] / [`extract_links`] - the anchor `href` policy
//! - [`decode_numeric_reference`] - the `&<code>;` fallback for numeric
//!   references that name no character

mod entities;
mod error;
mod links;
mod scanner;

pub use entities::{decode_numeric_reference, escape_unmappable_references};
pub use error::ScanError;
pub use links::{LinkCollector, decode_page, extract_links};
pub use scanner::{Attribute, Scanner, Token};

//! Anchor link extraction.
//!
//! [`LinkCollector`] is the policy half of extraction: it watches scanner
//! tokens and keeps the `href` of every anchor that passes the extension
//! filter, once, in first-seen order. [`extract_links`] drives a
//! [`Scanner`] over a fetched page and feeds the collector.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::scanner::{Scanner, Token};
use crate::config::ExtensionFilter;

/// Accumulates qualifying anchor targets from a token stream.
#[derive(Debug)]
pub struct LinkCollector<'f> {
    filter: &'f ExtensionFilter,
    links: Vec<String>,
    seen: HashSet<String>,
}

impl<'f> LinkCollector<'f> {
    /// Creates an empty collector using `filter`.
    #[must_use]
    pub fn new(filter: &'f ExtensionFilter) -> Self {
        Self {
            filter,
            links: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Inspects one token, returning true if it contributed a new link.
    ///
    /// Only `a` start tags (plain or self-closing) are considered. The first
    /// `href` attribute decides; an empty or bare `href` is ignored.
    pub fn observe(&mut self, token: &Token) -> bool {
        let Token::StartTag { name, .. } = token else {
            return false;
        };
        if name != "a" {
            return false;
        }
        let Some(href) = token.attribute("href").map(|a| a.value.as_str()) else {
            return false;
        };
        if href.is_empty() || !self.filter.matches(href) || self.seen.contains(href) {
            return false;
        }
        self.seen.insert(href.to_string());
        self.links.push(href.to_string());
        true
    }

    /// Number of links collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Consumes the collector, returning links in first-seen order.
    #[must_use]
    pub fn into_links(self) -> Vec<String> {
        self.links
    }
}

/// Decodes a fetched page as UTF-8, dropping invalid byte sequences, and
/// trims surrounding whitespace.
#[must_use]
pub fn decode_page(page: &[u8]) -> String {
    let mut text = String::with_capacity(page.len());
    for chunk in page.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text.trim().to_string()
}

/// Extracts the distinct anchor targets of `page` that pass `filter`.
///
/// Malformed markup never fails extraction. The tokenizer recovers from each
/// parse error the way browsers do and scanning carries on from there; once
/// more than `max_recoveries` errors have been seen, scanning stops and the
/// links found so far are returned.
#[must_use]
pub fn extract_links(page: &[u8], filter: &ExtensionFilter, max_recoveries: usize) -> Vec<String> {
    let text = decode_page(page);
    let mut collector = LinkCollector::new(filter);
    let mut recoveries = 0usize;

    for item in Scanner::new(&text) {
        match item {
            Ok(token) => {
                collector.observe(&token);
            }
            Err(error) => {
                recoveries += 1;
                if recoveries > max_recoveries {
                    warn!(
                        %error,
                        max_recoveries,
                        links = collector.len(),
                        "giving up on malformed markup, keeping links found so far"
                    );
                    break;
                }
                debug!(%error, "skipping malformed markup");
            }
        }
    }

    debug!(links = collector.len(), recoveries, "link extraction finished");
    collector.into_links()
}

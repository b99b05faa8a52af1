//! Run configuration for a harvest.
//!
//! A [`HarvestConfig`] is built once (by the CLI from flags, the config file
//! and the defaults below) and handed to [`crate::Harvester`]. Nothing in it
//! changes while a run is in progress.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::download::HttpTimeouts;

/// Directory downloads are written to when nothing else is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Index page harvested when nothing else is configured.
pub const DEFAULT_PAGE_URL: &str = "http://simh.trailing-edge.com/pdf/all_docs.html";

/// Extension suffix matched when nothing else is configured.
pub const DEFAULT_EXTENSION: &str = ".pdf";

/// How many malformed-markup recoveries link extraction tolerates per page.
pub const DEFAULT_MAX_PARSE_RECOVERIES: usize = 1000;

/// Predicate selecting links by the trailing characters of their target.
///
/// Matching is a plain, case-sensitive `ends_with` on the raw `href` value,
/// so `.pdf` does not match `REPORT.PDF` and a query string after the
/// extension defeats the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionFilter {
    /// A single suffix.
    Single(String),
    /// Any one of several suffixes. An empty list matches nothing.
    AnyOf(Vec<String>),
}

impl ExtensionFilter {
    /// Creates a filter for one suffix.
    #[must_use]
    pub fn single(suffix: impl Into<String>) -> Self {
        Self::Single(suffix.into())
    }

    /// Creates a filter accepting any of the given suffixes.
    #[must_use]
    pub fn any_of<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(suffixes.into_iter().map(Into::into).collect())
    }

    /// Builds a filter from a list of suffixes: one entry becomes
    /// [`ExtensionFilter::Single`], anything else [`ExtensionFilter::AnyOf`].
    #[must_use]
    pub fn from_suffixes(mut suffixes: Vec<String>) -> Self {
        if suffixes.len() == 1 {
            Self::Single(suffixes.remove(0))
        } else {
            Self::AnyOf(suffixes)
        }
    }

    /// Returns true if `link` ends with one of the configured suffixes.
    #[must_use]
    pub fn matches(&self, link: &str) -> bool {
        match self {
            Self::Single(suffix) => link.ends_with(suffix.as_str()),
            Self::AnyOf(suffixes) => suffixes.iter().any(|s| link.ends_with(s.as_str())),
        }
    }

    /// Iterates over the configured suffixes.
    pub fn suffixes(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(suffix) => std::slice::from_ref(suffix),
            Self::AnyOf(suffixes) => suffixes,
        };
        slice.iter().map(String::as_str)
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::single(DEFAULT_EXTENSION)
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(suffix) => f.write_str(suffix),
            Self::AnyOf(suffixes) => write!(f, "[{}]", suffixes.join(", ")),
        }
    }
}

/// Everything a single harvest run needs to know.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Index page whose anchors are harvested. Also the base for relative links.
    pub page_url: Url,
    /// Existing directory downloads are written into.
    pub output_dir: PathBuf,
    /// Which links are worth downloading.
    pub extensions: ExtensionFilter,
    /// Optional HTTP timeouts. None of them are set by default.
    pub timeouts: HttpTimeouts,
    /// Upper bound on malformed-markup recoveries while scanning the page.
    pub max_parse_recoveries: usize,
}

impl HarvestConfig {
    /// Creates a configuration with no timeouts and the default recovery bound.
    #[must_use]
    pub fn new(page_url: Url, output_dir: impl Into<PathBuf>, extensions: ExtensionFilter) -> Self {
        Self {
            page_url,
            output_dir: output_dir.into(),
            extensions,
            timeouts: HttpTimeouts::default(),
            max_parse_recoveries: DEFAULT_MAX_PARSE_RECOVERIES,
        }
    }

    /// Creates the built-in default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error only if [`DEFAULT_PAGE_URL`] stops being a valid URL.
    pub fn with_defaults() -> Result<Self, url::ParseError> {
        Ok(Self::new(
            Url::parse(DEFAULT_PAGE_URL)?,
            DEFAULT_OUTPUT_DIR,
            ExtensionFilter::default(),
        ))
    }

    /// Replaces the HTTP timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: HttpTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Replaces the malformed-markup recovery bound.
    #[must_use]
    pub fn with_max_parse_recoveries(mut self, max: usize) -> Self {
        self.max_parse_recoveries = max;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_single_suffix_matches_end_only() {
        let filter = ExtensionFilter::single(".pdf");
        assert!(filter.matches("a.pdf"));
        assert!(filter.matches("http://example.com/docs/a.pdf"));
        assert!(!filter.matches("a.pdf.txt"));
        assert!(!filter.matches("a.pdf?download=1"));
    }

    #[test]
    fn test_single_suffix_is_case_sensitive() {
        let filter = ExtensionFilter::single(".pdf");
        assert!(!filter.matches("REPORT.PDF"));
    }

    #[test]
    fn test_any_of_matches_any_listed_suffix() {
        let filter = ExtensionFilter::any_of([".pdf", ".txt"]);
        assert!(filter.matches("a.pdf"));
        assert!(filter.matches("b.txt"));
        assert!(!filter.matches("c.html"));
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let filter = ExtensionFilter::AnyOf(Vec::new());
        assert!(!filter.matches("a.pdf"));
        assert!(!filter.matches(""));
    }

    #[test]
    fn test_from_suffixes_collapses_single_entry() {
        assert_eq!(
            ExtensionFilter::from_suffixes(vec![".pdf".to_string()]),
            ExtensionFilter::Single(".pdf".to_string())
        );
        assert_eq!(
            ExtensionFilter::from_suffixes(vec![".pdf".to_string(), ".ps".to_string()]),
            ExtensionFilter::any_of([".pdf", ".ps"])
        );
    }

    #[test]
    fn test_display_and_suffixes() {
        let single = ExtensionFilter::default();
        assert_eq!(single.to_string(), ".pdf");
        assert_eq!(single.suffixes().collect::<Vec<_>>(), vec![".pdf"]);

        let many = ExtensionFilter::any_of([".pdf", ".txt"]);
        assert_eq!(many.to_string(), "[.pdf, .txt]");
        assert_eq!(many.suffixes().count(), 2);
    }

    #[test]
    fn test_default_config_values() {
        let config = HarvestConfig::with_defaults().unwrap();
        assert_eq!(config.page_url.as_str(), DEFAULT_PAGE_URL);
        assert_eq!(config.output_dir, Path::new("data"));
        assert_eq!(config.extensions, ExtensionFilter::single(".pdf"));
        assert_eq!(config.timeouts, HttpTimeouts::default());
        assert_eq!(config.max_parse_recoveries, DEFAULT_MAX_PARSE_RECOVERIES);
    }

    #[test]
    fn test_builder_overrides() {
        let timeouts = HttpTimeouts::from_secs(Some(5), Some(60));
        let config = HarvestConfig::with_defaults()
            .unwrap()
            .with_timeouts(timeouts)
            .with_max_parse_recoveries(3);
        assert_eq!(config.timeouts, timeouts);
        assert_eq!(config.max_parse_recoveries, 3);
    }
}

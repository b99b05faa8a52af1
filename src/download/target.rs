//! Turning harvested links into download targets.
//!
//! A link from the index page may be absolute or relative. Relative links are
//! resolved against the page URL; the final path segment of the result names
//! the local file. Two links sharing a basename map to the same path and the
//! later download overwrites the earlier one.

use std::path::{Path, PathBuf};

use url::Url;

use super::error::DownloadError;
use super::filename::basename_from_url;

/// A link resolved to the URL to fetch and the file to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Absolute URL to fetch.
    pub url: String,
    /// Local file name (the URL's basename).
    pub file_name: String,
    /// Destination path inside the output directory.
    pub path: PathBuf,
}

impl DownloadTarget {
    /// Resolves `link` against `base` and places it in `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::InvalidUrl` when the link cannot be resolved and
    /// `DownloadError::MissingFilename` when the resolved path ends in `/`.
    pub fn from_link(base: &Url, link: &str, output_dir: &Path) -> Result<Self, DownloadError> {
        let url = resolve_link(base, link)?;
        let parsed = Url::parse(&url).map_err(|_| DownloadError::invalid_url(url.as_str()))?;
        let file_name = basename_from_url(&parsed)
            .ok_or_else(|| DownloadError::missing_filename(url.as_str()))?
            .to_string();
        let path = output_dir.join(&file_name);
        Ok(Self {
            url,
            file_name,
            path,
        })
    }
}

/// Produces the absolute URL for a harvested link.
///
/// Links that already start with `http://` or `https://` (any case) are
/// returned exactly as written. Everything else is joined onto `base` with
/// standard relative-reference resolution.
///
/// # Errors
///
/// Returns `DownloadError::InvalidUrl` when the join fails.
pub fn resolve_link(base: &Url, link: &str) -> Result<String, DownloadError> {
    if has_http_scheme(link) {
        return Ok(link.to_string());
    }
    base.join(link)
        .map(String::from)
        .map_err(|_| DownloadError::invalid_url(link))
}

/// Resolves every link in order, stopping at the first one that fails.
///
/// # Errors
///
/// Returns the first error from [`DownloadTarget::from_link`].
pub fn plan_targets(
    base: &Url,
    links: &[String],
    output_dir: &Path,
) -> Result<Vec<DownloadTarget>, DownloadError> {
    links
        .iter()
        .map(|link| DownloadTarget::from_link(base, link, output_dir))
        .collect()
}

fn has_http_scheme(link: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        link.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

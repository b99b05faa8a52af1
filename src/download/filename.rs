//! Local file names derived from download URLs.

use url::Url;

/// Returns the final segment of the URL path, or `None` when it is empty.
///
/// The segment is used verbatim: percent-escapes are not decoded and the
/// query string and fragment play no part.
#[must_use]
pub fn basename_from_url(url: &Url) -> Option<&str> {
    url.path_segments()?
        .next_back()
        .filter(|segment| !segment.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn basename(url: &str) -> Option<String> {
        basename_from_url(&Url::parse(url).unwrap()).map(str::to_string)
    }

    #[test]
    fn test_basename_takes_last_segment() {
        assert_eq!(
            basename("http://example.com/a/b/report.pdf").as_deref(),
            Some("report.pdf")
        );
    }

    #[test]
    fn test_basename_ignores_query_and_fragment() {
        assert_eq!(
            basename("http://example.com/doc.pdf?session=1#page=3").as_deref(),
            Some("doc.pdf")
        );
    }

    #[test]
    fn test_basename_keeps_percent_escapes() {
        assert_eq!(
            basename("http://example.com/my%20manual.pdf").as_deref(),
            Some("my%20manual.pdf")
        );
    }

    #[test]
    fn test_basename_of_directory_url_is_none() {
        assert_eq!(basename("http://example.com/docs/"), None);
        assert_eq!(basename("http://example.com"), None);
    }

    #[test]
    fn test_basename_of_opaque_url_is_none() {
        assert_eq!(basename("mailto:someone@example.com"), None);
    }
}

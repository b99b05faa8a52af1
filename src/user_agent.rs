//! User-Agent string shared by the page fetch and the file downloads.
//!
//! Index hosts commonly refuse requests that do not look like a browser, so
//! every request carries the same minimal browser token.

/// User-Agent header value sent with every harvester request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_user_agent_is_bare_mozilla_token() {
        assert_eq!(BROWSER_USER_AGENT, "Mozilla/5.0");
        assert!(!BROWSER_USER_AGENT.contains(' '));
    }
}

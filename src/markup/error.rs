//! Error type for markup scanning.

use std::borrow::Cow;

use thiserror::Error;

/// Malformed markup reported by [`super::Scanner`].
///
/// Every `ScanError` is recoverable. The tokenizer has already applied the
/// HTML error-recovery rule for the construct, so iteration can continue with
/// the next item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed markup on line {line}: {message}")]
pub struct ScanError {
    /// 1-based line the tokenizer was on when it hit the error.
    pub line: u64,
    /// Tokenizer description of the problem.
    pub message: Cow<'static, str>,
}

impl ScanError {
    /// Creates an error for `line`.
    pub fn new(line: u64, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_line_and_message() {
        let err = ScanError::new(3, "Bad character");
        assert_eq!(err.to_string(), "malformed markup on line 3: Bad character");
    }
}

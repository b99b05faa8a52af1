//! Fallback for numeric character references that name no character.
//!
//! The tokenizer decodes references itself and would turn a surrogate or a
//! code point past U+10FFFF into U+FFFD. Such references are instead kept as
//! the literal text `&<code>;`, with the code in decimal. The document is
//! rewritten before tokenizing so the `&` of each one is escaped.

use std::borrow::Cow;

/// Decodes a numeric reference code (`"65"`, `"x41"`) into its text.
///
/// Returns the character, or `&<code>;` when the value is not a valid
/// character. `code` holds the digits as they appeared, with an optional
/// leading `x`/`X` for hexadecimal. A value too large for `u32` comes back
/// as written.
#[must_use]
pub fn decode_numeric_reference(code: &str) -> String {
    numeric_char(code).map_or_else(|literal| literal, String::from)
}

/// Rewrites every unmappable numeric reference in `raw` as escaped literal
/// text, so it decodes to `&<code>;`. Everything else is left alone.
#[must_use]
pub fn escape_unmappable_references(raw: &str) -> Cow<'_, str> {
    if !raw.contains("&#") {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len() + 8);
    let mut rest = raw;
    let mut changed = false;
    while let Some(start) = rest.find("&#") {
        let after = &rest[start + 2..];
        let code_len = numeric_code_len(after);
        let literal = if code_len == 0 {
            None
        } else {
            numeric_char(&after[..code_len]).err()
        };
        match literal {
            Some(literal) => {
                out.push_str(&rest[..start]);
                out.push_str("&amp;");
                out.push_str(&literal[1..]);
                let semicolon = usize::from(after[code_len..].starts_with(';'));
                rest = &after[code_len + semicolon..];
                changed = true;
            }
            None => {
                out.push_str(&rest[..start + 2]);
                rest = after;
            }
        }
    }

    if !changed {
        return Cow::Borrowed(raw);
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Length of the `x`-prefixed hex or decimal code at the start of `input`,
/// or 0 when there are no digits.
fn numeric_code_len(input: &str) -> usize {
    let hex = input.starts_with(['x', 'X']);
    let prefix = usize::from(hex);
    let digits = input[prefix..]
        .bytes()
        .take_while(|b| {
            if hex {
                b.is_ascii_hexdigit()
            } else {
                b.is_ascii_digit()
            }
        })
        .count();
    if digits == 0 { 0 } else { prefix + digits }
}

fn numeric_char(code: &str) -> Result<char, String> {
    let (digits, radix) = match code.strip_prefix(['x', 'X']) {
        Some(hex) => (hex, 16),
        None => (code, 10),
    };
    match u32::from_str_radix(digits, radix) {
        Ok(value) => char::from_u32(value).ok_or_else(|| format!("&{value};")),
        Err(_) => Err(format!("&{code};")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_codes_decode() {
        assert_eq!(decode_numeric_reference("65"), "A");
        assert_eq!(decode_numeric_reference("x41"), "A");
        assert_eq!(decode_numeric_reference("X263a"), "\u{263a}");
    }

    #[test]
    fn test_unmappable_code_point_degrades_to_literal() {
        assert_eq!(decode_numeric_reference("1114112"), "&1114112;");
        assert_eq!(decode_numeric_reference("xD800"), "&55296;");
    }

    #[test]
    fn test_overflowing_code_degrades_to_written_digits() {
        assert_eq!(
            decode_numeric_reference("99999999999"),
            "&99999999999;"
        );
        assert_eq!(decode_numeric_reference("xFFFFFFFFF"), "&xFFFFFFFFF;");
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(
            escape_unmappable_references("a &amp; b &#65;"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_unmappable_references_are_escaped() {
        assert_eq!(
            escape_unmappable_references("x&#1114112;y &#xD800 z"),
            "x&amp;1114112;y &amp;55296; z"
        );
    }

    #[test]
    fn test_valid_and_bare_references_untouched() {
        let raw = "&#65; &#; &#x; &amp;#1114112;";
        assert_eq!(escape_unmappable_references(raw), raw);
    }
}

//! Streaming HTML event scanner.
//!
//! [`Scanner`] runs the html5ever tokenizer over a document one line at a
//! time and yields one [`Token`] per markup construct. No tree is built and
//! tags are not balanced. Tag and attribute names come out lowercased and
//! character references are decoded. `script` and `style` bodies are raw
//! text, so markup inside them produces no tags.
//!
//! Parse errors arrive inline as [`ScanError`] items. The tokenizer has
//! already recovered when it reports one, so iteration can simply continue.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::str::SplitInclusive;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token as HtmlToken, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};

use super::entities::escape_unmappable_references;
use super::error::ScanError;

/// A single attribute on a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Decoded value. A bare attribute such as `<a href>` has an empty value.
    pub value: String,
}

/// A markup event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attr=value ...>` or `<name ... />`.
    StartTag {
        /// Lowercased tag name.
        name: String,
        /// Attributes in document order. Repeated names keep the first.
        attributes: Vec<Attribute>,
        /// True for the `<name ... />` form.
        self_closing: bool,
    },
    /// `</name>`.
    EndTag {
        /// Lowercased tag name.
        name: String,
    },
    /// Character data, references decoded. A run of text may be split
    /// across several tokens.
    Text(String),
    /// Comment body, including bogus comments such as `<?xml ...>`.
    Comment(String),
    /// `<!DOCTYPE ...>`.
    Doctype {
        /// Lowercased doctype name, if any.
        name: Option<String>,
    },
}

impl Token {
    /// Returns the attribute called `name` on a start tag.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        match self {
            Self::StartTag { attributes, .. } => attributes.iter().find(|a| a.name == name),
            _ => None,
        }
    }
}

/// Lazy iterator of markup events over a document.
pub struct Scanner<'a> {
    lines: SplitInclusive<'a, char>,
    input: BufferQueue,
    tokenizer: Tokenizer<EventQueue>,
    finished: bool,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of `document`.
    #[must_use]
    pub fn new(document: &'a str) -> Self {
        Self {
            lines: document.split_inclusive('\n'),
            input: BufferQueue::default(),
            tokenizer: Tokenizer::new(EventQueue::default(), TokenizerOpts::default()),
            finished: false,
        }
    }

    /// True once the whole document has been tokenized and every event
    /// handed out.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished && self.tokenizer.sink.is_empty()
    }

    fn feed_next_line(&mut self) {
        match self.lines.next() {
            Some(line) => {
                let line = escape_unmappable_references(line);
                self.input.push_back(StrTendril::from_slice(&line));
                let _ = self.tokenizer.feed(&self.input);
            }
            None => {
                self.tokenizer.end();
                self.finished = true;
            }
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.tokenizer.sink.pop() {
                return Some(event);
            }
            if self.finished {
                return None;
            }
            self.feed_next_line();
        }
    }
}

/// Token sink buffering converted events until the scanner hands them out.
#[derive(Default)]
struct EventQueue {
    events: RefCell<VecDeque<Result<Token, ScanError>>>,
}

impl EventQueue {
    fn push(&self, event: Result<Token, ScanError>) {
        self.events.borrow_mut().push_back(event);
    }

    fn push_text(&self, text: &str) {
        let mut events = self.events.borrow_mut();
        if let Some(Ok(Token::Text(last))) = events.back_mut() {
            last.push_str(text);
        } else {
            events.push_back(Ok(Token::Text(text.to_string())));
        }
    }

    fn pop(&self) -> Option<Result<Token, ScanError>> {
        self.events.borrow_mut().pop_front()
    }

    fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl TokenSink for EventQueue {
    type Handle = ();

    fn process_token(&self, token: HtmlToken, line_number: u64) -> TokenSinkResult<()> {
        match token {
            HtmlToken::TagToken(tag) => {
                let content = content_kind(&tag);
                self.push(Ok(convert_tag(tag)));
                if let Some(kind) = content {
                    return TokenSinkResult::RawData(kind);
                }
            }
            HtmlToken::CharacterTokens(text) => self.push_text(&text),
            HtmlToken::NullCharacterToken => self.push_text("\0"),
            HtmlToken::CommentToken(text) => self.push(Ok(Token::Comment(text.to_string()))),
            HtmlToken::DoctypeToken(doctype) => self.push(Ok(Token::Doctype {
                name: doctype.name.map(|name| name.to_string()),
            })),
            HtmlToken::ParseError(message) => self.push(Err(ScanError::new(line_number, message))),
            HtmlToken::EOFToken => {}
        }
        TokenSinkResult::Continue
    }
}

/// Tokenizer state to switch to after a start tag whose body is not markup.
fn content_kind(tag: &Tag) -> Option<RawKind> {
    if !matches!(tag.kind, TagKind::StartTag) {
        return None;
    }
    match &*tag.name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

fn convert_tag(tag: Tag) -> Token {
    let name = tag.name.to_string();
    match tag.kind {
        TagKind::StartTag => Token::StartTag {
            name,
            attributes: tag
                .attrs
                .into_iter()
                .map(|attr| Attribute {
                    name: attr.name.local.to_string(),
                    value: attr.value.to_string(),
                })
                .collect(),
            self_closing: tag.self_closing,
        },
        TagKind::EndTag => Token::EndTag { name },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Result<Token, ScanError>> {
        Scanner::new(input).collect()
    }

    fn ok_tokens(input: &str) -> Vec<Token> {
        Scanner::new(input).filter_map(Result::ok).collect()
    }

    fn text_of(input: &str) -> String {
        ok_tokens(input)
            .into_iter()
            .filter_map(|t| match t {
                Token::Text(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn start(name: &str, attrs: &[(&str, &str)], self_closing: bool) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attributes: attrs
                .iter()
                .map(|(n, v)| Attribute {
                    name: (*n).to_string(),
                    value: (*v).to_string(),
                })
                .collect(),
            self_closing,
        }
    }

    fn anchors(input: &str) -> Vec<String> {
        ok_tokens(input)
            .iter()
            .filter(|t| matches!(t, Token::StartTag { name, .. } if name == "a"))
            .filter_map(|t| t.attribute("href").map(|a| a.value.clone()))
            .collect()
    }

    #[test]
    fn test_anchor_after_text() {
        let toks = ok_tokens(r#"<li>Manual: <a href="m.pdf">M</a></li>"#);
        assert_eq!(
            toks,
            vec![
                start("li", &[], false),
                Token::Text("Manual: ".to_string()),
                start("a", &[("href", "m.pdf")], false),
                Token::Text("M".to_string()),
                Token::EndTag {
                    name: "a".to_string()
                },
                Token::EndTag {
                    name: "li".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_names_are_lowercased_and_values_kept() {
        let toks = ok_tokens(r#"<A HREF="Doc.PDF" Title=x>"#);
        assert_eq!(
            toks,
            vec![start("a", &[("href", "Doc.PDF"), ("title", "x")], false)]
        );
    }

    #[test]
    fn test_repeated_attribute_keeps_first_and_reports() {
        let toks = tokens(r#"<a href="1.pdf" href="2.pdf">"#);
        assert!(toks.iter().any(Result::is_err));
        let tag = toks.into_iter().find_map(Result::ok).unwrap();
        assert_eq!(tag, start("a", &[("href", "1.pdf")], false));
    }

    #[test]
    fn test_bare_attribute_has_empty_value() {
        assert_eq!(
            ok_tokens("<a href>"),
            vec![start("a", &[("href", "")], false)]
        );
    }

    #[test]
    fn test_self_closing_tag() {
        assert_eq!(
            ok_tokens(r#"<a href="s.pdf"/>"#),
            vec![start("a", &[("href", "s.pdf")], true)]
        );
    }

    #[test]
    fn test_attribute_values_are_entity_decoded() {
        assert_eq!(anchors(r#"<a href="a&amp;b&#46;pdf">"#), vec!["a&b.pdf"]);
    }

    #[test]
    fn test_text_references_decoded_with_literal_fallback() {
        assert_eq!(
            text_of("x &copy; &#65; &#1114112; &#xD800; y"),
            "x \u{a9} A &1114112; &55296; y"
        );
    }

    #[test]
    fn test_comment_and_doctype() {
        let toks = ok_tokens("<!DOCTYPE html><!-- note <a href=\"c.pdf\"> -->");
        assert_eq!(
            toks,
            vec![
                Token::Doctype {
                    name: Some("html".to_string())
                },
                Token::Comment(" note <a href=\"c.pdf\"> ".to_string()),
            ]
        );
    }

    #[test]
    fn test_script_and_style_bodies_are_raw_text() {
        let input = r#"<script>var s = "<a href='x.pdf'>";</script><style>a[href$=".pdf"]{}</style><a href="y.pdf">"#;
        assert_eq!(anchors(input), vec!["y.pdf"]);
        assert!(ok_tokens(input).contains(&Token::EndTag {
            name: "script".to_string()
        }));
    }

    #[test]
    fn test_stray_angle_brackets_are_text() {
        assert_eq!(text_of("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
    }

    #[test]
    fn test_malformed_end_tag_then_valid_anchor() {
        let toks = tokens("</ p><a href=\"ok.pdf\">");
        assert!(toks[0].is_err());
        assert!(toks.contains(&Ok(start("a", &[("href", "ok.pdf")], false))));
    }

    #[test]
    fn test_unterminated_comment_swallows_rest() {
        let toks = tokens("<p>x</p>\n<!-- never closed <a href=\"x.pdf\">");
        assert!(toks.iter().any(Result::is_err));
        assert!(anchors("<p>x</p>\n<!-- never closed <a href=\"x.pdf\">").is_empty());
        assert!(
            toks.iter()
                .any(|t| matches!(t, Ok(Token::Comment(body)) if body.contains("x.pdf")))
        );
    }

    #[test]
    fn test_unterminated_tag_at_end_is_dropped() {
        let toks = tokens("<p>x</p><a href=\"x.pdf\"");
        assert!(toks.iter().any(Result::is_err));
        assert!(anchors("<p>x</p><a href=\"x.pdf\"").is_empty());
    }

    #[test]
    fn test_errors_carry_line_number() {
        let err = tokens("<p>\n\n</ x>")
            .into_iter()
            .find_map(Result::err)
            .unwrap();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_scanner_finishes() {
        let mut scanner = Scanner::new("<p>a</p>\n<p>b</p>");
        assert!(!scanner.is_finished());
        assert_eq!(scanner.by_ref().count(), 7);
        assert!(scanner.is_finished());
        assert!(scanner.next().is_none());
    }
}

//! Markup tokenizer.
//!
//! Splits SGML/HTML input into start tags, end tags, and text. The scanner is
//! forgiving: anything that does not look like markup is text,
//! and constructs that carry no document text (comments, declarations,
//! processing instructions) are dropped.
//!
//! ```rust
//! use pgdoc_content::sgml::{Lexer, Token};
//!
//! let tokens: Vec<Token> = Lexer::new("<para>See <xref linkend=\"backup\"/>.</para>").collect();
//! assert_eq!(tokens.len(), 5);
//! assert!(matches!(&tokens[2], Token::StartTag { name, self_closing: true, .. } if name == "xref"));
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::entities::decode_entities;

/// A single markup token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attr="value">` or `<name/>`. Names are lowercased.
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    /// `</name>`. Names are lowercased.
    EndTag { name: String },
    /// Character data with references decoded, or raw CDATA content.
    Text(String),
}

/// Start tag whose body honours quoted attribute values.
static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<([A-Za-z][^\s/>]*)((?:"[^"]*"|'[^']*'|[^'"<>])*)>"#)
        .expect("Invalid start tag regex")
});

/// Fallback for tags with a stray quote in them.
static LOOSE_START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([A-Za-z][^\s/>]*)([^<>]*)>").expect("Invalid loose start tag regex")
});

static END_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^</([A-Za-z][^\s/>]*)[^>]*>").expect("Invalid end tag regex")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/'"]+)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s"'>]+))?"#)
        .expect("Invalid attribute regex")
});

/// Iterator over the tokens of a markup string.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `input`.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Skip past `terminator`, or to end of input if it never appears.
    /// Returns the text between the current position plus `open_len` and the
    /// terminator.
    fn consume_until(&mut self, open_len: usize, terminator: &str) -> &'a str {
        let body_start = self.pos + open_len;
        match self.input[body_start..].find(terminator) {
            Some(offset) => {
                self.pos = body_start + offset + terminator.len();
                &self.input[body_start..body_start + offset]
            }
            None => {
                self.pos = self.input.len();
                &self.input[body_start..]
            }
        }
    }

    /// Scan the construct starting at `<`. Returns `None` when the construct
    /// produced no token (comment, declaration, ...).
    fn scan_markup(&mut self) -> Option<Token> {
        let rest = self.rest();

        if rest.starts_with("<!--") {
            self.consume_until(4, "-->");
            return None;
        }

        if rest.starts_with("<![CDATA[") {
            let content = self.consume_until(9, "]]>");
            return Some(Token::Text(content.to_string()));
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            self.consume_until(2, ">");
            return None;
        }

        if rest.starts_with("</") {
            if let Some(caps) = END_TAG.captures(rest) {
                self.pos += caps[0].len();
                return Some(Token::EndTag {
                    name: caps[1].to_lowercase(),
                });
            }
            // `</>` and `</ junk>` are ignored; an unterminated `</` is text.
            if rest.contains('>') {
                self.consume_until(2, ">");
                return None;
            }
            return Some(self.literal_lt());
        }

        let caps = START_TAG
            .captures(rest)
            .or_else(|| LOOSE_START_TAG.captures(rest));
        match caps {
            Some(caps) => {
                self.pos += caps[0].len();
                let name = caps[1].to_lowercase();
                let body = caps[2].trim_end();
                let (body, self_closing) = match body.strip_suffix('/') {
                    Some(stripped) => (stripped, true),
                    None => (body, false),
                };
                Some(Token::StartTag {
                    name,
                    attrs: parse_attributes(body),
                    self_closing,
                })
            }
            None => Some(self.literal_lt()),
        }
    }

    fn literal_lt(&mut self) -> Token {
        self.pos += 1;
        Token::Text("<".to_string())
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.pos < self.input.len() {
            let rest = self.rest();

            if !rest.starts_with('<') {
                let text_len = rest.find('<').unwrap_or(rest.len());
                self.pos += text_len;
                return Some(Token::Text(decode_entities(&rest[..text_len]).into_owned()));
            }

            if let Some(token) = self.scan_markup() {
                return Some(token);
            }
        }
        None
    }
}

/// Parse the attribute part of a start tag.
///
/// Names are lowercased, values are unquoted and decoded. Attributes without
/// a value get an empty string. A repeated attribute keeps its last value.
pub fn parse_attributes(body: &str) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = Vec::new();

    for caps in ATTRIBUTE.captures_iter(body) {
        let name = caps[1].to_lowercase();
        let value = caps
            .get(2)
            .map(|m| {
                let raw = m.as_str();
                let unquoted = raw
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .or_else(|| raw.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                    .unwrap_or(raw);
                decode_entities(unquoted).into_owned()
            })
            .unwrap_or_default();

        match attrs.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => attrs.push((name, value)),
        }
    }

    attrs
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Shallow lexer for WordprocessingML markup.
//!
//! Only splits the source into tags and text. Nesting is tracked by the
//! scanner, and only for the handful of element names it cares about.

use std::fmt::{self, Display};

use logos::Logos;

/// Tokenize document markup. Stray `<` characters become [`Token::Error`].
pub fn tokenize(src: &str) -> impl Iterator<Item = Token<'_>> {
    Token::lexer(src).map(|tok| tok.unwrap_or(Token::Error))
}

/// Token emitted by the markup lexer
#[derive(PartialEq, Eq, Clone, Copy, Logos)]
pub enum Token<'src> {
    /// `<?xml ... ?>` and other processing instructions
    #[regex(r"<\?[^>]*>")]
    ProcessingInstruction,

    /// `<!-- -->`, `<!DOCTYPE>` and `<![CDATA[ ]]>`
    #[regex(r"<![^>]*>")]
    Declaration,

    /// `</w:tc>`
    #[regex(r"</[^>]*>")]
    EndTag(&'src str),

    /// `<w:tc>` or `<w:vMerge w:val="restart"/>`
    #[regex(r"<[^/?!>][^>]*>")]
    StartTag(&'src str),

    /// Character data between tags, entities not yet decoded
    #[regex(r"[^<]+")]
    Text(&'src str),

    /// Anything the other rules do not match, e.g. an unterminated tag
    Error,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProcessingInstruction => write!(f, "ProcessingInstruction"),
            Self::Declaration => write!(f, "Declaration"),
            Self::EndTag(s) => write!(f, "EndTag({s})"),
            Self::StartTag(s) => write!(f, "StartTag({s})"),
            Self::Text(s) => write!(f, "Text({s})"),
            Self::Error => write!(f, "Error"),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A parsed start tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'src> {
    /// Qualified element name, such as `w:tc`
    pub name: &'src str,
    attributes: &'src str,
    /// Whether the tag ends with `/>`
    pub self_closing: bool,
}

impl<'src> Tag<'src> {
    /// Split the raw slice of a [`Token::StartTag`] into name and attributes.
    #[must_use]
    pub fn parse(raw: &'src str) -> Self {
        let inner = raw.strip_prefix('<').unwrap_or(raw);
        let inner = inner.strip_suffix('>').unwrap_or(inner);
        let (inner, self_closing) = match inner.strip_suffix('/') {
            Some(inner) => (inner, true),
            None => (inner, false),
        };

        let (name, attributes) = inner
            .split_once(|c: char| c.is_ascii_whitespace())
            .unwrap_or((inner, ""));

        Self {
            name,
            attributes,
            self_closing,
        }
    }

    /// Raw value of the attribute `key`, if present.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&'src str> {
        attributes(self.attributes).find_map(|(k, v)| (k == key).then_some(v))
    }
}

/// Name of the element closed by the raw slice of a [`Token::EndTag`].
#[must_use]
pub fn end_tag_name(raw: &str) -> &str {
    let inner = raw.strip_prefix("</").unwrap_or(raw);
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    inner.trim_end()
}

/// Iterate over `key="value"` pairs. Both quote styles are accepted; a
/// pair without a quoted value ends the iteration.
fn attributes(mut rest: &str) -> impl Iterator<Item = (&str, &str)> {
    std::iter::from_fn(move || {
        let (key, after_key) = rest.trim_start().split_once('=')?;
        let after_eq = after_key.trim_start();
        let quote = after_eq.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let value_start = after_eq.get(1..)?;
        let (value, after_value) = value_start.split_once(quote)?;
        rest = after_value;
        Some((key.trim(), value))
    })
}

//! `Content-Type` response header parsing.
//!
//! Reproduces the media-type grammar browsers apply to response headers,
//! including the quirks that matter for interception decisions:
//! - a header may carry several comma-separated media types; the last valid
//!   one wins, and commas inside quoted strings do not split
//! - `*/*` and tokens without `/` are ignored
//! - a repeated identical type keeps the charset of an earlier occurrence
//! - quoted charset values are unescaped (`\X` -> `X`)
//! - media-type comments (`text/html (junk)`) end the type token

mod scan;

use serde::{Deserialize, Serialize};

use scan::{
    find_char_in_set, find_char_not_in_set, find_media_delimiter, find_string_end, HTTP_LWS,
};

/// Result of parsing a `Content-Type` header value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContentType {
    /// The original, unmodified header value.
    pub content_type: String,
    /// Lowercased `type/subtype`, or empty when no valid type was found.
    pub mime_type: String,
    /// Charset parameter as sent (case preserved), or empty.
    pub charset: String,
}

impl ParsedContentType {
    /// `mime_type` when non-empty.
    pub fn mime(&self) -> Option<&str> {
        (!self.mime_type.is_empty()).then_some(self.mime_type.as_str())
    }
}

/// Parse a raw `Content-Type` header value. Never fails; malformed input
/// yields empty fields.
pub fn parse_content_type(content_type: &str) -> ParsedContentType {
    let mut acc = Accumulator::default();
    let bytes = content_type.as_bytes();

    let mut cur = 0;
    loop {
        let end = find_media_delimiter(bytes, cur, b',');
        parse_media_type(&content_type[cur..end], &mut acc);
        cur = end + 1;
        if cur >= bytes.len() {
            break;
        }
    }

    ParsedContentType {
        content_type: content_type.to_string(),
        mime_type: acc.mime_type,
        charset: acc.charset,
    }
}

/// Parse an optional header value; `None` behaves like an empty header.
pub fn parse_content_type_opt(content_type: Option<&str>) -> ParsedContentType {
    parse_content_type(content_type.unwrap_or(""))
}

/// Index of the `"` closing the quoted string that opens at `start`, or
/// `s.len()` when it is unterminated. Backslash escapes one character.
pub(crate) fn find_quoted_string_end(s: &str, start: usize) -> usize {
    find_string_end(s.as_bytes(), start, b'"')
}

/// State folded across the comma-separated media types of one header.
#[derive(Debug, Default)]
struct Accumulator {
    mime_type: String,
    charset: String,
    had_charset: bool,
}

/// Location of a charset value inside a media-type fragment.
struct CharsetSpan {
    start: usize,
    end: usize,
    quoted: bool,
}

fn parse_media_type(fragment: &str, acc: &mut Accumulator) {
    let s = fragment.as_bytes();
    let end = s.len();

    let type_start = find_char_not_in_set(s, 0, end, HTTP_LWS);
    let type_end = find_char_in_set(s, type_start, end, b" \t;(");

    let charset = find_charset_param(s, type_end).map(|(value_start, param_end)| {
        let start = find_char_not_in_set(s, value_start, param_end, HTTP_LWS);
        if start < param_end && s[start] == b'"' {
            CharsetSpan {
                start: start + 1,
                end: find_string_end(s, start, b'"'),
                quoted: true,
            }
        } else {
            CharsetSpan {
                start,
                end: find_char_in_set(s, start, param_end, b" \t;("),
                quoted: false,
            }
        }
    });

    let media_type = &fragment[type_start..type_end];
    let has_both_halves = media_type
        .split_once('/')
        .is_some_and(|(ty, sub)| !ty.is_empty() && !sub.is_empty());
    if !has_both_halves || "*/*".starts_with(media_type) {
        return;
    }

    let same_type =
        !acc.mime_type.is_empty() && acc.mime_type.eq_ignore_ascii_case(media_type);
    if !same_type {
        acc.mime_type = media_type.to_ascii_lowercase();
    }

    if (!same_type && acc.had_charset) || charset.is_some() {
        acc.had_charset = true;
        acc.charset = match charset {
            Some(span) if span.quoted => unescape_quoted(&fragment[span.start..span.end]),
            Some(span) => fragment[span.start..span.end].to_string(),
            None => String::new(),
        };
    }
}

/// Scan the `;`-separated parameters after the type token for the last
/// `charset=` parameter. Returns `(value_start, param_end)`.
fn find_charset_param(s: &[u8], type_end: usize) -> Option<(usize, usize)> {
    const CHARSET: &[u8] = b"charset=";

    let param_start = s[type_end..].iter().position(|&b| b == b';')? + type_end;
    let mut found = None;
    let mut cur = param_start + 1;
    loop {
        let cur_end = find_media_delimiter(s, cur, b';');
        let name = find_char_not_in_set(s, cur, cur_end, HTTP_LWS);
        if s[name..].len() >= CHARSET.len()
            && s[name..name + CHARSET.len()].eq_ignore_ascii_case(CHARSET)
        {
            found = Some((name + CHARSET.len(), cur_end));
        }
        cur = cur_end + 1;
        if cur >= s.len() {
            break;
        }
    }
    found
}

/// Remove quoted-string backslash escapes. A trailing lone backslash is kept.
fn unescape_quoted(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

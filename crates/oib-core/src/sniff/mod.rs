//! MIME sniffing policy: will the browser render a type inline, sniff it, or
//! hand it to the download machinery?

pub mod registry;

use serde::{Deserialize, Serialize};

use crate::content_type::parse_content_type;
use registry::{is_always_inline, is_unsupported_text, SNIFFABLE_TEXT_PLAIN};

/// How the browser treats a response of a given MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MimeClassification {
    /// Rendered by a built-in viewer.
    AlwaysInline,
    /// Not renderable; the browser downloads it.
    NeverInline,
    /// `text/plain` whose body the browser sniffs for binary content.
    TextSniffable,
    /// `text/plain` rendered as text without sniffing.
    TextUnsniffable,
    /// No usable MIME type; default browser behaviour applies.
    Unknown,
}

impl MimeClassification {
    /// True when the engine should consider intercepting the response.
    pub fn needs_decision(self) -> bool {
        matches!(self, MimeClassification::NeverInline)
    }
}

/// Classify a MIME type. Parameters after `;` are ignored and case is folded.
pub fn classify(mime_type: &str) -> MimeClassification {
    let mime = mime_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if mime.is_empty() {
        return MimeClassification::Unknown;
    }
    if mime == "text/plain" {
        return MimeClassification::TextSniffable;
    }
    if mime.starts_with("text/") {
        return if is_unsupported_text(&mime) {
            MimeClassification::NeverInline
        } else {
            MimeClassification::AlwaysInline
        };
    }
    if is_always_inline(&mime) {
        return MimeClassification::AlwaysInline;
    }
    MimeClassification::NeverInline
}

/// Classify a response from its raw `Content-Type` and `Content-Encoding`.
///
/// `text/plain` is only [`MimeClassification::TextSniffable`] for the exact
/// header spellings the browser sniffs, and only without a content encoding.
pub fn classify_response(content_type: &str, content_encoding: Option<&str>) -> MimeClassification {
    let parsed = parse_content_type(content_type);
    match classify(&parsed.mime_type) {
        MimeClassification::TextSniffable
            if !is_sniffable_text_plain(content_type, content_encoding) =>
        {
            MimeClassification::TextUnsniffable
        }
        other => other,
    }
}

/// True when the browser would sniff a response with this exact header.
pub fn is_sniffable_text_plain(content_type: &str, content_encoding: Option<&str>) -> bool {
    content_encoding.is_none() && SNIFFABLE_TEXT_PLAIN.contains(&content_type)
}

/// Turn a sniffable `text/plain` header into one the sniffer ignores by
/// uppercasing its first character (`text/plain` -> `Text/plain`). MIME types
/// are case-insensitive, but the sniffer matches the lowercase spelling.
/// Other values are returned unchanged.
pub fn make_unsniffable_content_type(content_type: &str) -> String {
    if !SNIFFABLE_TEXT_PLAIN.contains(&content_type) {
        return content_type.to_string();
    }
    let mut chars = content_type.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

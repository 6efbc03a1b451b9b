//! Strict percent-decoding and URL-component encoding for filenames.
//!
//! Decoding is strict in the way browsers decode URI components: a `%` not
//! followed by two hex digits, or bytes that are not valid in the target
//! charset, make the whole decode fail. Callers fall back to the raw input.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped by URL-component encoding.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn has_malformed_escape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

/// Percent-decode to raw bytes. `None` on a malformed escape.
pub fn percent_decode_bytes(input: &str) -> Option<Vec<u8>> {
    if has_malformed_escape(input) {
        return None;
    }
    Some(percent_decode_str(input).collect())
}

/// Decode a URL component as UTF-8. `None` on malformed escapes or invalid UTF-8.
pub fn decode_uri_component(input: &str) -> Option<String> {
    String::from_utf8(percent_decode_bytes(input)?).ok()
}

/// Decode with a declared charset label (`UTF-8`, `ISO-8859-1`, ...).
///
/// Unknown labels are decoded as UTF-8.
pub fn decode_with_charset(input: &str, charset: &str) -> Option<String> {
    let bytes = percent_decode_bytes(input)?;
    match encoding_rs::Encoding::for_label(charset.trim().as_bytes()) {
        Some(encoding) if encoding != encoding_rs::UTF_8 => encoding
            .decode_without_bom_handling_and_without_replacement(&bytes)
            .map(|s| s.into_owned()),
        _ => String::from_utf8(bytes).ok(),
    }
}

/// Decode a URL component, returning the input unchanged if decoding fails.
pub fn decode_or_raw(input: &str) -> String {
    decode_uri_component(input).unwrap_or_else(|| input.to_string())
}

/// Encode a string as a URL component (unreserved marks kept).
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

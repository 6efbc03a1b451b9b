//! Content-Disposition header parsing (attachment flag, filename and filename*).

mod param;

use serde::{Deserialize, Serialize};

use crate::percent::{decode_or_raw, decode_with_charset, encode_uri_component};
use param::{find_filename_params, FilenameParam};

/// Result of parsing a `Content-Disposition` header value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContentDisposition {
    /// True when the value starts with the `attachment` token.
    pub is_attachment: bool,
    /// Decoded filename, if a `filename` or `filename*` parameter was found.
    pub filename: Option<String>,
}

/// Parse a raw `Content-Disposition` header value.
pub fn parse_content_disposition(value: &str) -> ParsedContentDisposition {
    ParsedContentDisposition {
        is_attachment: is_attachment(value),
        filename: parse_content_disposition_filename(value),
    }
}

/// True iff the value begins (after whitespace) with `attachment`, any case.
/// Nothing is required of what follows the token.
pub fn is_attachment(value: &str) -> bool {
    const ATTACHMENT: &str = "attachment";
    let trimmed = value.trim_start();
    trimmed
        .get(..ATTACHMENT.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(ATTACHMENT))
}

/// Extracts the filename from a raw Content-Disposition header value.
///
/// Supports:
/// - `filename="value"` (quoted; strips quotes and unescapes)
/// - `filename=value` (token)
/// - `filename*=charset'lang'percent-encoded` (RFC 5987)
///
/// Both forms are percent-decoded; a value that fails to decode is returned
/// undecoded. If both exist, a decodable `filename*` takes precedence, then
/// `filename`, then the undecodable `filename*` as sent.
pub fn parse_content_disposition_filename(value: &str) -> Option<String> {
    let params = find_filename_params(value);

    let mut plain: Option<String> = None;
    let mut starred_raw: Option<String> = None;

    for param in params {
        match param {
            FilenameParam::Extended { charset, encoded } => {
                match decode_with_charset(&encoded, charset.as_deref().unwrap_or("UTF-8")) {
                    Some(decoded) if !decoded.is_empty() => return Some(decoded),
                    Some(_) => {}
                    None => {
                        if starred_raw.is_none() && !encoded.is_empty() {
                            starred_raw = Some(encoded);
                        }
                    }
                }
            }
            FilenameParam::Plain(raw) => {
                if plain.is_none() {
                    let decoded = decode_or_raw(&raw);
                    if !decoded.is_empty() {
                        plain = Some(decoded);
                    }
                }
            }
        }
    }

    plain.or(starred_raw)
}

/// Header value that makes the browser save the response as `filename`.
pub fn encode_attachment(filename: &str) -> String {
    format!("attachment; filename*=UTF-8''{}", encode_uri_component(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_detection() {
        assert!(is_attachment("attachment"));
        assert!(is_attachment("  \tAttachment; filename=x"));
        assert!(is_attachment("ATTACHMENTS"));
        assert!(!is_attachment("inline; filename=attachment.txt"));
        assert!(!is_attachment(""));
        assert!(!is_attachment("attach"));
    }

    #[test]
    fn quoted_filename_ends_at_its_closing_quote() {
        let r = parse_content_disposition(r#"attachment; filename="a.txt"; x="b""#);
        assert_eq!(r.filename.as_deref(), Some("a.txt"));
        let r = parse_content_disposition(r#"attachment; filename="say \"hi\".txt"; x="b""#);
        assert_eq!(r.filename.as_deref(), Some(r#"say "hi".txt"#));
    }

    #[test]
    fn parse_quoted() {
        let r = parse_content_disposition(r#"attachment; filename="a b.txt""#);
        assert!(r.is_attachment);
        assert_eq!(r.filename.as_deref(), Some("a b.txt"));
    }

    #[test]
    fn parse_token() {
        let r = parse_content_disposition_filename("attachment; filename=report.pdf");
        assert_eq!(r.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn parse_single_quoted() {
        let r = parse_content_disposition_filename("attachment; filename='report.pdf'");
        assert_eq!(r.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn parse_filename_star_utf8() {
        let r = parse_content_disposition_filename("attachment; filename*=UTF-8''na%C3%AFve.txt");
        assert_eq!(r.as_deref(), Some("naïve.txt"));
    }

    #[test]
    fn parse_filename_star_with_language() {
        let r = parse_content_disposition_filename("attachment; filename*=utf-8'en'%E2%82%AC%20rates.csv");
        assert_eq!(r.as_deref(), Some("€ rates.csv"));
    }

    #[test]
    fn parse_filename_star_latin1() {
        let r = parse_content_disposition_filename("attachment; filename*=ISO-8859-1''caf%E9.txt");
        assert_eq!(r.as_deref(), Some("café.txt"));
    }

    #[test]
    fn parse_filename_star_precedence() {
        let r = parse_content_disposition_filename(
            "attachment; filename=\"fallback.bin\"; filename*=UTF-8''real%20name.dat",
        );
        assert_eq!(r.as_deref(), Some("real name.dat"));
    }

    #[test]
    fn undecodable_star_prefers_plain_filename() {
        let r = parse_content_disposition_filename(
            "attachment; filename*=UTF-8''bad%C3; filename=\"good.txt\"",
        );
        assert_eq!(r.as_deref(), Some("good.txt"));
    }

    #[test]
    fn undecodable_star_alone_is_returned_raw() {
        let r = parse_content_disposition_filename("attachment; filename*=UTF-8''100%.txt");
        assert_eq!(r.as_deref(), Some("100%.txt"));
    }

    #[test]
    fn plain_filename_is_percent_decoded() {
        let r = parse_content_disposition_filename("attachment; filename=\"b%20c.zip\"");
        assert_eq!(r.as_deref(), Some("b c.zip"));
        let r = parse_content_disposition_filename("attachment; filename=\"50%.zip\"");
        assert_eq!(r.as_deref(), Some("50%.zip"));
    }

    #[test]
    fn quoted_filename_with_escapes_and_semicolon() {
        let r = parse_content_disposition_filename(r#"attachment; filename="a\"b;c.txt"; size=3"#);
        assert_eq!(r.as_deref(), Some(r#"a"b;c.txt"#));
    }

    #[test]
    fn leading_filename_parameter() {
        let r = parse_content_disposition_filename("filename=leading.txt");
        assert_eq!(r.as_deref(), Some("leading.txt"));
    }

    #[test]
    fn no_filename_parameter() {
        assert_eq!(parse_content_disposition_filename("attachment"), None);
        assert_eq!(parse_content_disposition_filename("attachment; name=x.txt"), None);
        assert_eq!(parse_content_disposition_filename("attachment; myfilename=x.txt"), None);
        assert_eq!(parse_content_disposition_filename("attachment; filename=\"\""), None);
        let r = parse_content_disposition("inline");
        assert!(!r.is_attachment);
        assert!(r.filename.is_none());
    }

    #[test]
    fn encode_attachment_uses_extended_syntax() {
        assert_eq!(
            encode_attachment("naïve file.txt"),
            "attachment; filename*=UTF-8''na%C3%AFve%20file.txt"
        );
        let header = encode_attachment("naïve file.txt");
        assert_eq!(
            parse_content_disposition_filename(&header).as_deref(),
            Some("naïve file.txt")
        );
    }
}

//! Locating `filename` / `filename*` parameters in a Content-Disposition value.

use crate::content_type::find_quoted_string_end;

/// A filename parameter as it appears in the header, before percent-decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum FilenameParam {
    /// `filename=...`, quotes and backslash escapes removed.
    Plain(String),
    /// `filename*=charset'lang'...`, with the `charset'lang'` prefix split off.
    Extended {
        charset: Option<String>,
        encoded: String,
    },
}

/// All filename parameters in header order.
///
/// A parameter counts only at the start of the value or after `;`.
/// Text inside a quoted value is never rescanned.
pub(super) fn find_filename_params(value: &str) -> Vec<FilenameParam> {
    const NAME: &str = "filename";

    // ASCII lowercasing keeps byte offsets aligned with `value`.
    let lower = value.to_ascii_lowercase();
    let mut params = Vec::new();
    let mut search = 0;

    while let Some(off) = lower[search..].find(NAME) {
        let start = search + off;
        search = start + NAME.len();
        if !at_parameter_start(value, start) {
            continue;
        }

        let mut rest = &value[search..];
        let starred = rest.starts_with('*');
        if starred {
            rest = &rest[1..];
        }
        let rest = rest.trim_start_matches([' ', '\t']);
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start_matches([' ', '\t']);
        let rest_offset = value.len() - rest.len();

        let (raw, consumed) = parameter_value(rest);
        search = rest_offset + consumed;

        params.push(if starred {
            let (charset, encoded) = split_extended_value(&raw);
            FilenameParam::Extended {
                charset: charset.map(str::to_string),
                encoded: encoded.to_string(),
            }
        } else {
            FilenameParam::Plain(raw)
        });
    }

    params
}

fn at_parameter_start(value: &str, start: usize) -> bool {
    let before = value[..start].trim_end_matches([' ', '\t']);
    before.is_empty() || before.ends_with(';')
}

/// Value of a parameter and the number of bytes of `rest` it spans.
fn parameter_value(rest: &str) -> (String, usize) {
    if rest.starts_with('"') {
        let end = find_quoted_string_end(rest, 0);
        let body = &rest[1..end];
        let consumed = (end + 1).min(rest.len());
        return (unescape(body), consumed);
    }

    let seg_end = rest.find(';').unwrap_or(rest.len());
    let seg = rest[..seg_end].trim_end();
    if let Some(inner) = seg.strip_prefix('\'') {
        let inner = inner.strip_suffix('\'').unwrap_or(inner);
        return (inner.to_string(), seg_end);
    }
    (seg.to_string(), seg_end)
}

/// Split `charset'lang'encoded`. Without a complete prefix the whole value
/// is the encoded part.
fn split_extended_value(value: &str) -> (Option<&str>, &str) {
    if let Some(first) = value.find('\'') {
        if first > 0 {
            if let Some(second) = value[first + 1..].find('\'') {
                let encoded_start = first + 1 + second + 1;
                return (Some(&value[..first]), &value[encoded_start..]);
            }
        }
    }
    (None, value)
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
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

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> FilenameParam {
        FilenameParam::Plain(s.to_string())
    }

    #[test]
    fn finds_both_forms_in_order() {
        let params = find_filename_params("attachment; filename=a.txt; FILENAME*=UTF-8'de'b.txt");
        assert_eq!(
            params,
            vec![
                plain("a.txt"),
                FilenameParam::Extended {
                    charset: Some("UTF-8".to_string()),
                    encoded: "b.txt".to_string(),
                },
            ]
        );
    }

    #[test]
    fn whitespace_around_equals() {
        assert_eq!(
            find_filename_params("attachment ; filename = \"x y\" "),
            vec![plain("x y")]
        );
    }

    #[test]
    fn quoted_value_is_not_rescanned() {
        assert_eq!(
            find_filename_params(r#"attachment; filename="a; filename=b""#),
            vec![plain("a; filename=b")]
        );
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        assert_eq!(
            find_filename_params("attachment; filename=\"open.txt"),
            vec![plain("open.txt")]
        );
    }

    #[test]
    fn extended_without_prefix() {
        assert_eq!(
            find_filename_params("attachment; filename*=plain%20name"),
            vec![FilenameParam::Extended {
                charset: None,
                encoded: "plain%20name".to_string(),
            }]
        );
        assert_eq!(split_extended_value("'en'x"), (None, "'en'x"));
        assert_eq!(split_extended_value("utf-8''"), (Some("utf-8"), ""));
    }

    #[test]
    fn name_must_start_a_parameter() {
        assert!(find_filename_params("attachment; xfilename=a").is_empty());
        assert!(find_filename_params("attachment; filenames=a").is_empty());
    }
}

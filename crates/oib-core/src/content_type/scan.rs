//! Byte scanners shared by the media-type parser.
//!
//! All delimiters are ASCII, so every index returned here is a valid `str`
//! slice boundary of the scanned input.

/// Linear whitespace inside a media type.
pub(super) const HTTP_LWS: &[u8] = b" \t";

/// First index in `start..end` whose byte is not in `set`, or `end`.
pub(super) fn find_char_not_in_set(s: &[u8], start: usize, end: usize, set: &[u8]) -> usize {
    s[start..end]
        .iter()
        .position(|b| !set.contains(b))
        .map_or(end, |off| start + off)
}

/// First index in `start..end` whose byte is in `set`, or `end`.
pub(super) fn find_char_in_set(s: &[u8], start: usize, end: usize, set: &[u8]) -> usize {
    s[start..end]
        .iter()
        .position(|b| set.contains(b))
        .map_or(end, |off| start + off)
}

/// Index of the quote closing the quoted string that opens at `string_start`.
///
/// A backslash escapes the following byte. An unterminated string runs to
/// the end of the input, in which case `s.len()` is returned.
pub(super) fn find_string_end(s: &[u8], string_start: usize, delim: u8) -> usize {
    let mut pos = string_start;
    loop {
        let from = pos + 1;
        let Some(off) = s[from.min(s.len())..]
            .iter()
            .position(|&b| b == delim || b == b'\\')
        else {
            return s.len();
        };
        let at = from + off;
        if s[at] == b'\\' {
            pos = at + 1;
            if pos >= s.len() {
                return s.len();
            }
            continue;
        }
        return at;
    }
}

/// Index of the next `delimiter` at or after `search_start` that is not inside
/// a double-quoted string, or `s.len()`.
pub(super) fn find_media_delimiter(s: &[u8], search_start: usize, delimiter: u8) -> usize {
    let mut search = search_start;
    loop {
        if search >= s.len() {
            return s.len();
        }
        let Some(off) = s[search..]
            .iter()
            .position(|&b| b == delimiter || b == b'"')
        else {
            return s.len();
        };
        let at = search + off;
        if s[at] == delimiter {
            return at;
        }
        search = find_string_end(s, at, b'"');
        if search >= s.len() {
            return s.len();
        }
        search += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_end_skips_escaped_quotes() {
        let s = br#""a\"b" rest"#;
        assert_eq!(find_string_end(s, 0, b'"'), 5);
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        let s = br#""abc"#;
        assert_eq!(find_string_end(s, 0, b'"'), s.len());
        let s = br#""abc\"#;
        assert_eq!(find_string_end(s, 0, b'"'), s.len());
    }

    #[test]
    fn delimiter_inside_quotes_is_ignored() {
        let s = br#"a; b="x,y", c"#;
        assert_eq!(find_media_delimiter(s, 0, b','), 10);
        assert_eq!(find_media_delimiter(s, 11, b','), s.len());
    }

    #[test]
    fn delimiter_search_past_end() {
        assert_eq!(find_media_delimiter(b"abc", 7, b';'), 3);
    }

    #[test]
    fn set_scanners() {
        let s = b"  \ttext/html;x";
        let start = find_char_not_in_set(s, 0, s.len(), HTTP_LWS);
        assert_eq!(start, 3);
        assert_eq!(find_char_in_set(s, start, s.len(), b" \t;("), 12);
    }
}

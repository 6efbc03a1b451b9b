//! Filename extraction from the URL path.

use std::sync::LazyLock;

use regex::Regex;

use crate::percent::decode_or_raw;

/// Last run of non-slash characters, ignoring trailing slashes and spaces.
static LAST_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^/]+)[/ ]*$").expect("valid last-segment pattern"));

/// Derives a filename from the final segment of `url`.
///
/// The query and fragment are cut at the first `?` or `#`. The URL is not
/// parsed, so an origin-only URL (`https://host/`) yields the host name.
/// Returns `None` when nothing but slashes remains.
pub fn filename_from_url(url: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or("");
    let segment = LAST_SEGMENT
        .captures(without_query)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())?;
    Some(decode_or_raw(segment))
}

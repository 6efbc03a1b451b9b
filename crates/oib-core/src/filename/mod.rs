//! Filename derivation for the prompt and for "save" decisions.
//!
//! Prefers the Content-Disposition filename, then the last URL path segment,
//! then a fallback name.

mod path;

pub use path::filename_from_url;

use crate::disposition::parse_content_disposition_filename;

/// Default filename when neither Content-Disposition nor the URL yields one.
pub const DEFAULT_FILENAME: &str = "untitled";

/// Filename from a Content-Disposition value, if it names a non-empty one.
pub fn filename_from_content_disposition(content_disposition: &str) -> Option<String> {
    parse_content_disposition_filename(content_disposition).filter(|s| !s.is_empty())
}

/// Where a resolved filename came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameSource {
    ContentDisposition,
    Url,
    Fallback,
}

/// Derives the filename for a response.
///
/// # Examples
///
/// - `resolve_filename("https://example.com/archive.zip", None, "untitled")` → `"archive.zip"`
/// - `resolve_filename("https://example.com/", Some("attachment; filename=\"report.pdf\""), "untitled")` → `"report.pdf"`
pub fn resolve_filename(url: &str, content_disposition: Option<&str>, fallback: &str) -> String {
    resolve_filename_with_source(url, content_disposition, fallback).0
}

/// Like [`resolve_filename`], also reporting which source won.
pub fn resolve_filename_with_source(
    url: &str,
    content_disposition: Option<&str>,
    fallback: &str,
) -> (String, FilenameSource) {
    if let Some(name) = content_disposition.and_then(filename_from_content_disposition) {
        return (name, FilenameSource::ContentDisposition);
    }
    match filename_from_url(url).filter(|s| !s.is_empty()) {
        Some(name) => (name, FilenameSource::Url),
        None => (fallback.to_string(), FilenameSource::Fallback),
    }
}

/// Lowercased extension of `filename` (without the dot), if any.
pub fn extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.contains(['/', ' ']) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

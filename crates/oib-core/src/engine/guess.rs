//! MIME type guessing from the filename extension.

use crate::filename::extension;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// First MIME type registered for the extension of `filename`.
pub fn guess_mime_from_filename(filename: &str) -> Option<String> {
    let ext = extension(filename)?;
    let guess = mime_guess::from_ext(&ext).first()?;
    Some(guess.essence_str().to_ascii_lowercase())
}

//! Header rewrites for each outcome.

use crate::disposition::encode_attachment;
use crate::headers::HeaderList;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE_OPTIONS: &str = "X-Content-Type-Options";

/// Render inline as `mime` without sniffing.
pub fn open_as_mime(headers: &mut HeaderList, mime: &str) {
    headers.set(CONTENT_TYPE, mime);
    headers.set(CONTENT_TYPE_OPTIONS, "nosniff");
    headers.set(CONTENT_DISPOSITION, "inline");
}

/// Render inline with the type the server sent.
pub fn open_as_server_sent(headers: &mut HeaderList) {
    headers.set(CONTENT_DISPOSITION, "inline");
}

/// Force a download under `filename`.
pub fn download(headers: &mut HeaderList, filename: &str) {
    headers.set(CONTENT_DISPOSITION, encode_attachment(filename));
}

/// Replace the type with its unsniffable spelling.
pub fn unsniff(headers: &mut HeaderList, content_type: &str) {
    headers.set(CONTENT_TYPE, content_type);
}

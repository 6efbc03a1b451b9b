//! Static MIME registries mirroring the browser's built-in content viewers.

/// MIME types the browser always renders inline.
pub const ALWAYS_INLINE: &[&str] = &[
    // Browser extension packages
    "application/x-chrome-extension",
    // Supported image types
    "image/jpeg",
    "image/pjpeg",
    "image/jpg",
    "image/webp",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/vnd.microsoft.icon",
    "image/x-icon",
    "image/x-xbitmap",
    // Common media types
    "audio/ogg",
    "application/ogg",
    "video/ogg",
    "video/webm",
    "audio/webm",
    "audio/wav",
    "audio/x-wav",
    "video/mp4",
    "video/x-m4v",
    "audio/mp4",
    "audio/x-m4a",
    "audio/mp3",
    "audio/x-mp3",
    "audio/mpeg",
    // Supported non-image types
    "text/cache-manifest",
    "text/html",
    "text/xml",
    "text/xsl",
    "text/plain",
    "text/css",
    "text/vnd.chromium.ftp-dir",
    "image/svg+xml",
    "application/xml",
    "application/atom+xml",
    "application/rss+xml",
    "application/xhtml+xml",
    "application/json",
    "multipart/related",
    "multipart/x-mixed-replace",
    // Certificate types
    "application/x-x509-user-cert",
    // Script types
    "text/javascript",
    "text/ecmascript",
    "application/javascript",
    "application/ecmascript",
    "application/x-javascript",
    "text/javascript1.1",
    "text/javascript1.2",
    "text/javascript1.3",
    "text/jscript",
    "text/livescript",
];

/// `text/*` types the browser does not render as text.
pub const UNSUPPORTED_TEXT: &[&str] = &[
    "text/calendar",
    "text/x-calendar",
    "text/x-vcalendar",
    "text/vcalendar",
    "text/vcard",
    "text/x-vcard",
    "text/directory",
    "text/ldif",
    "text/qif",
    "text/x-qif",
    "text/x-csv",
    "text/x-vcf",
    "text/rtf",
    "text/comma-separated-values",
    "text/csv",
    "text/tab-separated-values",
    "text/tsv",
    "text/ofx",
    "text/vnd.sun.j2me.app-descriptor",
];

/// Exact `Content-Type` spellings for which the browser sniffs the body to
/// tell text from binary. Matching is case-sensitive.
pub const SNIFFABLE_TEXT_PLAIN: &[&str] = &[
    "text/plain",
    "text/plain; charset=ISO-8859-1",
    "text/plain; charset=iso-8859-1",
    "text/plain; charset=UTF-8",
];

pub fn is_always_inline(mime_type: &str) -> bool {
    ALWAYS_INLINE.contains(&mime_type)
}

pub fn is_unsupported_text(mime_type: &str) -> bool {
    UNSUPPORTED_TEXT.contains(&mime_type)
}

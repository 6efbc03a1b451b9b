//! Remembered per-MIME actions and their persisted string form.
//!
//! Each action is stored as a single tag character followed by its argument:
//!
//! | tag | action                                   | example          |
//! |-----|------------------------------------------|------------------|
//! | `0` | open in browser as the given MIME type   | `0text/plain`    |
//! | `1` | open in browser as a generic kind        | `1text`          |
//! | `5` | open in browser with the server's type   | `5`              |
//! | `+` | open with an external viewer             | `+google_docs`   |
//! | `=` | always download                          | `=`              |

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Generic "open as" kinds offered by the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericKind {
    Text,
    Web,
    Xml,
    Image,
}

impl GenericKind {
    pub const ALL: [GenericKind; 4] = [
        GenericKind::Text,
        GenericKind::Web,
        GenericKind::Xml,
        GenericKind::Image,
    ];

    /// The MIME type the response is rendered as.
    pub fn mime_type(self) -> &'static str {
        match self {
            GenericKind::Text => "text/plain",
            GenericKind::Web => "text/html",
            GenericKind::Xml => "text/xml",
            GenericKind::Image => "image/png",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenericKind::Text => "text",
            GenericKind::Web => "web",
            GenericKind::Xml => "xml",
            GenericKind::Image => "image",
        }
    }
}

impl FromStr for GenericKind {
    type Err = ActionCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GenericKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ActionCodeError::UnknownGenericKind(s.to_string()))
    }
}

/// A remembered decision for one MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MimeAction {
    OpenAsMime(String),
    OpenAsGeneric(GenericKind),
    OpenAsServerSent,
    OpenWith(String),
    Download,
}

pub const TAG_OPEN_AS_MIME: char = '0';
pub const TAG_OPEN_AS_GENERIC: char = '1';
pub const TAG_OPEN_AS_SERVER_SENT: char = '5';
pub const TAG_OPEN_WITH: char = '+';
pub const TAG_DOWNLOAD: char = '=';

/// Why a stored action code could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionCodeError {
    #[error("empty action code")]
    Empty,
    #[error("unknown action type {0:?}")]
    UnknownTag(char),
    #[error("action type {0:?} requires an argument")]
    MissingArgument(char),
    #[error("unknown generic kind {0:?}")]
    UnknownGenericKind(String),
}

impl MimeAction {
    pub fn tag(&self) -> char {
        match self {
            MimeAction::OpenAsMime(_) => TAG_OPEN_AS_MIME,
            MimeAction::OpenAsGeneric(_) => TAG_OPEN_AS_GENERIC,
            MimeAction::OpenAsServerSent => TAG_OPEN_AS_SERVER_SENT,
            MimeAction::OpenWith(_) => TAG_OPEN_WITH,
            MimeAction::Download => TAG_DOWNLOAD,
        }
    }

    /// Persisted form: tag character followed by the argument.
    pub fn encode(&self) -> String {
        let arg = match self {
            MimeAction::OpenAsMime(mime) => mime.as_str(),
            MimeAction::OpenAsGeneric(kind) => kind.as_str(),
            MimeAction::OpenWith(viewer) => viewer.as_str(),
            MimeAction::OpenAsServerSent | MimeAction::Download => "",
        };
        let mut out = String::with_capacity(1 + arg.len());
        out.push(self.tag());
        out.push_str(arg);
        out
    }

    pub fn decode(code: &str) -> Result<Self, ActionCodeError> {
        let mut chars = code.chars();
        let tag = chars.next().ok_or(ActionCodeError::Empty)?;
        let arg = chars.as_str().trim();
        let require_arg = || {
            if arg.is_empty() {
                Err(ActionCodeError::MissingArgument(tag))
            } else {
                Ok(arg.to_string())
            }
        };
        match tag {
            TAG_OPEN_AS_MIME => Ok(MimeAction::OpenAsMime(require_arg()?)),
            TAG_OPEN_AS_GENERIC => Ok(MimeAction::OpenAsGeneric(require_arg()?.parse()?)),
            TAG_OPEN_AS_SERVER_SENT => Ok(MimeAction::OpenAsServerSent),
            TAG_OPEN_WITH => Ok(MimeAction::OpenWith(require_arg()?)),
            TAG_DOWNLOAD => Ok(MimeAction::Download),
            other => Err(ActionCodeError::UnknownTag(other)),
        }
    }
}

impl fmt::Display for MimeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MimeAction::OpenAsMime(mime) => write!(f, "open as {mime}"),
            MimeAction::OpenAsGeneric(kind) => write!(f, "open as {}", kind.as_str()),
            MimeAction::OpenAsServerSent => write!(f, "open with server-sent type"),
            MimeAction::OpenWith(viewer) => write!(f, "open with {viewer}"),
            MimeAction::Download => write!(f, "download"),
        }
    }
}

impl FromStr for MimeAction {
    type Err = ActionCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MimeAction::decode(s)
    }
}

//! The dialog boundary: what the UI is shown and what it answers.

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use crate::control::RequestId;
use crate::prefs::MimeAction;

/// URL split for display: `https://` + `example.com` + `/path?q#f`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlParts {
    pub scheme: String,
    pub host: String,
    pub remainder: String,
}

impl UrlParts {
    /// Unparseable URLs are shown whole in `remainder`.
    pub fn split(url: &str) -> Self {
        match Url::parse(url) {
            Ok(parsed) if parsed.has_host() => {
                let host = match (parsed.host_str(), parsed.port()) {
                    (Some(host), Some(port)) => format!("{host}:{port}"),
                    (Some(host), None) => host.to_string(),
                    (None, _) => String::new(),
                };
                let mut remainder = parsed.path().to_string();
                if let Some(query) = parsed.query() {
                    remainder.push('?');
                    remainder.push_str(query);
                }
                if let Some(fragment) = parsed.fragment() {
                    remainder.push('#');
                    remainder.push_str(fragment);
                }
                Self {
                    scheme: format!("{}://", parsed.scheme()),
                    host,
                    remainder,
                }
            }
            _ => Self {
                scheme: String::new(),
                host: String::new(),
                remainder: url.to_string(),
            },
        }
    }

    pub fn is_https(&self) -> bool {
        self.scheme == "https://"
    }
}

/// Viewer offered in the dialog's "open with" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewerChoice {
    pub id: String,
    pub name: String,
}

/// Everything the dialog displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptRequest {
    pub request_id: RequestId,
    pub url: String,
    pub url_parts: UrlParts,
    pub filename: String,
    /// Raw `Content-Type` header, empty when absent.
    pub content_type: String,
    /// Parsed type sent by the server.
    pub declared_mime: String,
    /// Type guessed from the filename extension, when it differs from the declared one.
    pub guessed_mime: Option<String>,
    pub content_length: Option<u64>,
    pub viewers: Vec<ViewerChoice>,
}

impl PromptRequest {
    /// The type remembered choices are stored under.
    pub fn effective_mime(&self) -> &str {
        self.guessed_mime.as_deref().unwrap_or(&self.declared_mime)
    }
}

/// The user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    /// Open as a type, save, or open with a viewer, all expressed as the
    /// action that would be remembered.
    Choose { action: MimeAction, remember: bool },
    /// Dialog closed or cancelled.
    Dismissed,
}

impl PromptReply {
    pub fn open_as(mime: impl Into<String>) -> Self {
        Self::once(MimeAction::OpenAsMime(mime.into()))
    }

    pub fn save() -> Self {
        Self::once(MimeAction::Download)
    }

    pub fn open_with(viewer_id: impl Into<String>) -> Self {
        Self::once(MimeAction::OpenWith(viewer_id.into()))
    }

    pub fn once(action: MimeAction) -> Self {
        PromptReply::Choose {
            action,
            remember: false,
        }
    }

    /// Same choice, remembered for the type.
    pub fn remembered(self) -> Self {
        match self {
            PromptReply::Choose { action, .. } => PromptReply::Choose {
                action,
                remember: true,
            },
            PromptReply::Dismissed => PromptReply::Dismissed,
        }
    }
}

/// Shows the dialog and waits for the answer. Implemented by the UI layer.
///
/// An `Err` means the dialog could not be shown at all.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn prompt(&self, request: PromptRequest) -> anyhow::Result<PromptReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_url_for_display() {
        let parts = UrlParts::split("https://example.com:8443/a/b%20c.zip?x=1#top");
        assert_eq!(parts.scheme, "https://");
        assert_eq!(parts.host, "example.com:8443");
        assert_eq!(parts.remainder, "/a/b%20c.zip?x=1#top");
        assert!(parts.is_https());
    }

    #[test]
    fn split_unparseable_url() {
        let parts = UrlParts::split("not a url");
        assert_eq!(parts.scheme, "");
        assert_eq!(parts.host, "");
        assert_eq!(parts.remainder, "not a url");
    }

    #[test]
    fn reply_builders() {
        assert_eq!(
            PromptReply::save().remembered(),
            PromptReply::Choose {
                action: MimeAction::Download,
                remember: true
            }
        );
        assert_eq!(PromptReply::Dismissed.remembered(), PromptReply::Dismissed);
    }
}

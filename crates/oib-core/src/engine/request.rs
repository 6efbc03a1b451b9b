//! Flow inputs and results.

use serde::Serialize;

use crate::control::RequestId;
use crate::headers::HeaderList;

/// One intercepted response, as delivered by the browser's headers-received event.
#[derive(Debug, Clone)]
pub struct ResponseDetails {
    pub request_id: RequestId,
    pub url: String,
    /// e.g. `HTTP/1.1 200 OK`.
    pub status_line: String,
    pub headers: HeaderList,
    /// Always show the dialog (e.g. started from a context menu).
    pub force_dialog: bool,
}

impl ResponseDetails {
    pub fn new(
        request_id: RequestId,
        url: impl Into<String>,
        status_line: impl Into<String>,
        headers: HeaderList,
    ) -> Self {
        Self {
            request_id,
            url: url.into(),
            status_line: status_line.into(),
            headers,
            force_dialog: false,
        }
    }

    pub fn with_force_dialog(mut self, force_dialog: bool) -> Self {
        self.force_dialog = force_dialog;
        self
    }

    /// The three status digits, taken at a fixed offset (`HTTP/x.y NNN`).
    pub fn status_code(&self) -> Option<&str> {
        self.status_line.get(9..12)
    }

    pub fn is_ok(&self) -> bool {
        self.status_code() == Some("200")
    }
}

/// What the engine decided for a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "viewer")]
pub enum Action {
    /// Let the browser render the response (possibly under another type).
    RenderInline,
    /// Rewrite a sniffable `text/plain` type so it renders as text.
    ForceUnsniff,
    /// Ask the user.
    Prompt,
    Download,
    OpenWith(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub action: Action,
    pub mime: Option<String>,
    pub filename: Option<String>,
    /// The choice was stored for future responses of the same type.
    pub remember: bool,
}

impl Decision {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            mime: None,
            filename: None,
            remember: false,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn remembered(mut self, remember: bool) -> Self {
        self.remember = remember;
        self
    }
}

/// Terminal result of a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Leave the response alone.
    PassThrough,
    /// Replace the response headers with `headers`.
    Modified { headers: HeaderList, decision: Decision },
    /// Cancel the response and navigate to `url`.
    Redirect { url: String, decision: Decision },
    /// The user dismissed the dialog; cancel the request.
    CancelRequest,
}

impl Outcome {
    pub fn decision(&self) -> Option<&Decision> {
        match self {
            Outcome::Modified { decision, .. } | Outcome::Redirect { decision, .. } => Some(decision),
            Outcome::PassThrough | Outcome::CancelRequest => None,
        }
    }
}

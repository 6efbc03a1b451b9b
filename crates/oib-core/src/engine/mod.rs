//! Per-response decision flow.
//!
//! [`DecisionEngine::plan`] runs the synchronous part: status check,
//! disposition, classification, filename, guessed type and remembered action.
//! [`DecisionEngine::handle`] runs the whole flow, suspending on the
//! [`Prompter`] when the user has to choose, and applies the result.

pub mod apply;
mod error;
mod guess;
mod prompt;
mod request;

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::content_type::parse_content_type;
use crate::control::{Registration, RequestControl};
use crate::disposition::is_attachment;
use crate::filename::{resolve_filename, DEFAULT_FILENAME};
use crate::headers::HeaderList;
use crate::prefs::{mime_action, set_mime_action, MimeAction, PrefFlag, Preferences};
use crate::sniff::{
    classify_response, is_sniffable_text_plain, make_unsniffable_content_type, MimeClassification,
};
use crate::viewers::ViewerRegistry;

pub use error::EngineError;
pub use guess::{guess_mime_from_filename, OCTET_STREAM};
pub use prompt::{Prompter, PromptReply, PromptRequest, UrlParts, ViewerChoice};
pub use request::{Action, Decision, Outcome, ResponseDetails};

use apply::{CONTENT_DISPOSITION, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE};

/// Facts about a response that needs a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowContext {
    pub filename: String,
    /// Raw `Content-Type`, empty when absent.
    pub content_type: String,
    pub declared_mime: String,
    pub guessed_mime: Option<String>,
    pub content_length: Option<u64>,
    pub attachment: bool,
}

impl FlowContext {
    /// Guessed type if any, else the declared one. Remembered actions are keyed by it.
    pub fn effective_mime(&self) -> &str {
        self.guessed_mime.as_deref().unwrap_or(&self.declared_mime)
    }
}

/// Result of the synchronous part of a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Not intercepted.
    PassThrough,
    /// Sniffable `text/plain`: rewrite the type.
    Unsniff { content_type: String },
    /// Attachment the user does not want overridden; the browser downloads it.
    BrowserDownload { filename: String },
    /// A stored action applies.
    Remembered { action: MimeAction, context: FlowContext },
    /// Ask the user.
    Prompt(FlowContext),
}

impl Plan {
    /// The decision this plan leads to before any user interaction.
    pub fn decision(&self) -> Option<Decision> {
        match self {
            Plan::PassThrough => None,
            Plan::Unsniff { content_type } => {
                Some(Decision::new(Action::ForceUnsniff).with_mime(content_type.clone()))
            }
            Plan::BrowserDownload { filename } => {
                Some(Decision::new(Action::Download).with_filename(filename.clone()))
            }
            Plan::Remembered { action, context } => Some(decision_for(action, context, true)),
            Plan::Prompt(context) => Some(
                Decision::new(Action::Prompt)
                    .with_mime(context.effective_mime())
                    .with_filename(context.filename.clone()),
            ),
        }
    }
}

fn decision_for(action: &MimeAction, context: &FlowContext, remember: bool) -> Decision {
    let decision = match action {
        MimeAction::OpenAsMime(mime) => Decision::new(Action::RenderInline).with_mime(mime.clone()),
        MimeAction::OpenAsGeneric(kind) => {
            Decision::new(Action::RenderInline).with_mime(kind.mime_type())
        }
        MimeAction::OpenAsServerSent => {
            Decision::new(Action::RenderInline).with_mime(context.declared_mime.clone())
        }
        MimeAction::Download => Decision::new(Action::Download),
        MimeAction::OpenWith(viewer) => Decision::new(Action::OpenWith(viewer.clone())),
    };
    decision
        .with_filename(context.filename.clone())
        .remembered(remember)
}

/// Decides what to do with intercepted responses.
///
/// Cheap to share: all collaborators are behind `Arc`.
#[derive(Clone)]
pub struct DecisionEngine {
    prefs: Arc<dyn Preferences>,
    prompter: Arc<dyn Prompter>,
    viewers: Arc<ViewerRegistry>,
    control: Arc<RequestControl>,
    fallback_filename: String,
}

impl DecisionEngine {
    pub fn new(prefs: Arc<dyn Preferences>, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            prefs,
            prompter,
            viewers: Arc::new(ViewerRegistry::default()),
            control: Arc::new(RequestControl::new()),
            fallback_filename: DEFAULT_FILENAME.to_string(),
        }
    }

    pub fn with_viewers(mut self, viewers: Arc<ViewerRegistry>) -> Self {
        self.viewers = viewers;
        self
    }

    pub fn with_control(mut self, control: Arc<RequestControl>) -> Self {
        self.control = control;
        self
    }

    pub fn with_fallback_filename(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_filename = fallback.into();
        self
    }

    /// Registry used to abort suspended flows.
    pub fn control(&self) -> &Arc<RequestControl> {
        &self.control
    }

    pub fn preferences(&self) -> &Arc<dyn Preferences> {
        &self.prefs
    }

    /// Synchronous part of the flow. Does not touch the headers.
    pub fn plan(&self, details: &ResponseDetails) -> Plan {
        if !details.is_ok() {
            debug!(request_id = details.request_id, status = %details.status_line, "ignoring non-200 response");
            return Plan::PassThrough;
        }

        let headers = &details.headers;
        let content_type = headers.get(CONTENT_TYPE).unwrap_or("");
        let content_encoding = headers.get(CONTENT_ENCODING);
        let disposition = headers.get(CONTENT_DISPOSITION);
        let attachment = disposition.is_some_and(is_attachment);

        if !details.force_dialog {
            if attachment {
                if !self.prefs.flag(PrefFlag::OverrideDownloadType) {
                    let filename =
                        resolve_filename(&details.url, disposition, &self.fallback_filename);
                    debug!(request_id = details.request_id, %filename, "attachment left to the browser");
                    return Plan::BrowserDownload { filename };
                }
            } else {
                let classification = classify_response(content_type, content_encoding);
                debug!(request_id = details.request_id, content_type, ?classification, "classified response");
                match classification {
                    MimeClassification::Unknown
                    | MimeClassification::AlwaysInline
                    | MimeClassification::TextUnsniffable => return Plan::PassThrough,
                    MimeClassification::TextSniffable => {
                        if self.prefs.flag(PrefFlag::TextNosniff) {
                            return Plan::Unsniff {
                                content_type: make_unsniffable_content_type(content_type),
                            };
                        }
                        return Plan::PassThrough;
                    }
                    MimeClassification::NeverInline => {}
                }
            }
        }

        let filename = resolve_filename(&details.url, disposition, &self.fallback_filename);
        let declared_mime = parse_content_type(content_type).mime_type;
        let guessed_mime = self.guess_mime(&declared_mime, content_type, content_encoding, &filename);
        let context = FlowContext {
            filename,
            content_type: content_type.to_string(),
            declared_mime,
            guessed_mime,
            content_length: headers
                .get(CONTENT_LENGTH)
                .and_then(|v| v.trim().parse().ok()),
            attachment,
        };

        if details.force_dialog {
            return Plan::Prompt(context);
        }
        match self.remembered_action(&context) {
            Some(action) => Plan::Remembered { action, context },
            None => Plan::Prompt(context),
        }
    }

    fn guess_mime(
        &self,
        declared_mime: &str,
        content_type: &str,
        content_encoding: Option<&str>,
        filename: &str,
    ) -> Option<String> {
        let octet = declared_mime == OCTET_STREAM && self.prefs.flag(PrefFlag::OctetSniffMime);
        if !octet && !is_sniffable_text_plain(content_type, content_encoding) {
            return None;
        }
        guess_mime_from_filename(filename).filter(|guess| guess != declared_mime)
    }

    fn remembered_action(&self, context: &FlowContext) -> Option<MimeAction> {
        let effective = context.effective_mime();
        if effective.is_empty() {
            return None;
        }
        mime_action(self.prefs.as_ref(), effective).or_else(|| {
            if context.guessed_mime.is_some() && !context.declared_mime.is_empty() {
                mime_action(self.prefs.as_ref(), &context.declared_mime)
            } else {
                None
            }
        })
    }

    /// Run the full flow for one response.
    ///
    /// The request id is registered with [`DecisionEngine::control`] as soon
    /// as this is called, before the future is first polled, and stays
    /// registered until the future completes or is dropped. Returns
    /// [`EngineError::Aborted`] if the request is aborted before the user
    /// answers the dialog.
    pub fn handle(
        &self,
        details: ResponseDetails,
    ) -> impl Future<Output = Result<Outcome, EngineError>> + Send + '_ {
        let registration = self.control.register(details.request_id);
        self.run(details, registration)
    }

    async fn run(
        &self,
        details: ResponseDetails,
        registration: Registration,
    ) -> Result<Outcome, EngineError> {
        match self.plan(&details) {
            Plan::PassThrough | Plan::BrowserDownload { .. } => Ok(Outcome::PassThrough),
            Plan::Unsniff { content_type } => {
                let mut headers = details.headers;
                apply::unsniff(&mut headers, &content_type);
                Ok(Outcome::Modified {
                    headers,
                    decision: Decision::new(Action::ForceUnsniff).with_mime(content_type),
                })
            }
            Plan::Remembered { action, context } => {
                debug!(request_id = details.request_id, action = %action, "applying remembered action");
                match self.apply(details.headers.clone(), &context, &details.url, &action, true) {
                    Some(outcome) => Ok(outcome),
                    None => self.prompt_and_apply(details, context, registration).await,
                }
            }
            Plan::Prompt(context) => self.prompt_and_apply(details, context, registration).await,
        }
    }

    async fn prompt_and_apply(
        &self,
        details: ResponseDetails,
        context: FlowContext,
        mut registration: Registration,
    ) -> Result<Outcome, EngineError> {
        let request_id = details.request_id;
        if registration.token().is_aborted() {
            debug!(request_id, "aborted before prompting");
            return Err(EngineError::Aborted(request_id));
        }

        let request = self.prompt_request(&details, &context);
        let reply = tokio::select! {
            biased;
            () = registration.token_mut().aborted() => {
                debug!(request_id, "aborted while prompting");
                return Err(EngineError::Aborted(request_id));
            }
            reply = self.prompter.prompt(request) => reply,
        };
        drop(registration);

        let (action, remember) = match reply {
            Ok(PromptReply::Choose { action, remember }) => (action, remember),
            Ok(PromptReply::Dismissed) => {
                debug!(request_id, "dialog dismissed, cancelling request");
                return Ok(Outcome::CancelRequest);
            }
            Err(e) => {
                warn!(request_id, error = %e, "prompt failed, leaving response alone");
                return Ok(Outcome::PassThrough);
            }
        };

        match self.apply(details.headers, &context, &details.url, &action, remember) {
            Some(outcome) => {
                let mime = context.effective_mime();
                if remember && mime.is_empty() {
                    debug!(request_id, "no MIME type to remember the choice under");
                } else if remember {
                    set_mime_action(self.prefs.as_ref(), mime, &action);
                }
                Ok(outcome)
            }
            None => Ok(Outcome::PassThrough),
        }
    }

    fn prompt_request(&self, details: &ResponseDetails, context: &FlowContext) -> PromptRequest {
        let viewers = self
            .viewers
            .for_mime(context.effective_mime())
            .map(|v| ViewerChoice {
                id: v.id.clone(),
                name: v.name.clone(),
            })
            .collect();
        PromptRequest {
            request_id: details.request_id,
            url: details.url.clone(),
            url_parts: UrlParts::split(&details.url),
            filename: context.filename.clone(),
            content_type: context.content_type.clone(),
            declared_mime: context.declared_mime.clone(),
            guessed_mime: context.guessed_mime.clone(),
            content_length: context.content_length,
            viewers,
        }
    }

    /// Turn an action into an outcome. `None` when the action names a viewer
    /// that does not exist or does not accept the type.
    fn apply(
        &self,
        mut headers: HeaderList,
        context: &FlowContext,
        url: &str,
        action: &MimeAction,
        remember: bool,
    ) -> Option<Outcome> {
        let decision = decision_for(action, context, remember);
        match action {
            MimeAction::OpenAsMime(mime) => apply::open_as_mime(&mut headers, mime),
            MimeAction::OpenAsGeneric(kind) => apply::open_as_mime(&mut headers, kind.mime_type()),
            MimeAction::OpenAsServerSent => apply::open_as_server_sent(&mut headers),
            MimeAction::Download => apply::download(&mut headers, &context.filename),
            MimeAction::OpenWith(viewer_id) => {
                let mime = context.effective_mime();
                let Some(viewer) = self.viewers.get(viewer_id) else {
                    warn!(viewer = %viewer_id, "unknown external viewer");
                    return None;
                };
                if !viewer.accepts(mime) {
                    warn!(viewer = %viewer_id, mime, "external viewer does not accept type");
                    return None;
                }
                return Some(Outcome::Redirect {
                    url: viewer.target_url(url),
                    decision,
                });
            }
        }
        Some(Outcome::Modified { headers, decision })
    }
}

#[cfg(test)]
mod tests;

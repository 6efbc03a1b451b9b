use std::sync::Mutex;

use async_trait::async_trait;

use super::*;
use crate::prefs::{GenericKind, MemoryPreferences};
use crate::viewers::ViewerRegistry;

/// Answers every prompt with a fixed reply and records the requests.
struct FixedPrompter {
    reply: anyhow::Result<PromptReply>,
    seen: Mutex<Vec<PromptRequest>>,
}

impl FixedPrompter {
    fn new(reply: PromptReply) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(anyhow::anyhow!("no window")),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<PromptRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for FixedPrompter {
    async fn prompt(&self, request: PromptRequest) -> anyhow::Result<PromptReply> {
        self.seen.lock().unwrap().push(request);
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(e) => Err(anyhow::anyhow!("{e}")),
        }
    }
}

fn engine(prefs: Arc<MemoryPreferences>, prompter: Arc<FixedPrompter>) -> DecisionEngine {
    DecisionEngine::new(prefs, prompter)
        .with_viewers(Arc::new(ViewerRegistry::with_builtin(&[]).unwrap()))
}

fn response(url: &str, lines: &[&str]) -> ResponseDetails {
    ResponseDetails::new(1, url, "HTTP/1.1 200 OK", HeaderList::from_lines(lines))
}

#[test]
fn non_200_is_not_intercepted() {
    let e = engine(Arc::new(MemoryPreferences::new()), FixedPrompter::new(PromptReply::save()));
    let mut details = response("https://x.com/a.zip", &["Content-Type: application/zip"]);
    details.status_line = "HTTP/1.1 206 Partial Content".into();
    assert_eq!(e.plan(&details), Plan::PassThrough);
}

#[test]
fn inline_types_pass_through() {
    let e = engine(Arc::new(MemoryPreferences::new()), FixedPrompter::new(PromptReply::save()));
    for ct in ["image/png", "text/html; charset=utf-8", "", "text/plain; charset=utf-8"] {
        let details = response("https://x.com/a", &[&format!("Content-Type: {ct}")]);
        assert_eq!(e.plan(&details), Plan::PassThrough, "{ct}");
    }
}

#[test]
fn sniffable_text_is_unsniffed_unless_disabled() {
    let prefs = Arc::new(MemoryPreferences::new());
    let e = engine(prefs.clone(), FixedPrompter::new(PromptReply::save()));
    let details = response("https://x.com/a.txt", &["Content-Type: text/plain"]);
    assert_eq!(
        e.plan(&details),
        Plan::Unsniff {
            content_type: "Text/plain".into()
        }
    );

    prefs.set_flag(PrefFlag::TextNosniff, false);
    assert_eq!(e.plan(&details), Plan::PassThrough);
}

#[test]
fn octet_stream_guesses_from_url_filename() {
    let e = engine(Arc::new(MemoryPreferences::new()), FixedPrompter::new(PromptReply::save()));
    let details = response(
        "https://x.com/files/report.pdf",
        &["Content-Type: application/octet-stream", "Content-Length: 2048"],
    );
    let Plan::Prompt(context) = e.plan(&details) else {
        panic!("expected prompt");
    };
    assert_eq!(context.filename, "report.pdf");
    assert_eq!(context.declared_mime, "application/octet-stream");
    assert_eq!(context.guessed_mime.as_deref(), Some("application/pdf"));
    assert_eq!(context.content_length, Some(2048));
    assert_eq!(context.effective_mime(), "application/pdf");
}

#[test]
fn octet_sniff_can_be_disabled() {
    let prefs = Arc::new(MemoryPreferences::with_flags([(PrefFlag::OctetSniffMime, false)]));
    let e = engine(prefs, FixedPrompter::new(PromptReply::save()));
    let details = response("https://x.com/report.pdf", &["Content-Type: application/octet-stream"]);
    let Plan::Prompt(context) = e.plan(&details) else {
        panic!("expected prompt");
    };
    assert_eq!(context.guessed_mime, None);
}

#[test]
fn attachment_respects_override_flag() {
    let prefs = Arc::new(MemoryPreferences::new());
    let e = engine(prefs.clone(), FixedPrompter::new(PromptReply::save()));
    let details = response(
        "https://x.com/dl?id=1",
        &["Content-Type: image/png", "Content-Disposition: attachment; filename=\"cat.png\""],
    );
    let Plan::Prompt(context) = e.plan(&details) else {
        panic!("attachment should prompt even for inline types");
    };
    assert!(context.attachment);
    assert_eq!(context.filename, "cat.png");

    prefs.set_flag(PrefFlag::OverrideDownloadType, false);
    assert_eq!(
        e.plan(&details),
        Plan::BrowserDownload {
            filename: "cat.png".into()
        }
    );
}

#[test]
fn force_dialog_skips_classification_and_memory() {
    let prefs = Arc::new(MemoryPreferences::new());
    prefs.set_mime_action_code("image/png", "=".into());
    let e = engine(prefs, FixedPrompter::new(PromptReply::save()));
    let details = response("https://x.com/cat.png", &["Content-Type: image/png"]).with_force_dialog(true);
    assert!(matches!(e.plan(&details), Plan::Prompt(_)));
}

#[test]
fn remembered_action_is_looked_up_by_guessed_then_declared() {
    let prefs = Arc::new(MemoryPreferences::new());
    prefs.set_mime_action_code("application/octet-stream", "=".into());
    let e = engine(prefs.clone(), FixedPrompter::new(PromptReply::save()));
    let details = response("https://x.com/report.pdf", &["Content-Type: application/octet-stream"]);
    assert!(matches!(
        e.plan(&details),
        Plan::Remembered {
            action: MimeAction::Download,
            ..
        }
    ));

    prefs.set_mime_action_code("application/pdf", "1text".into());
    let plan = e.plan(&details);
    assert!(matches!(
        plan,
        Plan::Remembered {
            action: MimeAction::OpenAsGeneric(GenericKind::Text),
            ..
        }
    ));
    let decision = plan.decision().unwrap();
    assert_eq!(decision.action, Action::RenderInline);
    assert_eq!(decision.mime.as_deref(), Some("text/plain"));
    assert!(decision.remember);
}

#[tokio::test]
async fn prompt_open_as_rewrites_headers_and_remembers() {
    let prefs = Arc::new(MemoryPreferences::new());
    let prompter = FixedPrompter::new(PromptReply::open_as("text/plain").remembered());
    let e = engine(prefs.clone(), prompter.clone());
    let details = response("https://x.com/data.csv", &["Content-Type: text/csv"]);

    let outcome = e.handle(details).await.unwrap();
    let Outcome::Modified { headers, decision } = outcome else {
        panic!("expected modified headers");
    };
    assert_eq!(headers.get("Content-Type"), Some("text/plain"));
    assert_eq!(headers.get("X-Content-Type-Options"), Some("nosniff"));
    assert_eq!(headers.get("Content-Disposition"), Some("inline"));
    assert_eq!(decision.action, Action::RenderInline);
    assert!(decision.remember);
    assert_eq!(prefs.mime_action_code("text/csv").as_deref(), Some("0text/plain"));

    let requests = prompter.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].filename, "data.csv");
    assert_eq!(requests[0].url_parts.host, "x.com");
    assert_eq!(requests[0].viewers.len(), 1);
    assert_eq!(requests[0].viewers[0].id, "google_docs");
}

#[tokio::test]
async fn prompt_save_sets_attachment() {
    let prefs = Arc::new(MemoryPreferences::new());
    let e = engine(prefs.clone(), FixedPrompter::new(PromptReply::save()));
    let details = response("https://x.com/a%20b.zip", &["Content-Type: application/zip"]);
    let outcome = e.handle(details).await.unwrap();
    let Outcome::Modified { headers, decision } = outcome else {
        panic!("expected modified headers");
    };
    assert_eq!(
        headers.get("Content-Disposition"),
        Some("attachment; filename*=UTF-8''a%20b.zip")
    );
    assert_eq!(decision.action, Action::Download);
    assert!(prefs.mime_mappings().is_empty());
}

#[tokio::test]
async fn dismissed_dialog_cancels_request() {
    let e = engine(Arc::new(MemoryPreferences::new()), FixedPrompter::new(PromptReply::Dismissed));
    let details = response("https://x.com/a.zip", &["Content-Type: application/zip"]);
    assert_eq!(e.handle(details).await.unwrap(), Outcome::CancelRequest);
}

#[tokio::test]
async fn failing_prompter_fails_open() {
    let e = engine(Arc::new(MemoryPreferences::new()), FixedPrompter::failing());
    let details = response("https://x.com/a.zip", &["Content-Type: application/zip"]);
    assert_eq!(e.handle(details).await.unwrap(), Outcome::PassThrough);
    assert!(!e.control().is_registered(1));
}

#[tokio::test]
async fn open_with_redirects_to_viewer() {
    let prefs = Arc::new(MemoryPreferences::new());
    let e = engine(prefs.clone(), FixedPrompter::new(PromptReply::open_with("google_docs").remembered()));
    let details = response("https://x.com/a.docx", &["Content-Type: application/msword"]);
    let outcome = e.handle(details).await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Redirect {
            url: "https://docs.google.com/viewer?url=https%3A%2F%2Fx.com%2Fa.docx".into(),
            decision: Decision::new(Action::OpenWith("google_docs".into()))
                .with_filename("a.docx")
                .remembered(true),
        }
    );
    assert_eq!(prefs.mime_action_code("application/msword").as_deref(), Some("+google_docs"));
}

#[tokio::test]
async fn remembered_unknown_viewer_falls_back_to_prompt() {
    let prefs = Arc::new(MemoryPreferences::new());
    prefs.set_mime_action_code("application/zip", "+gone".into());
    let prompter = FixedPrompter::new(PromptReply::save());
    let e = engine(prefs, prompter.clone());
    let details = response("https://x.com/a.zip", &["Content-Type: application/zip"]);
    let outcome = e.handle(details).await.unwrap();
    assert_eq!(outcome.decision().map(|d| &d.action), Some(&Action::Download));
    assert_eq!(prompter.requests().len(), 1);
}

#[tokio::test]
async fn remember_without_mime_type_stores_nothing() {
    let prefs = Arc::new(MemoryPreferences::new());
    let e = engine(prefs.clone(), FixedPrompter::new(PromptReply::save().remembered()));
    let details = response("https://x.com/get", &["Content-Disposition: attachment; filename=x"]);

    let outcome = e.handle(details).await.unwrap();
    let decision = outcome.decision().expect("download decision");
    assert_eq!(decision.action, Action::Download);
    assert!(prefs.mime_mappings().is_empty());
}

#[tokio::test]
async fn every_flow_unregisters_when_done() {
    let e = engine(Arc::new(MemoryPreferences::new()), FixedPrompter::new(PromptReply::save()));
    let pass = response("https://x.com/", &["Content-Type: text/html"]);
    let prompt = response("https://x.com/a.zip", &["Content-Type: application/zip"]);
    assert_eq!(e.handle(pass).await.unwrap(), Outcome::PassThrough);
    assert!(matches!(e.handle(prompt).await.unwrap(), Outcome::Modified { .. }));
    assert!(e.control().is_empty());
}

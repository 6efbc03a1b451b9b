//! Terminal stand-ins for the browser dialog.

use anyhow::{Context, Result};
use async_trait::async_trait;
use oib_core::engine::{PromptReply, PromptRequest, Prompter};
use oib_core::prefs::{GenericKind, MimeAction};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Parse a dialog answer: `save`, `cancel`, `server`,
/// `open-as:<mime>`, `open-as:<text|web|xml|image>`, `open-with:<viewer>`.
pub fn parse_choice(s: &str) -> Result<PromptReply, String> {
    let s = s.trim();
    let reply = match s.split_once(':') {
        None => match s {
            "save" => PromptReply::save(),
            "cancel" => PromptReply::Dismissed,
            "server" => PromptReply::once(MimeAction::OpenAsServerSent),
            _ => return Err(format!("unknown choice {s:?}")),
        },
        Some(("open-as", target)) if target.contains('/') => PromptReply::open_as(target.trim()),
        Some(("open-as", kind)) => kind
            .parse::<GenericKind>()
            .map(|k| PromptReply::once(MimeAction::OpenAsGeneric(k)))
            .map_err(|e| e.to_string())?,
        Some(("open-with", viewer)) if !viewer.trim().is_empty() => {
            PromptReply::open_with(viewer.trim())
        }
        Some(_) => return Err(format!("unknown choice {s:?}")),
    };
    Ok(reply)
}

/// Answers every prompt with the same reply.
pub struct FixedPrompter(pub PromptReply);

#[async_trait]
impl Prompter for FixedPrompter {
    async fn prompt(&self, request: PromptRequest) -> Result<PromptReply> {
        tracing::debug!(request_id = request.request_id, "answering prompt from --choice");
        Ok(self.0.clone())
    }
}

/// Shows the request on stderr and reads the answer from stdin.
/// End of input dismisses the dialog.
pub struct StdinPrompter;

#[async_trait]
impl Prompter for StdinPrompter {
    async fn prompt(&self, request: PromptRequest) -> Result<PromptReply> {
        eprintln!("{}", describe(&request));
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            eprint!("> ");
            let Some(line) = lines.next_line().await.context("read answer from stdin")? else {
                return Ok(PromptReply::Dismissed);
            };
            let (answer, remember) = match line.trim().strip_suffix(" remember") {
                Some(answer) => (answer, true),
                None => (line.trim(), false),
            };
            match parse_choice(answer) {
                Ok(reply) if remember => return Ok(reply.remembered()),
                Ok(reply) => return Ok(reply),
                Err(e) => eprintln!("{e}"),
            }
        }
    }
}

fn describe(request: &PromptRequest) -> String {
    let parts = &request.url_parts;
    let mut out = format!(
        "Opening {}\n  from {}{}{}\n  type: {}",
        request.filename, parts.scheme, parts.host, parts.remainder, request.declared_mime
    );
    if let Some(guess) = &request.guessed_mime {
        out.push_str(&format!(" (looks like {guess})"));
    }
    if let Some(len) = request.content_length {
        out.push_str(&format!("\n  size: {len} bytes"));
    }
    if !request.viewers.is_empty() {
        let viewers: Vec<_> = request
            .viewers
            .iter()
            .map(|v| format!("{} ({})", v.id, v.name))
            .collect();
        out.push_str(&format!("\n  viewers: {}", viewers.join(", ")));
    }
    out.push_str(
        "\nAnswer save, cancel, server, open-as:<mime|text|web|xml|image> or open-with:<viewer>;\n\
         append ' remember' to use it for every response of this type.",
    );
    out
}

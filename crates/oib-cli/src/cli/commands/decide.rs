//! `oib decide --url <url> [-H 'Name: value']...` – run one decision flow.

use std::sync::Arc;

use anyhow::Result;
use oib_core::config::OibConfig;
use oib_core::engine::{DecisionEngine, Outcome, Plan, PromptReply, Prompter, ResponseDetails};
use oib_core::headers::HeaderList;
use oib_core::prefs::Preferences;

use super::prefs::{load_preferences, save};
use crate::cli::prompter::{FixedPrompter, StdinPrompter};

/// The CLI handles a single response per invocation.
const REQUEST_ID: u64 = 1;

pub struct DecideArgs {
    pub url: String,
    pub status: String,
    pub headers: Vec<String>,
    pub force_dialog: bool,
    /// Scripted dialog answer; `None` asks on stdin.
    pub choice: Option<PromptReply>,
    pub plan_only: bool,
}

pub async fn run_decide(cfg: &OibConfig, args: DecideArgs) -> Result<()> {
    let (prefs, prefs_path) = load_preferences(cfg)?;
    let prefs = Arc::new(prefs);
    let before = prefs.mime_mappings();

    let prompter: Arc<dyn Prompter> = match args.choice {
        Some(reply) => Arc::new(FixedPrompter(reply)),
        None => Arc::new(StdinPrompter),
    };
    let prefs_dyn: Arc<dyn Preferences> = prefs.clone();
    let engine = DecisionEngine::new(prefs_dyn, prompter)
        .with_viewers(Arc::new(cfg.viewer_registry()?))
        .with_fallback_filename(cfg.fallback_filename.clone());

    let details = ResponseDetails::new(
        REQUEST_ID,
        args.url,
        args.status,
        HeaderList::from_lines(&args.headers),
    )
    .with_force_dialog(args.force_dialog);

    if args.plan_only {
        print_plan(&engine.plan(&details));
        return Ok(());
    }

    // Ctrl+C while the dialog is open aborts the request like a closed tab.
    let control = Arc::clone(engine.control());
    let abort_on_interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            control.request_abort(REQUEST_ID);
        }
    });
    let result = engine.handle(details).await;
    abort_on_interrupt.abort();

    let outcome = result?;
    print_outcome(&outcome);

    if prefs.mime_mappings() != before {
        save(&prefs, &prefs_path)?;
    }
    Ok(())
}

fn print_plan(plan: &Plan) {
    match plan {
        Plan::PassThrough => println!("pass-through"),
        Plan::Unsniff { content_type } => println!("unsniff\tContent-Type: {content_type}"),
        Plan::BrowserDownload { filename } => println!("browser-download\t{filename}"),
        Plan::Remembered { action, context } => {
            println!("remembered\t{action}\t{}", context.filename);
        }
        Plan::Prompt(context) => {
            let guessed = context.guessed_mime.as_deref().unwrap_or("-");
            println!(
                "prompt\t{}\tdeclared: {}\tguessed: {guessed}",
                context.filename, context.declared_mime
            );
        }
    }
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::PassThrough => println!("pass-through"),
        Outcome::CancelRequest => println!("cancel"),
        Outcome::Redirect { url, .. } => println!("redirect\t{url}"),
        Outcome::Modified { headers, decision } => {
            println!("modified\t{:?}", decision.action);
            for header in headers.iter() {
                println!("{}: {}", header.name, header.value);
            }
        }
    }
}

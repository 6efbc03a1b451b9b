//! CLI for the OIB response decision engine.

mod commands;
mod prompter;

use anyhow::Result;
use clap::{Parser, Subcommand};
use oib_core::config;
use oib_core::engine::PromptReply;

use commands::{
    run_classify, run_completions, run_content_type, run_decide, run_disposition, run_filename,
    run_manpage, run_prefs, run_viewers, DecideArgs,
};
use prompter::parse_choice;

/// Top-level CLI for the OIB response decision engine.
#[derive(Debug, Parser)]
#[command(name = "oib")]
#[command(about = "OIB: decide whether HTTP responses open in the browser or download", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Parse a Content-Type header value.
    ContentType {
        /// Raw header value, e.g. 'text/html; charset=utf-8'.
        value: String,
    },

    /// Parse a Content-Disposition header value.
    Disposition {
        /// Raw header value, e.g. 'attachment; filename="a.txt"'.
        value: String,
    },

    /// Derive the filename for a response.
    Filename {
        /// Request URL.
        #[arg(long)]
        url: String,
        /// Content-Disposition header value, if any.
        #[arg(long)]
        disposition: Option<String>,
    },

    /// Classify a Content-Type the way the browser's viewers would.
    Classify {
        /// Raw Content-Type header value.
        content_type: String,
        /// Content-Encoding header value, if any.
        #[arg(long)]
        encoding: Option<String>,
    },

    /// Run the full decision flow for one response.
    Decide {
        /// Request URL.
        #[arg(long)]
        url: String,
        /// HTTP status line.
        #[arg(long, default_value = "HTTP/1.1 200 OK")]
        status: String,
        /// Response header as 'Name: value'; repeatable.
        #[arg(short = 'H', long = "header", value_name = "HEADER")]
        headers: Vec<String>,
        /// Always ask, ignoring the type and remembered actions.
        #[arg(long)]
        force_dialog: bool,
        /// Answer the dialog non-interactively: save, cancel, server,
        /// open-as:<mime|text|web|xml|image>, open-with:<viewer>.
        #[arg(long, value_parser = parse_choice)]
        choice: Option<PromptReply>,
        /// Remember the --choice for this type.
        #[arg(long, requires = "choice")]
        remember: bool,
        /// Only show the plan; never prompt or change preferences.
        #[arg(long, conflicts_with_all = ["choice", "remember"])]
        plan: bool,
    },

    /// Show or change preferences and remembered actions.
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },

    /// List external viewers.
    Viewers,

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print the man page to stdout.
    Man,
}

#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// Show flags and remembered actions.
    List,
    /// Remember an action code for a MIME type (e.g. '=', '0text/plain', '+google_docs').
    Set {
        mime: String,
        code: String,
    },
    /// Forget the remembered action for a MIME type.
    Remove {
        mime: String,
    },
    /// Set a flag (text-nosniff, octet-sniff-mime, override-download-type).
    Flag {
        name: String,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // No config or state needed to generate these.
        match cli.command {
            CliCommand::Completions { shell } => return run_completions(shell),
            CliCommand::Man => return run_manpage(),
            _ => {}
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::ContentType { value } => run_content_type(&value),
            CliCommand::Disposition { value } => run_disposition(&value),
            CliCommand::Filename { url, disposition } => {
                run_filename(&cfg, &url, disposition.as_deref())
            }
            CliCommand::Classify {
                content_type,
                encoding,
            } => run_classify(&content_type, encoding.as_deref()),
            CliCommand::Decide {
                url,
                status,
                headers,
                force_dialog,
                choice,
                remember,
                plan,
            } => {
                let args = DecideArgs {
                    url,
                    status,
                    headers,
                    force_dialog,
                    choice: if remember { choice.map(PromptReply::remembered) } else { choice },
                    plan_only: plan,
                };
                run_decide(&cfg, args).await
            }
            CliCommand::Prefs { command } => run_prefs(&cfg, command),
            CliCommand::Viewers => run_viewers(&cfg),
            CliCommand::Completions { .. } | CliCommand::Man => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests;

//! Tests for content-type, disposition, filename, classify, viewers, prefs, completions.

use super::parse;
use crate::cli::{Cli, CliCommand, PrefsCommand};
use clap::Parser;

#[test]
fn cli_parse_content_type() {
    match parse(&["oib", "content-type", "text/html; charset=utf-8"]) {
        CliCommand::ContentType { value } => assert_eq!(value, "text/html; charset=utf-8"),
        _ => panic!("expected ContentType"),
    }
}

#[test]
fn cli_parse_disposition() {
    match parse(&["oib", "disposition", "attachment; filename=\"a b.txt\""]) {
        CliCommand::Disposition { value } => assert_eq!(value, "attachment; filename=\"a b.txt\""),
        _ => panic!("expected Disposition"),
    }
}

#[test]
fn cli_parse_filename() {
    match parse(&["oib", "filename", "--url", "https://x.com/a.zip"]) {
        CliCommand::Filename { url, disposition } => {
            assert_eq!(url, "https://x.com/a.zip");
            assert!(disposition.is_none());
        }
        _ => panic!("expected Filename"),
    }
    match parse(&["oib", "filename", "--url", "https://x.com/", "--disposition", "attachment; filename=r.pdf"]) {
        CliCommand::Filename { disposition, .. } => {
            assert_eq!(disposition.as_deref(), Some("attachment; filename=r.pdf"));
        }
        _ => panic!("expected Filename with --disposition"),
    }
}

#[test]
fn cli_parse_classify() {
    match parse(&["oib", "classify", "text/plain", "--encoding", "gzip"]) {
        CliCommand::Classify {
            content_type,
            encoding,
        } => {
            assert_eq!(content_type, "text/plain");
            assert_eq!(encoding.as_deref(), Some("gzip"));
        }
        _ => panic!("expected Classify"),
    }
}

#[test]
fn cli_parse_viewers_and_man() {
    assert!(matches!(parse(&["oib", "viewers"]), CliCommand::Viewers));
    assert!(matches!(parse(&["oib", "man"]), CliCommand::Man));
}

#[test]
fn cli_parse_completions() {
    match parse(&["oib", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
    assert!(Cli::try_parse_from(["oib", "completions", "cmd.exe"]).is_err());
}

#[test]
fn cli_parse_prefs() {
    match parse(&["oib", "prefs", "list"]) {
        CliCommand::Prefs {
            command: PrefsCommand::List,
        } => {}
        _ => panic!("expected prefs list"),
    }
    match parse(&["oib", "prefs", "set", "application/pdf", "0text/plain"]) {
        CliCommand::Prefs {
            command: PrefsCommand::Set { mime, code },
        } => {
            assert_eq!(mime, "application/pdf");
            assert_eq!(code, "0text/plain");
        }
        _ => panic!("expected prefs set"),
    }
    match parse(&["oib", "prefs", "remove", "text/csv"]) {
        CliCommand::Prefs {
            command: PrefsCommand::Remove { mime },
        } => assert_eq!(mime, "text/csv"),
        _ => panic!("expected prefs remove"),
    }
    match parse(&["oib", "prefs", "flag", "text-nosniff", "false"]) {
        CliCommand::Prefs {
            command: PrefsCommand::Flag { name, value },
        } => {
            assert_eq!(name, "text-nosniff");
            assert!(!value);
        }
        _ => panic!("expected prefs flag"),
    }
}

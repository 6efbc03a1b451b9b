//! `oib classify <content-type> [--encoding <value>]` – how the browser treats a type.

use anyhow::Result;
use oib_core::sniff::{classify_response, MimeClassification};

pub fn run_classify(content_type: &str, encoding: Option<&str>) -> Result<()> {
    let classification = classify_response(content_type, encoding);
    let label = match classification {
        MimeClassification::AlwaysInline => "always-inline",
        MimeClassification::NeverInline => "never-inline",
        MimeClassification::TextSniffable => "text-sniffable",
        MimeClassification::TextUnsniffable => "text-unsniffable",
        MimeClassification::Unknown => "unknown",
    };
    let intercept = if classification.needs_decision() { "yes" } else { "no" };
    println!("{label}\tintercept: {intercept}");
    Ok(())
}

//! `oib disposition <value>` – parse a Content-Disposition header.

use anyhow::Result;
use oib_core::disposition::parse_content_disposition;

pub fn run_disposition(value: &str) -> Result<()> {
    let parsed = parse_content_disposition(value);
    println!("{:<12} {}", "ATTACHMENT", parsed.is_attachment);
    println!("{:<12} {}", "FILENAME", parsed.filename.as_deref().unwrap_or("-"));
    Ok(())
}

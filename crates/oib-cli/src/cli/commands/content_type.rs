//! `oib content-type <value>` – parse a Content-Type header.

use anyhow::Result;
use oib_core::content_type::parse_content_type;

pub fn run_content_type(value: &str) -> Result<()> {
    let parsed = parse_content_type(value);
    println!("{:<10} {}", "MIME", display(&parsed.mime_type));
    println!("{:<10} {}", "CHARSET", display(&parsed.charset));
    Ok(())
}

fn display(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

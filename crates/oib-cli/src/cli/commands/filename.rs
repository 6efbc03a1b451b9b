//! `oib filename --url <url> [--disposition <value>]` – resolve a response filename.

use anyhow::Result;
use oib_core::config::OibConfig;
use oib_core::filename::{resolve_filename_with_source, FilenameSource};

pub fn run_filename(cfg: &OibConfig, url: &str, disposition: Option<&str>) -> Result<()> {
    let (name, source) = resolve_filename_with_source(url, disposition, &cfg.fallback_filename);
    let source = match source {
        FilenameSource::ContentDisposition => "content-disposition",
        FilenameSource::Url => "url",
        FilenameSource::Fallback => "fallback",
    };
    println!("{name}\t({source})");
    Ok(())
}

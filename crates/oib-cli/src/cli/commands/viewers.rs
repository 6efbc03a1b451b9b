//! `oib viewers` – list external viewers.

use anyhow::Result;
use oib_core::config::OibConfig;
use oib_core::viewers::ViewerKind;

pub fn run_viewers(cfg: &OibConfig) -> Result<()> {
    let registry = cfg.viewer_registry()?;
    println!("{:<16} {:<10} {:<24} {}", "ID", "TYPE", "NAME", "MIME TYPES");
    for viewer in registry.iter() {
        let kind = match viewer.kind {
            ViewerKind::Web => "web",
            ViewerKind::Extension { .. } => "extension",
        };
        println!(
            "{:<16} {:<10} {:<24} {}",
            viewer.id,
            kind,
            viewer.name,
            viewer.mime_types().join(", ")
        );
    }
    Ok(())
}

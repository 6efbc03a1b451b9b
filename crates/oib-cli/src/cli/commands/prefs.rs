//! `oib prefs list|set|remove|flag` – preferences and remembered actions.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use oib_core::config::OibConfig;
use oib_core::prefs::{MemoryPreferences, MimeAction, PrefFlag, Preferences};

use crate::cli::PrefsCommand;

/// Saved preferences, or a fresh store seeded from the config defaults.
pub(super) fn load_preferences(cfg: &OibConfig) -> Result<(MemoryPreferences, PathBuf)> {
    let path = MemoryPreferences::default_path()?;
    let prefs = match MemoryPreferences::load_from_path(&path)? {
        Some(prefs) => prefs,
        None => {
            tracing::debug!(path = %path.display(), "no saved preferences, using config defaults");
            cfg.pref_defaults().to_preferences()
        }
    };
    Ok((prefs, path))
}

pub fn run_prefs(cfg: &OibConfig, command: PrefsCommand) -> Result<()> {
    let (prefs, path) = load_preferences(cfg)?;
    match command {
        PrefsCommand::List => list(&prefs),
        PrefsCommand::Set { mime, code } => {
            let action = MimeAction::decode(&code)
                .with_context(|| format!("invalid action code {code:?}"))?;
            prefs.set_mime_action_code(&mime.to_ascii_lowercase(), action.encode());
            save(&prefs, &path)?;
            println!("{mime}: {action}");
        }
        PrefsCommand::Remove { mime } => {
            if !prefs.remove_mime_action(&mime.to_ascii_lowercase()) {
                bail!("no remembered action for {mime}");
            }
            save(&prefs, &path)?;
            println!("Removed {mime}");
        }
        PrefsCommand::Flag { name, value } => {
            let Some(flag) = PrefFlag::from_key(&name) else {
                let known: Vec<_> = PrefFlag::ALL.iter().map(|f| f.key()).collect();
                bail!("unknown flag {name:?} (known: {})", known.join(", "));
            };
            prefs.set_flag(flag, value);
            save(&prefs, &path)?;
            println!("{name} = {value}");
        }
    }
    Ok(())
}

fn list(prefs: &MemoryPreferences) {
    for flag in PrefFlag::ALL {
        println!("{:<24} {}", flag.key(), prefs.flag(flag));
    }
    let mappings = prefs.mime_mappings();
    if mappings.is_empty() {
        println!("No remembered actions.");
        return;
    }
    println!();
    println!("{:<40} {:<16} {}", "MIME", "CODE", "ACTION");
    for (mime, code) in mappings {
        let action = MimeAction::decode(&code)
            .map(|a| a.to_string())
            .unwrap_or_else(|e| format!("invalid: {e}"));
        println!("{mime:<40} {code:<16} {action}");
    }
}

pub(super) fn save(prefs: &MemoryPreferences, path: &Path) -> Result<()> {
    prefs.save_to_path(path)?;
    tracing::debug!(path = %path.display(), "saved preferences");
    Ok(())
}

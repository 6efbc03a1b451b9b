//! Persist MemoryPreferences to disk (JSON under XDG state dir) so remembered
//! choices survive across runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::memory::MemoryPreferences;
use super::PrefFlag;

/// Snapshot of the preference store for JSON serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedPreferences {
    #[serde(default = "default_version")]
    pub version: u8,
    /// Flag values keyed by storage key (`text-nosniff`, ...).
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    /// `mime type -> action code`.
    #[serde(default, rename = "mime-mappings")]
    pub mime_mappings: BTreeMap<String, String>,
}

fn default_version() -> u8 {
    1
}

impl MemoryPreferences {
    /// Default path: `~/.local/state/oib/prefs.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("oib")?;
        Ok(xdg_dirs.get_state_home().join("prefs.json"))
    }

    /// Build a serializable snapshot. Only explicitly set flags are stored.
    pub fn to_snapshot(&self) -> PersistedPreferences {
        let state = self.read();
        PersistedPreferences {
            version: default_version(),
            flags: state
                .flags
                .iter()
                .map(|(flag, value)| (flag.key().to_string(), *value))
                .collect(),
            mime_mappings: state.mime_mappings.clone(),
        }
    }

    /// Restore from a snapshot. Unknown flag keys are dropped.
    pub fn from_snapshot(snapshot: PersistedPreferences) -> Self {
        let prefs = MemoryPreferences::with_flags(
            snapshot
                .flags
                .iter()
                .filter_map(|(key, value)| PrefFlag::from_key(key).map(|f| (f, *value)))
                .collect::<Vec<_>>(),
        );
        prefs.write().mime_mappings = snapshot.mime_mappings;
        prefs
    }

    /// Save to the given path (creates parent dir if needed).
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let snapshot = self.to_snapshot();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&snapshot).context("serialize preferences")?;
        std::fs::write(path, json)
            .with_context(|| format!("write preferences: {}", path.display()))?;
        Ok(())
    }

    /// Load from the given path. A missing file yields `None` so the caller
    /// can start from defaults.
    pub fn load_from_path(path: &Path) -> Result<Option<MemoryPreferences>> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("read preferences: {}", path.display()))
            }
        };
        let snapshot: PersistedPreferences = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse preferences: {}", path.display()))?;
        Ok(Some(MemoryPreferences::from_snapshot(snapshot)))
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::filename::DEFAULT_FILENAME;
use crate::prefs::{MemoryPreferences, PrefFlag};
use crate::viewers::{ViewerConfig, ViewerRegistry};

/// Initial values for the boolean preferences (optional section in config.toml).
///
/// Applied only when no saved preference file exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PrefDefaults {
    /// Render sniffable `text/plain` responses as text.
    pub text_nosniff: bool,
    /// Guess the type of `application/octet-stream` from the file extension.
    pub octet_sniff_mime: bool,
    /// Allow remembered actions and the dialog to override `attachment`.
    pub override_download_type: bool,
}

impl Default for PrefDefaults {
    fn default() -> Self {
        Self {
            text_nosniff: PrefFlag::TextNosniff.default_value(),
            octet_sniff_mime: PrefFlag::OctetSniffMime.default_value(),
            override_download_type: PrefFlag::OverrideDownloadType.default_value(),
        }
    }
}

impl PrefDefaults {
    pub fn value(&self, flag: PrefFlag) -> bool {
        match flag {
            PrefFlag::TextNosniff => self.text_nosniff,
            PrefFlag::OctetSniffMime => self.octet_sniff_mime,
            PrefFlag::OverrideDownloadType => self.override_download_type,
        }
    }

    /// Fresh preference store seeded with these values.
    pub fn to_preferences(&self) -> MemoryPreferences {
        MemoryPreferences::with_flags(PrefFlag::ALL.map(|flag| (flag, self.value(flag))))
    }
}

/// Global configuration loaded from `~/.config/oib/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OibConfig {
    /// Filename used when neither the disposition nor the URL yields one.
    pub fallback_filename: String,
    /// Optional preference defaults; if missing, built-in defaults are used.
    #[serde(default)]
    pub preferences: Option<PrefDefaults>,
    /// Extra external viewers, added after the built-in ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub viewers: Vec<ViewerConfig>,
}

impl Default for OibConfig {
    fn default() -> Self {
        Self {
            fallback_filename: DEFAULT_FILENAME.to_string(),
            preferences: None,
            viewers: Vec::new(),
        }
    }
}

impl OibConfig {
    pub fn pref_defaults(&self) -> PrefDefaults {
        self.preferences.unwrap_or_default()
    }

    /// Built-in viewers plus the configured ones.
    pub fn viewer_registry(&self) -> Result<ViewerRegistry> {
        ViewerRegistry::with_builtin(&self.viewers).context("invalid viewer in config")
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("oib")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<OibConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<OibConfig> {
    if !path.exists() {
        let default_cfg = OibConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: OibConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

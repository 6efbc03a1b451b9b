//! User preferences consulted by the decision engine.
//!
//! The engine only sees the [`Preferences`] trait; storage belongs to the
//! caller. [`MemoryPreferences`] is the in-process implementation used by the
//! CLI and tests, and can be snapshotted to JSON (see `persist`).
//!
//! Concurrent flows share one store. Writes are last-write-wins.

pub mod action;
mod memory;
mod persist;

pub use action::{ActionCodeError, GenericKind, MimeAction};
pub use memory::MemoryPreferences;
pub use persist::PersistedPreferences;

/// Boolean preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefFlag {
    /// Make sniffable `text/plain` responses unsniffable so they render as text.
    TextNosniff,
    /// Guess the type of `application/octet-stream` responses from the file extension.
    OctetSniffMime,
    /// Let remembered actions and the dialog override `attachment` dispositions.
    OverrideDownloadType,
}

impl PrefFlag {
    pub const ALL: [PrefFlag; 3] = [
        PrefFlag::TextNosniff,
        PrefFlag::OctetSniffMime,
        PrefFlag::OverrideDownloadType,
    ];

    /// Storage key, e.g. `text-nosniff`.
    pub fn key(self) -> &'static str {
        match self {
            PrefFlag::TextNosniff => "text-nosniff",
            PrefFlag::OctetSniffMime => "octet-sniff-mime",
            PrefFlag::OverrideDownloadType => "override-download-type",
        }
    }

    pub fn default_value(self) -> bool {
        true
    }

    pub fn from_key(key: &str) -> Option<Self> {
        PrefFlag::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Preference store injected into the decision engine.
pub trait Preferences: Send + Sync {
    fn flag(&self, flag: PrefFlag) -> bool;

    fn set_flag(&self, flag: PrefFlag, value: bool);

    /// Raw stored action code for `mime_type`, if any.
    fn mime_action_code(&self, mime_type: &str) -> Option<String>;

    fn set_mime_action_code(&self, mime_type: &str, code: String);

    /// Returns true if a mapping was removed.
    fn remove_mime_action(&self, mime_type: &str) -> bool;
}

/// Decoded remembered action for `mime_type`.
///
/// An undecodable stored code is logged and treated as "no decision".
pub fn mime_action(prefs: &dyn Preferences, mime_type: &str) -> Option<MimeAction> {
    let code = prefs.mime_action_code(mime_type)?;
    match MimeAction::decode(&code) {
        Ok(action) => Some(action),
        Err(err) => {
            tracing::warn!(mime_type, code = %code, "ignoring stored MIME action: {err}");
            None
        }
    }
}

/// Remember `action` for `mime_type`.
pub fn set_mime_action(prefs: &dyn Preferences, mime_type: &str, action: &MimeAction) {
    tracing::debug!(mime_type, action = %action, "remembering MIME action");
    prefs.set_mime_action_code(mime_type, action.encode());
}

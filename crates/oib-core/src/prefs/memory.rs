//! In-memory preference store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{PrefFlag, Preferences};

#[derive(Debug, Default)]
pub(super) struct PrefState {
    pub(super) flags: HashMap<PrefFlag, bool>,
    pub(super) mime_mappings: BTreeMap<String, String>,
}

/// Process-local [`Preferences`] behind a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    state: RwLock<PrefState>,
}

impl MemoryPreferences {
    /// Store with every flag at its default and no remembered actions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the given flag values; unspecified flags keep defaults.
    pub fn with_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = (PrefFlag, bool)>,
    {
        let prefs = Self::new();
        {
            let mut state = prefs.write();
            state.flags.extend(flags);
        }
        prefs
    }

    /// Store from a `key -> bool` map as supplied by a caller. Unknown keys
    /// are logged and ignored.
    pub fn from_key_map(map: &HashMap<String, bool>) -> Self {
        let flags = map.iter().filter_map(|(key, value)| match PrefFlag::from_key(key) {
            Some(flag) => Some((flag, *value)),
            None => {
                tracing::warn!(key = %key, "ignoring unknown preference");
                None
            }
        });
        Self::with_flags(flags.collect::<Vec<_>>())
    }

    /// Copy of all remembered `mime -> code` mappings, sorted by MIME type.
    pub fn mime_mappings(&self) -> BTreeMap<String, String> {
        self.read().mime_mappings.clone()
    }

    pub(super) fn read(&self) -> RwLockReadGuard<'_, PrefState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn write(&self) -> RwLockWriteGuard<'_, PrefState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Preferences for MemoryPreferences {
    fn flag(&self, flag: PrefFlag) -> bool {
        self.read()
            .flags
            .get(&flag)
            .copied()
            .unwrap_or_else(|| flag.default_value())
    }

    fn set_flag(&self, flag: PrefFlag, value: bool) {
        self.write().flags.insert(flag, value);
    }

    fn mime_action_code(&self, mime_type: &str) -> Option<String> {
        self.read().mime_mappings.get(mime_type).cloned()
    }

    fn set_mime_action_code(&self, mime_type: &str, code: String) {
        self.write().mime_mappings.insert(mime_type.to_string(), code);
    }

    fn remove_mime_action(&self, mime_type: &str) -> bool {
        self.write().mime_mappings.remove(mime_type).is_some()
    }
}

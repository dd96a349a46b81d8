// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use netstore_app_core::config::{ConfigError, ConfigStore};
use netstore_app_core::prefs::{IndexPrefs, INDEX_PREFS_KEY};

/// One call received by an [`InMemoryConfigStore`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCall {
    /// `load_raw(key)`.
    Load(String),
    /// `save_raw(key, _)`.
    Save(String),
}

#[derive(Default)]
struct Entries {
    blobs: BTreeMap<String, Vec<u8>>,
    calls: Vec<ConfigCall>,
    fail_loads: bool,
    fail_saves: bool,
}

/// [`ConfigStore`] kept in memory and shared between clones.
///
/// Every call is logged before failure injection applies, so a failed
/// load still shows up in [`calls`](Self::calls).
///
/// ```
/// use netstore_app_core::config::ConfigService;
/// use netstore_app_core::config_port::PrefsPort;
/// use netstore_app_core::prefs::IndexPrefs;
/// use netstore_dry_tests::InMemoryConfigStore;
/// use netstore_model::ResourceType;
///
/// let store = InMemoryConfigStore::with_prefs(&IndexPrefs::preloading([ResourceType::Line]));
/// let service = ConfigService::new(store.clone());
/// let prefs = service.load_prefs().unwrap_or_default();
/// assert_eq!(prefs.preload, [ResourceType::Line]);
/// assert_eq!(store.load_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    entries: Arc<Mutex<Entries>>,
}

impl InMemoryConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `prefs` under the index prefs key.
    pub fn with_prefs(prefs: &IndexPrefs) -> Self {
        let store = Self::new();
        let bytes = serde_json::to_vec(prefs).unwrap_or_default();
        store.lock().blobs.insert(INDEX_PREFS_KEY.to_owned(), bytes);
        store
    }

    /// Store holding raw `bytes` under `key`, e.g. to feed unreadable JSON.
    pub fn with_raw(key: &str, bytes: &[u8]) -> Self {
        let store = Self::new();
        store.lock().blobs.insert(key.to_owned(), bytes.to_vec());
        store
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes every later load fail.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_loads = fail;
    }

    /// Makes every later save fail.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<ConfigCall> {
        self.lock().calls.clone()
    }

    /// Load attempts, failed ones included.
    pub fn load_count(&self) -> usize {
        self.count(|c| matches!(c, ConfigCall::Load(_)))
    }

    /// Save attempts, failed ones included.
    pub fn save_count(&self) -> usize {
        self.count(|c| matches!(c, ConfigCall::Save(_)))
    }

    fn count(&self, pred: impl Fn(&ConfigCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(*c)).count()
    }

    /// Stored bytes for `key`.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().blobs.get(key).cloned()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.lock().blobs.keys().cloned().collect()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut entries = self.lock();
        entries.calls.push(ConfigCall::Load(key.to_owned()));
        if entries.fail_loads {
            return Err(ConfigError::Other(format!("simulated load failure for '{key}'")));
        }
        entries.blobs.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut entries = self.lock();
        entries.calls.push(ConfigCall::Save(key.to_owned()));
        if entries.fail_saves {
            return Err(ConfigError::Other(format!("simulated save failure for '{key}'")));
        }
        entries.blobs.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use netstore_app_core::config::ConfigService;
    use netstore_app_core::config_port::PrefsPort;
    use netstore_model::ResourceType;

    #[test]
    fn calls_are_logged_in_order() {
        let store = InMemoryConfigStore::new();
        store.save_raw("index", b"{}").unwrap();
        assert!(store.load_raw("missing").is_err());
        assert_eq!(
            store.calls(),
            [
                ConfigCall::Save("index".into()),
                ConfigCall::Load("missing".into())
            ]
        );
    }

    #[test]
    fn missing_key_is_not_found() {
        let store = InMemoryConfigStore::new();
        assert!(matches!(store.load_raw("index"), Err(ConfigError::NotFound)));
    }

    #[test]
    fn failed_saves_store_nothing() {
        let store = InMemoryConfigStore::new();
        store.set_fail_on_save(true);
        assert!(store.save_raw("index", b"{}").is_err());
        assert_eq!(store.save_count(), 1);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn clones_share_entries() {
        let a = InMemoryConfigStore::new();
        let b = a.clone();
        a.save_raw("index", b"[]").unwrap();
        assert_eq!(b.raw("index").unwrap(), b"[]");
    }

    #[test]
    fn prefs_round_trip_through_the_port() {
        let store = InMemoryConfigStore::new();
        let service = ConfigService::new(store.clone());
        let prefs = IndexPrefs::preloading([ResourceType::Substation, ResourceType::Load]);
        service.save_prefs(&prefs);
        assert_eq!(store.keys(), [INDEX_PREFS_KEY]);
        assert_eq!(service.load_prefs(), Some(prefs));
    }

    #[test]
    fn unreadable_or_failing_prefs_load_as_none() {
        let garbage = InMemoryConfigStore::with_raw(INDEX_PREFS_KEY, b"not json");
        assert_eq!(ConfigService::new(garbage).load_prefs(), None);

        let failing = InMemoryConfigStore::with_prefs(&IndexPrefs::default());
        failing.set_fail_on_load(true);
        assert_eq!(ConfigService::new(failing).load_prefs(), None);
    }
}

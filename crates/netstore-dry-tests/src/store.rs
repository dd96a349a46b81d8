// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bundle store wrapper with call counts and failure injection.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use netstore_client::{BundleStore, MemoryStore, StoreError};
use netstore_model::{AnyResource, ResourceType};
use uuid::Uuid;

/// [`BundleStore`] over a [`MemoryStore`] that counts calls and can be told
/// to fail.
///
/// Counters are bumped before the failure check, so they count attempts.
///
/// # Example
///
/// ```
/// use netstore_client::BundleStore;
/// use netstore_dry_tests::ScriptedStore;
/// use uuid::Uuid;
///
/// let store = ScriptedStore::new();
/// store.set_fail_on_fetch(true);
/// assert!(store.fetch_bundle(Uuid::nil(), "L1").is_err());
/// assert_eq!(store.fetch_count(), 1);
/// ```
#[derive(Default)]
pub struct ScriptedStore {
    inner: MemoryStore,
    fetches: AtomicUsize,
    kind_fetches: AtomicUsize,
    saves: AtomicUsize,
    deletes: AtomicUsize,
    fail_on_fetch: AtomicBool,
    fail_on_save: AtomicBool,
    fail_on_delete: AtomicBool,
}

impl ScriptedStore {
    /// Create an empty store with all failures off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backing memory store, for inspecting what was persisted.
    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    /// Make every fetch (single and by kind) fail.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.fail_on_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make every save fail.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.fail_on_save.store(fail, Ordering::SeqCst);
    }

    /// Make every delete fail.
    pub fn set_fail_on_delete(&self, fail: bool) {
        self.fail_on_delete.store(fail, Ordering::SeqCst);
    }

    /// Single-bundle fetch attempts.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Fetch-by-kind attempts.
    pub fn kind_fetch_count(&self) -> usize {
        self.kind_fetches.load(Ordering::SeqCst)
    }

    /// Save attempts.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Delete attempts.
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Zero every counter. Failure switches are left alone.
    pub fn reset_counts(&self) {
        for counter in [&self.fetches, &self.kind_fetches, &self.saves, &self.deletes] {
            counter.store(0, Ordering::SeqCst);
        }
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("simulated {op} failure")));
        }
        Ok(())
    }
}

impl BundleStore for ScriptedStore {
    fn fetch_bundle(&self, network: Uuid, id: &str) -> Result<Option<AnyResource>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_on_fetch, "fetch")?;
        self.inner.fetch_bundle(network, id)
    }

    fn fetch_bundles_by_kind(
        &self,
        network: Uuid,
        kind: ResourceType,
    ) -> Result<Vec<AnyResource>, StoreError> {
        self.kind_fetches.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_on_fetch, "fetch")?;
        self.inner.fetch_bundles_by_kind(network, kind)
    }

    fn save_bundle(&self, network: Uuid, bundle: &AnyResource) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_on_save, "save")?;
        self.inner.save_bundle(network, bundle)
    }

    fn delete_bundle(&self, network: Uuid, id: &str) -> Result<bool, StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_on_delete, "delete")?;
        self.inner.delete_bundle(network, id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use netstore_model::{Resource, SubstationAttributes};

    fn substation(id: &str) -> AnyResource {
        Resource::new(id, SubstationAttributes::default()).into()
    }

    #[test]
    fn passes_through_to_memory() {
        let store = ScriptedStore::new();
        let net = Uuid::new_v4();
        store.save_bundle(net, &substation("S1")).unwrap();
        let back = store.fetch_bundle(net, "S1").unwrap().unwrap();
        assert_eq!(back.id(), "S1");
        assert_eq!(store.memory().len(net), 1);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.fetch_count(), 1);
    }

    #[test]
    fn failures_are_unavailable_and_counted() {
        let store = ScriptedStore::new();
        let net = Uuid::new_v4();
        store.set_fail_on_save(true);
        let err = store.save_bundle(net, &substation("S1")).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.save_count(), 1);
        assert!(store.memory().is_empty(net));

        store.set_fail_on_save(false);
        store.save_bundle(net, &substation("S1")).unwrap();
        store.set_fail_on_delete(true);
        assert!(store.delete_bundle(net, "S1").is_err());
        assert_eq!(store.memory().len(net), 1);
    }

    #[test]
    fn reset_counts_keeps_switches() {
        let store = ScriptedStore::new();
        store.set_fail_on_fetch(true);
        let _ = store.fetch_bundles_by_kind(Uuid::nil(), ResourceType::Load);
        assert_eq!(store.kind_fetch_count(), 1);
        store.reset_counts();
        assert_eq!(store.kind_fetch_count(), 0);
        assert!(store.fetch_bundle(Uuid::nil(), "x").is_err());
    }
}

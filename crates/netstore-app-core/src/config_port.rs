// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Prefs port shared across netstore tools.

use crate::config::{ConfigService, ConfigStore};
use crate::prefs::{IndexPrefs, INDEX_PREFS_KEY};

/// Port for loading/saving index preferences.
pub trait PrefsPort {
    /// Load index preferences (returns None if missing or unreadable).
    fn load_prefs(&self) -> Option<IndexPrefs>;
    /// Persist index preferences (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &IndexPrefs);
}

impl<S: ConfigStore> PrefsPort for ConfigService<S> {
    fn load_prefs(&self) -> Option<IndexPrefs> {
        match self.load(INDEX_PREFS_KEY) {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!(%err, "index prefs unreadable, ignoring");
                None
            }
        }
    }

    fn save_prefs(&self, prefs: &IndexPrefs) {
        if let Err(err) = self.save(INDEX_PREFS_KEY, prefs) {
            tracing::warn!(%err, "index prefs not saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::MapStore;
    use netstore_model::ResourceType;

    #[test]
    fn prefs_round_trip_through_service() {
        let service = ConfigService::new(MapStore::default());
        assert_eq!(service.load_prefs(), None);

        let prefs = IndexPrefs::preloading([ResourceType::Substation, ResourceType::Load]);
        service.save_prefs(&prefs);
        assert!(service.store().data.borrow().contains_key(INDEX_PREFS_KEY));
        assert_eq!(service.load_prefs(), Some(prefs));
    }

    #[test]
    fn failures_degrade_to_none() {
        let store = MapStore::default();
        store.fail.set(true);
        let service = ConfigService::new(store);
        service.save_prefs(&IndexPrefs::default());
        assert_eq!(service.load_prefs(), None);
        assert!(service.store().data.borrow().is_empty());
    }

    #[test]
    fn unreadable_prefs_are_ignored() {
        let service = ConfigService::new(MapStore::with(INDEX_PREFS_KEY, b"[1, 2"));
        assert_eq!(service.load_prefs(), None);
    }
}

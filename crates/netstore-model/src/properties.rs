// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Lazily allocated string property map.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// String-to-string properties attached to an identifiable.
///
/// Storage is an optional container: `None` until the first write. An absent
/// map and an allocated but empty map are both the "no properties" state and
/// are indistinguishable through every accessor, through equality, and in the
/// encoding (both are omitted).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap(Option<BTreeMap<String, String>>);

impl PropertyMap {
    /// An unallocated map.
    pub const fn new() -> Self {
        Self(None)
    }

    /// Returns `true` when no property is set.
    pub fn is_empty(&self) -> bool {
        self.0.as_ref().map_or(true, BTreeMap::is_empty)
    }

    /// Returns `true` when `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.0.as_ref().is_some_and(|map| map.contains_key(key))
    }

    /// Value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.as_ref()?.get(key).map(String::as_str)
    }

    /// Stores `value` under `key`, allocating the map on first write.
    ///
    /// Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value. Never allocates.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.as_mut()?.remove(key)
    }

    /// Sorted property names; empty when nothing is set.
    pub fn names(&self) -> BTreeSet<String> {
        self.iter().map(|(k, _)| k.to_owned()).collect()
    }

    /// Iterates `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flatten()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` if storage has been allocated (even if now empty).
    ///
    /// Exposed for tests of the lazy allocation rule; callers should use
    /// [`PropertyMap::is_empty`].
    pub fn is_allocated(&self) -> bool {
        self.0.is_some()
    }
}

impl PartialEq for PropertyMap {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for PropertyMap {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map: BTreeMap<String, String> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if map.is_empty() {
            Self(None)
        } else {
            Self(Some(map))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn first_write_allocates() {
        let mut props = PropertyMap::new();
        assert!(!props.is_allocated());
        assert_eq!(props.remove("zone"), None);
        assert!(!props.is_allocated(), "remove must not allocate");
        assert_eq!(props.insert("zone", "north"), None);
        assert!(props.is_allocated());
        assert_eq!(props.insert("zone", "south").as_deref(), Some("north"));
    }

    #[test]
    fn absent_and_emptied_maps_are_equal() {
        let mut emptied = PropertyMap::new();
        emptied.insert("k", "v");
        emptied.remove("k");
        let absent = PropertyMap::new();
        assert_eq!(emptied, absent);
        assert!(emptied.is_empty());
        assert!(emptied.names().is_empty());
        assert!(!emptied.contains("k"));
    }

    #[test]
    fn empty_object_decodes_as_no_properties() {
        let props: PropertyMap = serde_json::from_str("{}").unwrap();
        assert!(props.is_empty());
        assert_eq!(props, PropertyMap::new());
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory bundle store.
//!
//! [`MemoryStore`] keeps every bundle as its JSON wire encoding, so a value
//! read back is always a fresh decode and never aliases a live view's
//! attributes. It backs tests and single-process tooling.

use std::collections::HashMap;
use std::sync::RwLock;

use netstore_model::{AnyResource, ResourceType};
use uuid::Uuid;

use crate::store::{BundleStore, StoreError};
use crate::sync::{read_lock, write_lock};

#[derive(Default)]
struct Partition {
    order: Vec<String>,
    bundles: HashMap<String, (ResourceType, Vec<u8>)>,
}

/// In-memory [`BundleStore`] holding encoded bundles per network.
///
/// Bundles of a kind are returned in first-save order; replacing a bundle
/// keeps its first slot.
#[derive(Default)]
pub struct MemoryStore {
    networks: RwLock<HashMap<Uuid, Partition>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bundles stored for `network`.
    pub fn len(&self, network: Uuid) -> usize {
        read_lock(&self.networks)
            .get(&network)
            .map_or(0, |p| p.bundles.len())
    }

    /// Returns `true` if nothing is stored for `network`.
    pub fn is_empty(&self, network: Uuid) -> bool {
        self.len(network) == 0
    }

    /// Total encoded bytes across all networks.
    pub fn byte_count(&self) -> usize {
        read_lock(&self.networks)
            .values()
            .flat_map(|p| p.bundles.values())
            .map(|(_, bytes)| bytes.len())
            .sum()
    }

    /// Networks with at least one bundle, in no particular order.
    pub fn networks(&self) -> Vec<Uuid> {
        read_lock(&self.networks)
            .iter()
            .filter(|(_, p)| !p.bundles.is_empty())
            .map(|(uuid, _)| *uuid)
            .collect()
    }
}

impl BundleStore for MemoryStore {
    fn fetch_bundle(&self, network: Uuid, id: &str) -> Result<Option<AnyResource>, StoreError> {
        let networks = read_lock(&self.networks);
        let Some((_, bytes)) = networks.get(&network).and_then(|p| p.bundles.get(id)) else {
            return Ok(None);
        };
        Ok(Some(AnyResource::from_json_slice(bytes)?))
    }

    fn fetch_bundles_by_kind(
        &self,
        network: Uuid,
        kind: ResourceType,
    ) -> Result<Vec<AnyResource>, StoreError> {
        let networks = read_lock(&self.networks);
        let Some(partition) = networks.get(&network) else {
            return Ok(Vec::new());
        };
        partition
            .order
            .iter()
            .filter_map(|id| partition.bundles.get(id))
            .filter(|(ty, _)| *ty == kind)
            .map(|(_, bytes)| AnyResource::from_json_slice(bytes).map_err(StoreError::from))
            .collect()
    }

    fn save_bundle(&self, network: Uuid, bundle: &AnyResource) -> Result<(), StoreError> {
        let bytes = bundle.to_json_vec()?;
        let mut networks = write_lock(&self.networks);
        let partition = networks.entry(network).or_default();
        let id = bundle.id().to_owned();
        if partition
            .bundles
            .insert(id.clone(), (bundle.resource_type(), bytes))
            .is_none()
        {
            partition.order.push(id);
        }
        Ok(())
    }

    fn delete_bundle(&self, network: Uuid, id: &str) -> Result<bool, StoreError> {
        let mut networks = write_lock(&self.networks);
        let Some(partition) = networks.get_mut(&network) else {
            return Ok(false);
        };
        if partition.bundles.remove(id).is_none() {
            return Ok(false);
        }
        partition.order.retain(|k| k != id);
        Ok(true)
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Backing store port.
//!
//! The store is the single source of truth for attribute bundles. The index
//! never synthesizes attribute data; it only fetches, saves and deletes
//! bundles through this trait.

use netstore_model::{AnyResource, ModelError, ResourceType};
use thiserror::Error;
use uuid::Uuid;

/// Errors reported by a [`BundleStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A bundle could not be encoded or decoded.
    #[error("bundle codec failure: {0}")]
    Codec(#[from] ModelError),
}

/// Storage of attribute bundles, partitioned by network.
///
/// Implementations must be shareable across threads; the index holds one
/// behind an `Arc` for its whole lifetime.
///
/// # Absence Semantics
///
/// [`fetch_bundle`](BundleStore::fetch_bundle) returns `Ok(None)` for an
/// unknown id. Absence is not a store failure; the index turns it into
/// [`IndexError::NotFound`](crate::IndexError::NotFound).
pub trait BundleStore: Send + Sync {
    /// Fetches the bundle for `id` in `network`.
    fn fetch_bundle(&self, network: Uuid, id: &str) -> Result<Option<AnyResource>, StoreError>;

    /// Fetches every bundle of `kind` in `network`, in insertion order.
    fn fetch_bundles_by_kind(
        &self,
        network: Uuid,
        kind: ResourceType,
    ) -> Result<Vec<AnyResource>, StoreError>;

    /// Inserts or replaces a bundle.
    fn save_bundle(&self, network: Uuid, bundle: &AnyResource) -> Result<(), StoreError>;

    /// Deletes the bundle for `id`. Returns `false` if it did not exist.
    fn delete_bundle(&self, network: Uuid, id: &str) -> Result<bool, StoreError>;
}

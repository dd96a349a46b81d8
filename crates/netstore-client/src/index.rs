// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identity-mapped cache of equipment views for one network.
//!
//! [`ResourceIndex`] maps each id to at most one live view. The first lookup
//! of an id fetches its bundle from the [`BundleStore`] and builds the view;
//! every later lookup returns that same view until the id is invalidated.
//!
//! # Concurrency
//!
//! Lookups take the state lock for reading. Materialization builds the view
//! outside the lock, then inserts it only if no other caller got there first;
//! the loser's view is dropped, so identity holds under concurrent lookups.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, Weak};

use netstore_app_core::prefs::IndexPrefs;
use netstore_model::{AnyResource, NetworkAttributes, Resource, ResourceType};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::equipment::{Equipment, View};
use crate::error::IndexError;
use crate::store::{BundleStore, StoreError};
use crate::sync::{read_lock, write_lock};
use crate::view::{Identifiable, NetworkView, VoltageLevelView};

#[derive(Default)]
struct IndexState {
    views: HashMap<String, Equipment>,
    // Ids invalidated or removed; resolving them fails until re-created.
    removed: HashSet<String>,
    by_kind: HashMap<ResourceType, Vec<String>>,
    loaded_kinds: HashSet<ResourceType>,
    // Container id -> directly held element ids.
    children: HashMap<String, Vec<String>>,
}

impl IndexState {
    fn register(&mut self, view: Equipment) {
        let id = view.id().to_owned();
        self.by_kind
            .entry(view.resource_type())
            .or_default()
            .push(id.clone());
        for container in view.container_ids() {
            let held = self.children.entry(container).or_default();
            if !held.contains(&id) {
                held.push(id.clone());
            }
        }
        self.views.insert(id, view);
    }

    fn unregister(&mut self, id: &str) -> Option<Equipment> {
        let view = self.views.remove(id)?;
        if let Some(ids) = self.by_kind.get_mut(&view.resource_type()) {
            ids.retain(|k| k != id);
        }
        for container in view.container_ids() {
            if let Some(held) = self.children.get_mut(&container) {
                held.retain(|k| k != id);
            }
        }
        Some(view)
    }
}

/// Identity map from id to view for one network, backed by a [`BundleStore`].
///
/// Always handled through an `Arc`; views keep a `Weak` back-reference and
/// never extend the index's lifetime.
pub struct ResourceIndex {
    network_uuid: Uuid,
    store: Arc<dyn BundleStore>,
    this: Weak<ResourceIndex>,
    network: Arc<NetworkView>,
    state: RwLock<IndexState>,
}

impl ResourceIndex {
    /// Opens the index of an existing network.
    ///
    /// Kinds listed in `prefs.preload` are fetched eagerly.
    ///
    /// # Errors
    ///
    /// [`IndexError::NotFound`] if the store holds no network for
    /// `network_uuid`; store errors pass through.
    #[instrument(skip(store, prefs))]
    pub fn open(
        store: Arc<dyn BundleStore>,
        network_uuid: Uuid,
        prefs: &IndexPrefs,
    ) -> Result<Arc<Self>, IndexError> {
        let bundle = store
            .fetch_bundles_by_kind(network_uuid, ResourceType::Network)?
            .into_iter()
            .next()
            .ok_or_else(|| IndexError::not_found(network_uuid.to_string()))?;
        let network = Resource::<NetworkAttributes>::try_from(bundle).map_err(StoreError::from)?;
        let index = Self::attach(store, network_uuid, network);
        index.preload(&prefs.preload)?;
        info!(id = index.network.id(), "network index opened");
        Ok(index)
    }

    /// Saves a new network root and opens its index.
    ///
    /// # Errors
    ///
    /// [`IndexError::InvariantViolation`] if a network with the same uuid
    /// already exists; store errors pass through.
    #[instrument(skip_all, fields(id = network.id()))]
    pub fn create_network(
        store: Arc<dyn BundleStore>,
        network: Resource<NetworkAttributes>,
        prefs: &IndexPrefs,
    ) -> Result<Arc<Self>, IndexError> {
        let network_uuid = network.attributes().uuid;
        let existing = store.fetch_bundles_by_kind(network_uuid, ResourceType::Network)?;
        if !existing.is_empty() {
            return Err(IndexError::invariant(
                "create_network",
                network.id(),
                format!("network {network_uuid} already exists"),
            ));
        }
        store.save_bundle(network_uuid, &network.clone().into())?;
        let index = Self::attach(store, network_uuid, network);
        index.preload(&prefs.preload)?;
        info!(%network_uuid, "network created");
        Ok(index)
    }

    fn attach(
        store: Arc<dyn BundleStore>,
        network_uuid: Uuid,
        network: Resource<NetworkAttributes>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| {
            let view = Arc::new(NetworkView::build(this.clone(), network));
            let mut state = IndexState::default();
            state.register(Equipment::Network(Arc::clone(&view)));
            state.loaded_kinds.insert(ResourceType::Network);
            Self {
                network_uuid,
                store,
                this: this.clone(),
                network: view,
                state: RwLock::new(state),
            }
        })
    }

    /// Uuid of the indexed network.
    pub const fn network_uuid(&self) -> Uuid {
        self.network_uuid
    }

    /// Root view of the network.
    pub fn network(&self) -> Arc<NetworkView> {
        Arc::clone(&self.network)
    }

    /// Number of views currently cached.
    pub fn cached_len(&self) -> usize {
        read_lock(&self.state).views.len()
    }

    /// Returns `true` if a view for `id` is cached.
    pub fn is_cached(&self, id: &str) -> bool {
        read_lock(&self.state).views.contains_key(id)
    }

    /// Returns the view for `id`, fetching and building it on first use.
    ///
    /// # Errors
    ///
    /// [`IndexError::NotFound`] if the store has no bundle for `id` or the id
    /// was invalidated; store errors pass through.
    #[instrument(level = "debug", skip(self), fields(network = %self.network_uuid))]
    pub fn resolve(&self, id: &str) -> Result<Equipment, IndexError> {
        {
            let state = read_lock(&self.state);
            if let Some(view) = state.views.get(id) {
                return Ok(view.clone());
            }
            if state.removed.contains(id) {
                return Err(IndexError::not_found(id));
            }
        }
        let bundle = self
            .store
            .fetch_bundle(self.network_uuid, id)?
            .ok_or_else(|| IndexError::not_found(id))?;
        self.materialize(bundle)
            .ok_or_else(|| IndexError::not_found(id))
    }

    /// Typed form of [`resolve`](Self::resolve).
    ///
    /// An id of another kind is reported as [`IndexError::NotFound`].
    pub fn resolve_as<V: View>(&self, id: &str) -> Result<Arc<V>, IndexError> {
        V::downcast(self.resolve(id)?).ok_or_else(|| IndexError::not_found(id))
    }

    /// Every view of `kind`.
    ///
    /// The store is listed once per kind; later calls are served from the
    /// cache. The returned sequence can be iterated any number of times.
    pub fn resolve_by_kind(&self, kind: ResourceType) -> Result<ViewSeq, IndexError> {
        self.load_kind(kind)?;
        let ids = read_lock(&self.state)
            .by_kind
            .get(&kind)
            .cloned()
            .unwrap_or_default();
        Ok(ViewSeq {
            index: self.this.clone(),
            kind,
            ids: ids.into(),
        })
    }

    /// Every view of type `V`, collected.
    pub fn views<V: View>(&self) -> Result<Vec<Arc<V>>, IndexError> {
        Ok(self.resolve_by_kind(V::KIND)?.typed::<V>().collect())
    }

    /// Views of type `V` directly held by `container_id`.
    ///
    /// Voltage levels are held by substations; connectables by the voltage
    /// level of each of their terminals.
    pub fn contained<V: View>(&self, container_id: &str) -> Result<Vec<Arc<V>>, IndexError> {
        self.load_kind(V::KIND)?;
        let state = read_lock(&self.state);
        Ok(state
            .children
            .get(container_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.views.get(id))
            .filter_map(V::downcast_ref)
            .cloned()
            .collect())
    }

    /// Connectables of `kind` with a terminal in voltage level `vl_id`.
    pub fn voltage_level_connectables(
        &self,
        vl_id: &str,
        kind: ResourceType,
    ) -> Result<Vec<Equipment>, IndexError> {
        if !kind.is_connectable() {
            return Err(IndexError::invariant(
                "voltage_level_connectables",
                vl_id,
                format!("{kind} is not connectable"),
            ));
        }
        self.load_kind(kind)?;
        let state = read_lock(&self.state);
        Ok(state
            .children
            .get(vl_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.views.get(id))
            .filter(|view| view.resource_type() == kind)
            .cloned()
            .collect())
    }

    /// Voltage levels of substation `substation_id`.
    pub fn substation_voltage_levels(
        &self,
        substation_id: &str,
    ) -> Result<Vec<Arc<VoltageLevelView>>, IndexError> {
        self.contained(substation_id)
    }

    /// Fetches every kind in `kinds` ahead of use.
    pub fn preload(&self, kinds: &[ResourceType]) -> Result<(), IndexError> {
        for kind in kinds {
            self.load_kind(*kind)?;
        }
        Ok(())
    }

    /// Saves a new bundle and returns its view.
    ///
    /// # Errors
    ///
    /// [`IndexError::InvariantViolation`] if the id is already in use or the
    /// bundle is a network; store errors pass through.
    #[instrument(skip_all, fields(network = %self.network_uuid))]
    pub fn create(&self, bundle: impl Into<AnyResource>) -> Result<Equipment, IndexError> {
        let bundle = bundle.into();
        let id = bundle.id().to_owned();
        if bundle.resource_type() == ResourceType::Network {
            return Err(IndexError::invariant(
                "create",
                id,
                "a network cannot be created inside another network",
            ));
        }
        let (cached, removed) = {
            let state = read_lock(&self.state);
            (state.views.contains_key(&id), state.removed.contains(&id))
        };
        if cached || (!removed && self.store.fetch_bundle(self.network_uuid, &id)?.is_some()) {
            warn!(id, "create rejected, id already in use");
            return Err(IndexError::invariant(
                "create",
                id,
                "an identifiable with this id already exists",
            ));
        }
        self.store.save_bundle(self.network_uuid, &bundle)?;
        let kind = bundle.resource_type();
        let view = Equipment::build(&self.this, bundle);
        let mut state = write_lock(&self.state);
        state.removed.remove(&id);
        if let Some(existing) = state.views.get(&id) {
            return Ok(existing.clone());
        }
        state.register(view.clone());
        info!(id, %kind, "identifiable created");
        Ok(view)
    }

    /// Typed form of [`create`](Self::create).
    pub fn create_as<V: View>(&self, bundle: Resource<V::Attributes>) -> Result<Arc<V>, IndexError>
    where
        Resource<V::Attributes>: Into<AnyResource>,
    {
        let id = bundle.id().to_owned();
        V::downcast(self.create(bundle)?)
            .ok_or_else(|| IndexError::invariant("create", id, "view kind does not match bundle"))
    }

    /// Drops the cached view for `id`.
    ///
    /// Until `id` is created again, resolving it fails with
    /// [`IndexError::NotFound`]. Views already handed out stay usable but are
    /// detached: their writes are no longer flushed. The network root cannot
    /// be invalidated. Returns `true` if a view was cached.
    #[instrument(level = "debug", skip(self), fields(network = %self.network_uuid))]
    pub fn invalidate(&self, id: &str) -> bool {
        if id == self.network.id() {
            warn!(id, "network root cannot be invalidated");
            return false;
        }
        let mut state = write_lock(&self.state);
        state.removed.insert(id.to_owned());
        state.unregister(id).is_some()
    }

    /// Deletes `id` from the store and invalidates its view.
    ///
    /// # Errors
    ///
    /// [`IndexError::NotFound`] if `id` is neither cached nor stored,
    /// [`IndexError::InvariantViolation`] for the network root; store errors
    /// pass through.
    #[instrument(skip(self), fields(network = %self.network_uuid))]
    pub fn remove(&self, id: &str) -> Result<(), IndexError> {
        if id == self.network.id() {
            return Err(IndexError::invariant(
                "remove",
                id,
                "the network root cannot be removed",
            ));
        }
        let deleted = self.store.delete_bundle(self.network_uuid, id)?;
        let cached = self.invalidate(id);
        if !deleted && !cached {
            return Err(IndexError::not_found(id));
        }
        info!(id, "identifiable removed");
        Ok(())
    }

    /// Writes every cached bundle back to the store.
    ///
    /// Returns the number of bundles saved. Stops at the first store error.
    #[instrument(skip(self), fields(network = %self.network_uuid))]
    pub fn flush(&self) -> Result<usize, IndexError> {
        let views: Vec<Equipment> = {
            let state = read_lock(&self.state);
            ResourceType::ALL
                .iter()
                .filter_map(|kind| state.by_kind.get(kind))
                .flatten()
                .filter_map(|id| state.views.get(id).cloned())
                .collect()
        };
        for view in &views {
            self.store.save_bundle(self.network_uuid, &view.snapshot())?;
        }
        info!(count = views.len(), "index flushed");
        Ok(views.len())
    }

    fn materialize(&self, bundle: AnyResource) -> Option<Equipment> {
        let id = bundle.id().to_owned();
        let candidate = Equipment::build(&self.this, bundle);
        let mut state = write_lock(&self.state);
        if let Some(existing) = state.views.get(&id) {
            return Some(existing.clone());
        }
        if state.removed.contains(&id) {
            return None;
        }
        debug!(id, kind = %candidate.resource_type(), "view built");
        state.register(candidate.clone());
        Some(candidate)
    }

    fn load_kind(&self, kind: ResourceType) -> Result<(), IndexError> {
        if read_lock(&self.state).loaded_kinds.contains(&kind) {
            return Ok(());
        }
        let bundles = self.store.fetch_bundles_by_kind(self.network_uuid, kind)?;
        let count = bundles.len();
        for bundle in bundles {
            if !self.is_cached(bundle.id()) {
                self.materialize(bundle);
            }
        }
        write_lock(&self.state).loaded_kinds.insert(kind);
        debug!(%kind, count, "kind loaded");
        Ok(())
    }

    fn cached(&self, id: &str) -> Option<Equipment> {
        read_lock(&self.state).views.get(id).cloned()
    }
}

impl std::fmt::Debug for ResourceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceIndex")
            .field("network_uuid", &self.network_uuid)
            .field("cached", &self.cached_len())
            .finish_non_exhaustive()
    }
}

pub(crate) fn upgrade(index: &Weak<ResourceIndex>, id: &str) -> Result<Arc<ResourceIndex>, IndexError> {
    index
        .upgrade()
        .ok_or_else(|| IndexError::invariant("index", id, "owning network index was dropped"))
}

/// Views of one kind, in order of discovery.
///
/// Ids resolved before the kind was listed come first, then the rest in
/// store listing order.
///
/// The sequence holds ids and resolves each against the cache as it is
/// iterated. Ids invalidated in the meantime are skipped. Iterating twice
/// yields the same views.
#[derive(Clone)]
pub struct ViewSeq {
    index: Weak<ResourceIndex>,
    kind: ResourceType,
    ids: Arc<[String]>,
}

impl ViewSeq {
    /// Kind of the listed views.
    pub const fn kind(&self) -> ResourceType {
        self.kind
    }

    /// Number of ids in the sequence.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the sequence lists no ids.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Listed ids.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Iterates the views.
    pub fn iter(&self) -> impl Iterator<Item = Equipment> + '_ {
        let index = self.index.upgrade();
        self.ids
            .iter()
            .filter_map(move |id| index.as_ref()?.cached(id))
    }

    /// Iterates the views as `V`.
    pub fn typed<V: View>(&self) -> impl Iterator<Item = Arc<V>> + '_ {
        self.iter().filter_map(V::downcast)
    }
}

impl std::fmt::Debug for ViewSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewSeq")
            .field("kind", &self.kind)
            .field("ids", &self.ids)
            .finish()
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed views over cached attribute bundles.
//!
//! A view is a thin handle over the bundle it was built from and a
//! non-owning back-reference to its [`ResourceIndex`]. Every getter reads the
//! bundle and every setter writes it in place. The only state a view keeps
//! besides the bundle is its terminal adapters, built once at construction;
//! they share the bundle and read through to it. Writes reach the store on
//! the next [`ResourceIndex::flush`].

mod busbar_section;
mod injection;
mod line;
mod network;
mod substation;
mod switch;
mod tap_changer;
mod transformer;
mod voltage_level;

pub use busbar_section::BusbarSectionView;
pub use injection::{GeneratorView, LoadView};
pub use line::LineView;
pub use network::NetworkView;
pub use substation::SubstationView;
pub use switch::SwitchView;
pub use tap_changer::{PhaseTapChanger, PhaseTapChangerStep, RatioTapChanger, RatioTapChangerStep};
pub use transformer::TwoWindingsTransformerView;
pub use voltage_level::VoltageLevelView;

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, Weak};

use netstore_model::{
    BranchAttributes, IdentifiableAttributes, InjectionAttributes, Resource, ResourceType, Side,
};

use crate::error::IndexError;
use crate::extension::{
    ConnectablePosition, Extension, ExtensionData, ExtensionKind, Feeder, SlotCodec,
};
use crate::index::{upgrade, ResourceIndex};
use crate::sync::{read_lock, write_lock};
use crate::terminal::Terminal;

/// Shared state behind every view: identity, owning index and bundle.
///
/// The bundle sits behind an `Arc` so terminal adapters can share it with
/// the view that created them.
#[derive(Debug)]
pub struct ViewCore<A> {
    id: String,
    index: Weak<ResourceIndex>,
    resource: Arc<RwLock<Resource<A>>>,
}

impl<A: IdentifiableAttributes> ViewCore<A> {
    pub(crate) fn new(index: Weak<ResourceIndex>, resource: Resource<A>) -> Self {
        Self {
            id: resource.id().to_owned(),
            index,
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Identifier of the viewed element.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Runs `f` against the current attributes.
    pub fn read<R>(&self, f: impl FnOnce(&A) -> R) -> R {
        f(read_lock(&self.resource).attributes())
    }

    /// Runs `f` against the attributes with write access.
    ///
    /// The change is visible to every holder of this view at once.
    pub fn write<R>(&self, f: impl FnOnce(&mut A) -> R) -> R {
        f(write_lock(&self.resource).attributes_mut())
    }

    /// Copy of the bundle as it stands now.
    pub fn snapshot(&self) -> Resource<A> {
        read_lock(&self.resource).clone()
    }

    /// Owning index.
    ///
    /// Fails with [`IndexError::InvariantViolation`] once the index has been
    /// dropped; a view never keeps its index alive.
    pub fn index(&self) -> Result<Arc<ResourceIndex>, IndexError> {
        upgrade(&self.index, &self.id)
    }

    pub(crate) fn shared(&self) -> Arc<RwLock<Resource<A>>> {
        Arc::clone(&self.resource)
    }

    pub(crate) fn weak_index(&self) -> Weak<ResourceIndex> {
        self.index.clone()
    }
}

/// A view backed by one bundle in a [`ViewCore`].
pub trait BundleView: Send + Sync {
    /// Attribute type of the bundle.
    type Attributes: IdentifiableAttributes;

    /// Shared view state.
    fn core(&self) -> &ViewCore<Self::Attributes>;
}

/// Common surface of every element: identity, name and properties.
pub trait Identifiable: Send + Sync {
    /// Identifier, unique within the network.
    fn id(&self) -> &str;

    /// Element kind.
    fn resource_type(&self) -> ResourceType;

    /// Optional human readable name.
    fn name(&self) -> Option<String>;

    /// Name if set, id otherwise.
    fn name_or_id(&self) -> String {
        self.name().unwrap_or_else(|| self.id().to_owned())
    }

    /// Returns `true` if at least one property is set.
    fn has_properties(&self) -> bool;

    /// Returns `true` if `key` is set.
    fn has_property(&self, key: &str) -> bool;

    /// Value of `key`, if set.
    fn property(&self, key: &str) -> Option<String>;

    /// Value of `key`, or `default` when unset.
    fn property_or(&self, key: &str, default: &str) -> String {
        self.property(key).unwrap_or_else(|| default.to_owned())
    }

    /// Sets `key` to `value`, returning the previous value.
    fn set_property(&self, key: &str, value: &str) -> Option<String>;

    /// Unsets `key`, returning the removed value.
    fn remove_property(&self, key: &str) -> Option<String>;

    /// Every property name, sorted.
    fn property_names(&self) -> BTreeSet<String>;

    /// Network containing this element.
    fn network(&self) -> Result<Arc<NetworkView>, IndexError>;
}

impl<V: BundleView> Identifiable for V {
    fn id(&self) -> &str {
        self.core().id()
    }

    fn resource_type(&self) -> ResourceType {
        V::Attributes::TYPE
    }

    fn name(&self) -> Option<String> {
        self.core().read(|a| a.name().map(str::to_owned))
    }

    fn has_properties(&self) -> bool {
        self.core().read(|a| !a.properties().is_empty())
    }

    fn has_property(&self, key: &str) -> bool {
        self.core().read(|a| a.properties().contains(key))
    }

    fn property(&self, key: &str) -> Option<String> {
        self.core().read(|a| a.properties().get(key).map(str::to_owned))
    }

    fn set_property(&self, key: &str, value: &str) -> Option<String> {
        self.core().write(|a| a.properties_mut().insert(key, value))
    }

    fn remove_property(&self, key: &str) -> Option<String> {
        self.core().write(|a| a.properties_mut().remove(key))
    }

    fn property_names(&self) -> BTreeSet<String> {
        self.core().read(|a| a.properties().names())
    }

    fn network(&self) -> Result<Arc<NetworkView>, IndexError> {
        Ok(self.core().index()?.network())
    }
}

/// Extension surface.
///
/// The defaults describe an element with no extension slot: adding is
/// ignored and lookups return `None`. Removal and enumeration are not
/// supported for any element.
pub trait Extendable: Identifiable {
    /// Writes `data` into its slot. Kinds without a slot on this element are
    /// ignored.
    fn add_extension(&self, data: ExtensionData) {
        ignored(self.id(), &data);
    }

    /// Rebuilds the extension of `kind` from its slot.
    fn extension(&self, kind: ExtensionKind) -> Option<Extension> {
        let _ = kind;
        None
    }

    /// Same as [`extension`](Self::extension), keyed by registry name.
    fn extension_by_name(&self, name: &str) -> Option<Extension> {
        ExtensionKind::from_name(name).and_then(|kind| self.extension(kind))
    }

    /// Not supported yet.
    fn remove_extension(&self, kind: ExtensionKind) -> Result<bool, IndexError> {
        let _ = kind;
        Err(IndexError::not_yet_supported("remove_extension", self.id()))
    }

    /// Not supported yet.
    fn extensions(&self) -> Result<Vec<Extension>, IndexError> {
        Err(IndexError::not_yet_supported("extensions", self.id()))
    }
}

/// Equipment attached to the grid through terminals.
pub trait Connectable: Extendable {
    /// Terminals, ordered by side.
    fn terminals(&self) -> Vec<&Terminal>;

    /// Removes the equipment from the network and from the store.
    fn remove(&self) -> Result<(), IndexError> {
        self.network()?.index()?.remove(self.id())
    }
}

fn ignored(id: &str, data: &ExtensionData) {
    tracing::debug!(id, kind = %data.kind(), "no slot for extension, ignored");
}

pub(crate) fn single_position<A: InjectionAttributes>(
    core: &ViewCore<A>,
    kind: ExtensionKind,
) -> Option<Extension> {
    if kind != ExtensionKind::ConnectablePosition {
        return None;
    }
    core.read(|a| ConnectablePosition::from_single_slot(a.position()))
        .map(|position| Extension::attach(core.id(), position))
}

pub(crate) fn add_single_position<A: InjectionAttributes>(core: &ViewCore<A>, data: ExtensionData) {
    match data {
        ExtensionData::ConnectablePosition(position) => {
            let slot = position.feeder().map(Feeder::flatten);
            core.write(|a| a.set_position(slot));
        }
        other => ignored(core.id(), &other),
    }
}

pub(crate) fn sided_position<A: BranchAttributes>(
    core: &ViewCore<A>,
    kind: ExtensionKind,
) -> Option<Extension> {
    if kind != ExtensionKind::ConnectablePosition {
        return None;
    }
    core.read(|a| ConnectablePosition::from_sided_slots(a.position(Side::One), a.position(Side::Two)))
        .map(|position| Extension::attach(core.id(), position))
}

pub(crate) fn add_sided_position<A: BranchAttributes>(core: &ViewCore<A>, data: ExtensionData) {
    match data {
        ExtensionData::ConnectablePosition(position) => {
            let slot1 = position.feeder1().map(Feeder::flatten);
            let slot2 = position.feeder2().map(Feeder::flatten);
            core.write(|a| {
                a.set_position(Side::One, slot1);
                a.set_position(Side::Two, slot2);
            });
        }
        other => ignored(core.id(), &other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use netstore_model::SubstationAttributes;

    #[test]
    fn writes_are_visible_through_every_reader() {
        let core = ViewCore::new(
            Weak::new(),
            Resource::new("S1", SubstationAttributes::default()),
        );
        let shared = core.shared();
        core.write(|a| a.tso = Some("RTE".into()));
        assert_eq!(read_lock(&shared).attributes().tso.as_deref(), Some("RTE"));
        assert_eq!(core.snapshot().attributes().tso.as_deref(), Some("RTE"));
    }

    #[test]
    fn dropped_index_is_an_invariant_violation() {
        let core = ViewCore::new(
            Weak::new(),
            Resource::new("S1", SubstationAttributes::default()),
        );
        assert!(core.index().unwrap_err().is_invariant_violation());
    }
}

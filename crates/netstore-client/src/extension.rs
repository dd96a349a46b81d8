// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Extensions reconstructed from attribute slots.
//!
//! Extensions are not stored as resources. Each supported kind flattens into
//! an optional slot of its owner's attributes on write and is rebuilt from
//! that slot on read. The set of kinds is closed: a kind without a slot on
//! the owning equipment is simply absent.

use std::fmt;

use netstore_model::{BusbarSectionPositionAttributes, ConnectablePositionAttributes, Direction};

/// Supported extension kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtensionKind {
    /// Diagram position of a busbar section.
    BusbarSectionPosition,
    /// Feeder position of a connectable.
    ConnectablePosition,
}

impl ExtensionKind {
    /// Every supported kind.
    pub const ALL: [Self; 2] = [Self::BusbarSectionPosition, Self::ConnectablePosition];

    /// Registry name of the kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BusbarSectionPosition => "busbarSectionPosition",
            Self::ConnectablePosition => "position",
        }
    }

    /// Looks a kind up by registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conversion between an extension value and its attribute slot.
///
/// `reconstruct(&flatten(v)) == v` must hold for every value.
pub trait SlotCodec: Sized {
    /// Slot record stored in the owner's attributes.
    type Slot;

    /// Writes the value into its slot record.
    fn flatten(&self) -> Self::Slot;

    /// Rebuilds the value from a populated slot.
    fn reconstruct(slot: &Self::Slot) -> Self;
}

/// Busbar rank and section rank of a busbar section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusbarSectionPosition {
    busbar_index: i32,
    section_index: i32,
}

impl BusbarSectionPosition {
    /// New position.
    pub const fn new(busbar_index: i32, section_index: i32) -> Self {
        Self {
            busbar_index,
            section_index,
        }
    }

    /// Busbar rank.
    pub const fn busbar_index(&self) -> i32 {
        self.busbar_index
    }

    /// Section rank along the busbar.
    pub const fn section_index(&self) -> i32 {
        self.section_index
    }
}

impl SlotCodec for BusbarSectionPosition {
    type Slot = BusbarSectionPositionAttributes;

    fn flatten(&self) -> Self::Slot {
        BusbarSectionPositionAttributes {
            busbar_index: self.busbar_index,
            section_index: self.section_index,
        }
    }

    fn reconstruct(slot: &Self::Slot) -> Self {
        Self::new(slot.busbar_index, slot.section_index)
    }
}

/// Position of one feeder (one terminal side) in a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Feeder {
    name: String,
    order: Option<i32>,
    direction: Direction,
}

impl Feeder {
    /// New feeder with no order and an undefined direction.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: None,
            direction: Direction::Undefined,
        }
    }

    /// Sets the feeder order.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets the feeder direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Feeder label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Feeder order, if any.
    pub const fn order(&self) -> Option<i32> {
        self.order
    }

    /// Drawing direction.
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

impl SlotCodec for Feeder {
    type Slot = ConnectablePositionAttributes;

    fn flatten(&self) -> Self::Slot {
        ConnectablePositionAttributes {
            label: self.name.clone(),
            order: self.order,
            direction: self.direction,
        }
    }

    fn reconstruct(slot: &Self::Slot) -> Self {
        Self {
            name: slot.label.clone(),
            order: slot.order,
            direction: slot.direction,
        }
    }
}

/// Feeder positions of a connectable.
///
/// Injections use [`feeder`](Self::feeder); two-terminal equipment uses
/// [`feeder1`](Self::feeder1) and [`feeder2`](Self::feeder2). Feeders that
/// have no slot on the owner are dropped on write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConnectablePosition {
    feeder: Option<Feeder>,
    feeder1: Option<Feeder>,
    feeder2: Option<Feeder>,
}

impl ConnectablePosition {
    /// Position of a single-terminal connectable.
    pub fn single(feeder: Feeder) -> Self {
        Self {
            feeder: Some(feeder),
            ..Self::default()
        }
    }

    /// Position of a two-terminal connectable; either side may be absent.
    pub fn sided(feeder1: Option<Feeder>, feeder2: Option<Feeder>) -> Self {
        Self {
            feeder: None,
            feeder1,
            feeder2,
        }
    }

    /// Feeder of a single-terminal connectable.
    pub fn feeder(&self) -> Option<&Feeder> {
        self.feeder.as_ref()
    }

    /// Feeder of side one.
    pub fn feeder1(&self) -> Option<&Feeder> {
        self.feeder1.as_ref()
    }

    /// Feeder of side two.
    pub fn feeder2(&self) -> Option<&Feeder> {
        self.feeder2.as_ref()
    }

    pub(crate) fn from_single_slot(slot: Option<&ConnectablePositionAttributes>) -> Option<Self> {
        slot.map(|s| Self::single(Feeder::reconstruct(s)))
    }

    pub(crate) fn from_sided_slots(
        slot1: Option<&ConnectablePositionAttributes>,
        slot2: Option<&ConnectablePositionAttributes>,
    ) -> Option<Self> {
        if slot1.is_none() && slot2.is_none() {
            return None;
        }
        Some(Self::sided(
            slot1.map(Feeder::reconstruct),
            slot2.map(Feeder::reconstruct),
        ))
    }
}

/// Extension payload, one variant per [`ExtensionKind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExtensionData {
    /// See [`BusbarSectionPosition`].
    BusbarSectionPosition(BusbarSectionPosition),
    /// See [`ConnectablePosition`].
    ConnectablePosition(ConnectablePosition),
}

impl ExtensionData {
    /// Kind of this payload.
    pub const fn kind(&self) -> ExtensionKind {
        match self {
            Self::BusbarSectionPosition(_) => ExtensionKind::BusbarSectionPosition,
            Self::ConnectablePosition(_) => ExtensionKind::ConnectablePosition,
        }
    }
}

impl From<BusbarSectionPosition> for ExtensionData {
    fn from(value: BusbarSectionPosition) -> Self {
        Self::BusbarSectionPosition(value)
    }
}

impl From<ConnectablePosition> for ExtensionData {
    fn from(value: ConnectablePosition) -> Self {
        Self::ConnectablePosition(value)
    }
}

/// A reconstructed extension attached to its owning equipment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Extension {
    extendable_id: String,
    data: ExtensionData,
}

impl Extension {
    pub(crate) fn attach(extendable_id: &str, data: impl Into<ExtensionData>) -> Self {
        Self {
            extendable_id: extendable_id.to_owned(),
            data: data.into(),
        }
    }

    /// Id of the owning equipment.
    pub fn extendable_id(&self) -> &str {
        &self.extendable_id
    }

    /// Kind of the extension.
    pub const fn kind(&self) -> ExtensionKind {
        self.data.kind()
    }

    /// Name of the extension kind.
    pub const fn name(&self) -> &'static str {
        self.data.kind().name()
    }

    /// Payload.
    pub fn data(&self) -> &ExtensionData {
        &self.data
    }

    /// Consumes the extension, returning its payload.
    pub fn into_data(self) -> ExtensionData {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_to_kinds() {
        for kind in ExtensionKind::ALL {
            assert_eq!(ExtensionKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ExtensionKind::from_name("activePowerControl"), None);
    }

    #[test]
    fn feeder_flatten_keeps_every_field() {
        let feeder = Feeder::new("cbl")
            .with_order(3)
            .with_direction(Direction::Bottom);
        let slot = feeder.flatten();
        assert_eq!(slot.label, "cbl");
        assert_eq!(slot.order, Some(3));
        assert_eq!(Feeder::reconstruct(&slot), feeder);
    }

    #[test]
    fn sided_position_absent_only_when_both_slots_empty() {
        assert_eq!(ConnectablePosition::from_sided_slots(None, None), None);
        let slot = Feeder::new("f2").flatten();
        let pos = ConnectablePosition::from_sided_slots(None, Some(&slot));
        assert!(pos.as_ref().is_some_and(|p| p.feeder1().is_none()));
        assert_eq!(pos.and_then(|p| p.feeder2().cloned()), Some(Feeder::new("f2")));
    }
}

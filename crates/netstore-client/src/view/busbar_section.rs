// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Busbar section view.

use std::sync::{Arc, Weak};

use netstore_model::{BusbarSectionAttributes, Resource};

use crate::equipment::Contained;
use crate::error::IndexError;
use crate::extension::{BusbarSectionPosition, Extension, ExtensionData, ExtensionKind, SlotCodec};
use crate::index::ResourceIndex;
use crate::terminal::{BusbarSectionTerminal, Terminal};
use crate::view::{ignored, BundleView, Connectable, Extendable, Identifiable, ViewCore, VoltageLevelView};

/// A busbar section of a node-breaker voltage level.
///
/// Its terminal has a node but no flows: asking it for `p`, `q` or a feeder
/// position is an invariant violation.
#[derive(Debug)]
pub struct BusbarSectionView {
    core: ViewCore<BusbarSectionAttributes>,
    terminal: Terminal,
}

impl BusbarSectionView {
    pub(crate) fn build(index: Weak<ResourceIndex>, resource: Resource<BusbarSectionAttributes>) -> Self {
        let core = ViewCore::new(index, resource);
        let terminal = Terminal::new(
            core.id(),
            None,
            core.weak_index(),
            Box::new(BusbarSectionTerminal::new(core.shared())),
        );
        Self { core, terminal }
    }

    /// The section's terminal.
    pub const fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    /// Node number.
    pub fn node(&self) -> i32 {
        self.core.read(|a| a.node)
    }

    /// Voltage level holding the section.
    pub fn voltage_level(&self) -> Result<Arc<VoltageLevelView>, IndexError> {
        self.terminal.voltage_level()
    }

    /// Voltage magnitude of the bus the section belongs to.
    ///
    /// Bus views are not computed yet.
    pub fn v(&self) -> Result<f64, IndexError> {
        Err(IndexError::not_yet_supported("v", self.id()))
    }

    /// Voltage angle of the bus the section belongs to.
    ///
    /// Bus views are not computed yet.
    pub fn angle(&self) -> Result<f64, IndexError> {
        Err(IndexError::not_yet_supported("angle", self.id()))
    }
}

impl BundleView for BusbarSectionView {
    type Attributes = BusbarSectionAttributes;

    fn core(&self) -> &ViewCore<BusbarSectionAttributes> {
        &self.core
    }
}

impl Contained for BusbarSectionView {
    fn container_ids(&self) -> Vec<String> {
        vec![self.core.read(|a| a.voltage_level_id.clone())]
    }
}

impl Extendable for BusbarSectionView {
    fn add_extension(&self, data: ExtensionData) {
        match data {
            ExtensionData::BusbarSectionPosition(position) => {
                self.core.write(|a| a.position = Some(position.flatten()));
            }
            other => ignored(self.id(), &other),
        }
    }

    fn extension(&self, kind: ExtensionKind) -> Option<Extension> {
        if kind != ExtensionKind::BusbarSectionPosition {
            return None;
        }
        self.core
            .read(|a| a.position.as_ref().map(BusbarSectionPosition::reconstruct))
            .map(|position| Extension::attach(self.id(), position))
    }
}

impl Connectable for BusbarSectionView {
    fn terminals(&self) -> Vec<&Terminal> {
        vec![&self.terminal]
    }
}

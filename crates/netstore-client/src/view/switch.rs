// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Switch view.

use std::sync::{Arc, Weak};

use netstore_model::{Resource, SwitchAttributes, SwitchKind};

use crate::equipment::Contained;
use crate::error::IndexError;
use crate::index::ResourceIndex;
use crate::view::{BundleView, Extendable, Identifiable, ViewCore, VoltageLevelView};

/// A switch between two nodes or two buses of one voltage level.
///
/// Node accessors fail on bus-breaker switches and bus accessors on
/// node-breaker ones, with [`IndexError::Unsupported`].
#[derive(Debug)]
pub struct SwitchView {
    core: ViewCore<SwitchAttributes>,
}

impl SwitchView {
    pub(crate) fn build(index: Weak<ResourceIndex>, resource: Resource<SwitchAttributes>) -> Self {
        Self {
            core: ViewCore::new(index, resource),
        }
    }

    /// Switch kind.
    pub fn kind(&self) -> SwitchKind {
        self.core.read(|a| a.kind)
    }

    /// Id of the voltage level holding the switch.
    pub fn voltage_level_id(&self) -> String {
        self.core.read(|a| a.voltage_level_id.clone())
    }

    /// Voltage level holding the switch.
    pub fn voltage_level(&self) -> Result<Arc<VoltageLevelView>, IndexError> {
        self.core.index()?.resolve_as(&self.voltage_level_id())
    }

    /// Returns `true` if the switch is open.
    pub fn is_open(&self) -> bool {
        self.core.read(|a| a.open)
    }

    /// Opens or closes the switch.
    pub fn set_open(&self, open: bool) {
        self.core.write(|a| a.open = open);
    }

    /// Returns `true` if the switch is kept in the bus-breaker projection.
    pub fn is_retained(&self) -> bool {
        self.core.read(|a| a.retained)
    }

    /// Sets whether the switch is kept in the bus-breaker projection.
    pub fn set_retained(&self, retained: bool) {
        self.core.write(|a| a.retained = retained);
    }

    /// Returns `true` for modelling artefacts.
    pub fn is_fictitious(&self) -> bool {
        self.core.read(|a| a.fictitious)
    }

    /// Marks the switch as a modelling artefact.
    pub fn set_fictitious(&self, fictitious: bool) {
        self.core.write(|a| a.fictitious = fictitious);
    }

    /// First node. Node-breaker only.
    pub fn node1(&self) -> Result<i32, IndexError> {
        self.core
            .read(|a| a.node1)
            .ok_or_else(|| IndexError::not_applicable("node1", self.id()))
    }

    /// Second node. Node-breaker only.
    pub fn node2(&self) -> Result<i32, IndexError> {
        self.core
            .read(|a| a.node2)
            .ok_or_else(|| IndexError::not_applicable("node2", self.id()))
    }

    /// First bus. Bus-breaker only.
    pub fn bus1(&self) -> Result<String, IndexError> {
        self.core
            .read(|a| a.bus1.clone())
            .ok_or_else(|| IndexError::not_applicable("bus1", self.id()))
    }

    /// Second bus. Bus-breaker only.
    pub fn bus2(&self) -> Result<String, IndexError> {
        self.core
            .read(|a| a.bus2.clone())
            .ok_or_else(|| IndexError::not_applicable("bus2", self.id()))
    }
}

impl BundleView for SwitchView {
    type Attributes = SwitchAttributes;

    fn core(&self) -> &ViewCore<SwitchAttributes> {
        &self.core
    }
}

impl Contained for SwitchView {
    fn container_ids(&self) -> Vec<String> {
        vec![self.voltage_level_id()]
    }
}

impl Extendable for SwitchView {}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Voltage level view.

use std::sync::{Arc, Weak};

use netstore_model::{
    BusbarSectionAttributes, GeneratorAttributes, LoadAttributes, Resource, SwitchAttributes,
    TopologyKind, VoltageLevelAttributes,
};

use crate::equipment::{Contained, Equipment};
use crate::error::IndexError;
use crate::index::ResourceIndex;
use crate::view::{
    BundleView, BusbarSectionView, Extendable, GeneratorView, LineView, LoadView, SubstationView,
    SwitchView, TwoWindingsTransformerView, ViewCore,
};

/// A voltage level and the equipment attached to it.
#[derive(Debug)]
pub struct VoltageLevelView {
    core: ViewCore<VoltageLevelAttributes>,
}

impl VoltageLevelView {
    pub(crate) fn build(index: Weak<ResourceIndex>, resource: Resource<VoltageLevelAttributes>) -> Self {
        Self {
            core: ViewCore::new(index, resource),
        }
    }

    /// Id of the owning substation.
    pub fn substation_id(&self) -> String {
        self.core.read(|a| a.substation_id.clone())
    }

    /// Owning substation.
    pub fn substation(&self) -> Result<Arc<SubstationView>, IndexError> {
        self.core.index()?.resolve_as(&self.substation_id())
    }

    /// Nominal voltage in kV.
    pub fn nominal_v(&self) -> f64 {
        self.core.read(|a| a.nominal_v)
    }

    /// Sets the nominal voltage.
    pub fn set_nominal_v(&self, nominal_v: f64) {
        self.core.write(|a| a.nominal_v = nominal_v);
    }

    /// Low voltage limit in kV (NaN when unset).
    pub fn low_voltage_limit(&self) -> f64 {
        self.core.read(|a| a.low_voltage_limit)
    }

    /// Sets the low voltage limit.
    pub fn set_low_voltage_limit(&self, limit: f64) {
        self.core.write(|a| a.low_voltage_limit = limit);
    }

    /// High voltage limit in kV (NaN when unset).
    pub fn high_voltage_limit(&self) -> f64 {
        self.core.read(|a| a.high_voltage_limit)
    }

    /// Sets the high voltage limit.
    pub fn set_high_voltage_limit(&self, limit: f64) {
        self.core.write(|a| a.high_voltage_limit = limit);
    }

    /// Connection mode of the contained equipment.
    pub fn topology_kind(&self) -> TopologyKind {
        self.core.read(|a| a.topology_kind)
    }

    /// Busbar sections of this voltage level.
    pub fn busbar_sections(&self) -> Result<Vec<Arc<BusbarSectionView>>, IndexError> {
        self.core.index()?.contained(self.core.id())
    }

    /// Loads of this voltage level.
    pub fn loads(&self) -> Result<Vec<Arc<LoadView>>, IndexError> {
        self.core.index()?.contained(self.core.id())
    }

    /// Generators of this voltage level.
    pub fn generators(&self) -> Result<Vec<Arc<GeneratorView>>, IndexError> {
        self.core.index()?.contained(self.core.id())
    }

    /// Switches of this voltage level.
    pub fn switches(&self) -> Result<Vec<Arc<SwitchView>>, IndexError> {
        self.core.index()?.contained(self.core.id())
    }

    /// Lines with at least one side in this voltage level.
    pub fn lines(&self) -> Result<Vec<Arc<LineView>>, IndexError> {
        self.core.index()?.contained(self.core.id())
    }

    /// Transformers with at least one side in this voltage level.
    pub fn two_windings_transformers(
        &self,
    ) -> Result<Vec<Arc<TwoWindingsTransformerView>>, IndexError> {
        self.core.index()?.contained(self.core.id())
    }

    /// Every connectable of this voltage level, grouped by kind.
    pub fn connectables(&self) -> Result<Vec<Equipment>, IndexError> {
        let mut all: Vec<Equipment> = Vec::new();
        all.extend(self.busbar_sections()?.into_iter().map(Equipment::from));
        all.extend(self.loads()?.into_iter().map(Equipment::from));
        all.extend(self.generators()?.into_iter().map(Equipment::from));
        all.extend(self.switches()?.into_iter().map(Equipment::from));
        all.extend(self.lines()?.into_iter().map(Equipment::from));
        all.extend(
            self.two_windings_transformers()?
                .into_iter()
                .map(Equipment::from),
        );
        Ok(all)
    }

    /// Creates a busbar section on `node`. Node-breaker only.
    pub fn new_busbar_section(&self, id: &str, node: i32) -> Result<Arc<BusbarSectionView>, IndexError> {
        self.check_attachment(id, Some(node))?;
        let attributes = BusbarSectionAttributes::new(self.core.id(), node);
        self.core.index()?.create_as(Resource::new(id, attributes))
    }

    /// Creates a load in this voltage level.
    ///
    /// `attributes.voltage_level_id` is overwritten with this voltage level.
    pub fn new_load(&self, id: &str, mut attributes: LoadAttributes) -> Result<Arc<LoadView>, IndexError> {
        self.check_attachment(id, attributes.node)?;
        attributes.voltage_level_id = self.core.id().to_owned();
        self.core.index()?.create_as(Resource::new(id, attributes))
    }

    /// Creates a generator in this voltage level.
    ///
    /// `attributes.voltage_level_id` is overwritten with this voltage level.
    pub fn new_generator(
        &self,
        id: &str,
        mut attributes: GeneratorAttributes,
    ) -> Result<Arc<GeneratorView>, IndexError> {
        self.check_attachment(id, attributes.node)?;
        attributes.voltage_level_id = self.core.id().to_owned();
        self.core.index()?.create_as(Resource::new(id, attributes))
    }

    /// Creates a switch in this voltage level.
    ///
    /// `attributes.voltage_level_id` is overwritten with this voltage level.
    pub fn new_switch(&self, id: &str, mut attributes: SwitchAttributes) -> Result<Arc<SwitchView>, IndexError> {
        self.check_attachment(id, attributes.node1)?;
        self.check_attachment(id, attributes.node2)?;
        attributes.voltage_level_id = self.core.id().to_owned();
        self.core.index()?.create_as(Resource::new(id, attributes))
    }

    /// Checks that a terminal with `node` fits this voltage level's mode.
    pub(crate) fn check_attachment(&self, id: &str, node: Option<i32>) -> Result<(), IndexError> {
        match (self.topology_kind(), node) {
            (TopologyKind::NodeBreaker, None) => Err(IndexError::invariant(
                "attach",
                id,
                format!("node-breaker voltage level '{}' requires a node", self.core.id()),
            )),
            (TopologyKind::BusBreaker, Some(node)) => Err(IndexError::invariant(
                "attach",
                id,
                format!(
                    "bus-breaker voltage level '{}' cannot take node {node}",
                    self.core.id()
                ),
            )),
            _ => Ok(()),
        }
    }
}

impl BundleView for VoltageLevelView {
    type Attributes = VoltageLevelAttributes;

    fn core(&self) -> &ViewCore<VoltageLevelAttributes> {
        &self.core
    }
}

impl Contained for VoltageLevelView {
    fn container_ids(&self) -> Vec<String> {
        vec![self.substation_id()]
    }
}

impl Extendable for VoltageLevelView {}

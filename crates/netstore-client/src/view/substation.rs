// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Substation view.

use std::sync::{Arc, Weak};

use netstore_model::{
    BranchAttributes, Resource, Side, SubstationAttributes, TopologyKind,
    TwoWindingsTransformerAttributes, VoltageLevelAttributes,
};

use crate::equipment::Contained;
use crate::error::IndexError;
use crate::index::ResourceIndex;
use crate::view::{BundleView, Extendable, TwoWindingsTransformerView, ViewCore, VoltageLevelView};

/// A substation and the voltage levels it holds.
#[derive(Debug)]
pub struct SubstationView {
    core: ViewCore<SubstationAttributes>,
}

impl SubstationView {
    pub(crate) fn build(index: Weak<ResourceIndex>, resource: Resource<SubstationAttributes>) -> Self {
        Self {
            core: ViewCore::new(index, resource),
        }
    }

    /// Country code, if set.
    pub fn country(&self) -> Option<String> {
        self.core.read(|a| a.country.clone())
    }

    /// Sets or clears the country code.
    pub fn set_country(&self, country: Option<&str>) {
        self.core.write(|a| a.country = country.map(str::to_owned));
    }

    /// Operating TSO, if set.
    pub fn tso(&self) -> Option<String> {
        self.core.read(|a| a.tso.clone())
    }

    /// Sets or clears the operating TSO.
    pub fn set_tso(&self, tso: Option<&str>) {
        self.core.write(|a| a.tso = tso.map(str::to_owned));
    }

    /// Voltage levels of this substation.
    pub fn voltage_levels(&self) -> Result<Vec<Arc<VoltageLevelView>>, IndexError> {
        self.core.index()?.contained(self.core.id())
    }

    /// Transformers attached to a voltage level of this substation.
    pub fn two_windings_transformers(
        &self,
    ) -> Result<Vec<Arc<TwoWindingsTransformerView>>, IndexError> {
        let index = self.core.index()?;
        let mut found = Vec::new();
        for vl in self.voltage_levels()? {
            for twt in index.contained::<TwoWindingsTransformerView>(vl.core().id())? {
                if !found.iter().any(|seen: &Arc<TwoWindingsTransformerView>| Arc::ptr_eq(seen, &twt)) {
                    found.push(twt);
                }
            }
        }
        Ok(found)
    }

    /// Creates a voltage level in this substation.
    pub fn new_voltage_level(
        &self,
        id: &str,
        nominal_v: f64,
        topology_kind: TopologyKind,
    ) -> Result<Arc<VoltageLevelView>, IndexError> {
        let attributes = VoltageLevelAttributes::new(self.core.id(), nominal_v, topology_kind);
        self.core.index()?.create_as(Resource::new(id, attributes))
    }

    /// Creates a transformer between two voltage levels of this substation.
    pub fn new_two_windings_transformer(
        &self,
        id: &str,
        attributes: TwoWindingsTransformerAttributes,
    ) -> Result<Arc<TwoWindingsTransformerView>, IndexError> {
        let index = self.core.index()?;
        for side in Side::BOTH {
            let vl = index.resolve_as::<VoltageLevelView>(attributes.voltage_level_id(side))?;
            if vl.substation_id() != self.core.id() {
                return Err(IndexError::invariant(
                    "new_two_windings_transformer",
                    id,
                    format!(
                        "voltage level '{}' is not in substation '{}'",
                        vl.core().id(),
                        self.core.id()
                    ),
                ));
            }
            vl.check_attachment(id, attributes.node(side))?;
        }
        index.create_as(Resource::new(id, attributes))
    }
}

impl BundleView for SubstationView {
    type Attributes = SubstationAttributes;

    fn core(&self) -> &ViewCore<SubstationAttributes> {
        &self.core
    }
}

impl Contained for SubstationView {
    fn container_ids(&self) -> Vec<String> {
        Vec::new()
    }
}

impl Extendable for SubstationView {}

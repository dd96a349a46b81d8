// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Network root view.

use std::sync::{Arc, Weak};

use netstore_model::{
    BranchAttributes, LineAttributes, NetworkAttributes, Resource, Side, SubstationAttributes,
};
use uuid::Uuid;

use crate::equipment::{Contained, Equipment};
use crate::error::IndexError;
use crate::index::ResourceIndex;
use crate::view::{
    BundleView, BusbarSectionView, Extendable, GeneratorView, LineView, LoadView, SubstationView,
    SwitchView, TwoWindingsTransformerView, ViewCore, VoltageLevelView,
};

macro_rules! lookups {
    ($($one:ident, $all:ident => $view:ident;)+) => {
        $(
            #[doc = concat!("[`", stringify!($view), "`] for `id`.")]
            pub fn $one(&self, id: &str) -> Result<Arc<$view>, IndexError> {
                self.index()?.resolve_as::<$view>(id)
            }

            #[doc = concat!("Every [`", stringify!($view), "`] of the network.")]
            pub fn $all(&self) -> Result<Vec<Arc<$view>>, IndexError> {
                self.index()?.views::<$view>()
            }
        )+
    };
}

/// Root of a network: case metadata and entry point to every element.
#[derive(Debug)]
pub struct NetworkView {
    core: ViewCore<NetworkAttributes>,
}

impl NetworkView {
    pub(crate) fn build(index: Weak<ResourceIndex>, resource: Resource<NetworkAttributes>) -> Self {
        Self {
            core: ViewCore::new(index, resource),
        }
    }

    /// Owning index.
    pub fn index(&self) -> Result<Arc<ResourceIndex>, IndexError> {
        self.core.index()
    }

    /// Store-wide uuid of the network.
    pub fn uuid(&self) -> Uuid {
        self.core.read(|a| a.uuid)
    }

    /// Case date, in milliseconds since the Unix epoch.
    pub fn case_date(&self) -> i64 {
        self.core.read(|a| a.case_date)
    }

    /// Sets the case date.
    pub fn set_case_date(&self, case_date: i64) {
        self.core.write(|a| a.case_date = case_date);
    }

    /// Forecast distance in minutes.
    pub fn forecast_distance(&self) -> i32 {
        self.core.read(|a| a.forecast_distance)
    }

    /// Sets the forecast distance.
    pub fn set_forecast_distance(&self, minutes: i32) {
        self.core.write(|a| a.forecast_distance = minutes);
    }

    /// Source format of the case, if known.
    pub fn source_format(&self) -> Option<String> {
        self.core.read(|a| a.source_format.clone())
    }

    /// Any element by id.
    pub fn identifiable(&self, id: &str) -> Result<Equipment, IndexError> {
        self.index()?.resolve(id)
    }

    lookups! {
        substation, substations => SubstationView;
        voltage_level, voltage_levels => VoltageLevelView;
        busbar_section, busbar_sections => BusbarSectionView;
        load, loads => LoadView;
        generator, generators => GeneratorView;
        switch, switches => SwitchView;
        line, lines => LineView;
        two_windings_transformer, two_windings_transformers => TwoWindingsTransformerView;
    }

    /// Creates a substation.
    pub fn new_substation(
        &self,
        id: &str,
        attributes: SubstationAttributes,
    ) -> Result<Arc<SubstationView>, IndexError> {
        self.index()?.create_as(Resource::new(id, attributes))
    }

    /// Creates a line between two voltage levels.
    ///
    /// Each side must be attached the way its voltage level expects: a node
    /// in node-breaker mode, a bus in bus-breaker mode.
    pub fn new_line(
        &self,
        id: &str,
        attributes: LineAttributes,
    ) -> Result<Arc<LineView>, IndexError> {
        let index = self.index()?;
        for side in Side::BOTH {
            index
                .resolve_as::<VoltageLevelView>(attributes.voltage_level_id(side))?
                .check_attachment(id, attributes.node(side))?;
        }
        index.create_as(Resource::new(id, attributes))
    }
}

impl BundleView for NetworkView {
    type Attributes = NetworkAttributes;

    fn core(&self) -> &ViewCore<NetworkAttributes> {
        &self.core
    }
}

impl Contained for NetworkView {
    fn container_ids(&self) -> Vec<String> {
        Vec::new()
    }
}

impl Extendable for NetworkView {}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Single-terminal equipment: busbar sections, loads and generators.

use serde::{Deserialize, Serialize};

use crate::position::{BusbarSectionPositionAttributes, ConnectablePositionAttributes};
use crate::properties::PropertyMap;
use crate::resource::{is_nan, nan, IdentifiableAttributes};

/// Attributes of equipment connected through exactly one terminal.
///
/// An injection attaches either to a `node` (node-breaker voltage level) or to
/// a `bus`/`connectable_bus` pair (bus-breaker voltage level); never both.
pub trait InjectionAttributes: IdentifiableAttributes {
    /// Voltage level the terminal belongs to.
    fn voltage_level_id(&self) -> &str;
    /// Node number in node-breaker mode.
    fn node(&self) -> Option<i32>;
    /// Bus the terminal is currently connected to, in bus-breaker mode.
    fn bus(&self) -> Option<&str>;
    /// Bus the terminal can be connected to, in bus-breaker mode.
    fn connectable_bus(&self) -> Option<&str>;
    /// Active power flow in MW (NaN when not computed).
    fn p(&self) -> f64;
    /// Sets the active power flow.
    fn set_p(&mut self, p: f64);
    /// Reactive power flow in MVar (NaN when not computed).
    fn q(&self) -> f64;
    /// Sets the reactive power flow.
    fn set_q(&mut self, q: f64);
    /// Feeder position extension slot.
    fn position(&self) -> Option<&ConnectablePositionAttributes>;
    /// Replaces the feeder position extension slot (`None` clears it).
    fn set_position(&mut self, position: Option<ConnectablePositionAttributes>);
}

macro_rules! impl_injection {
    ($ty:ty) => {
        impl InjectionAttributes for $ty {
            fn voltage_level_id(&self) -> &str {
                &self.voltage_level_id
            }

            fn node(&self) -> Option<i32> {
                self.node
            }

            fn bus(&self) -> Option<&str> {
                self.bus.as_deref()
            }

            fn connectable_bus(&self) -> Option<&str> {
                self.connectable_bus.as_deref()
            }

            fn p(&self) -> f64 {
                self.p
            }

            fn set_p(&mut self, p: f64) {
                self.p = p;
            }

            fn q(&self) -> f64 {
                self.q
            }

            fn set_q(&mut self, q: f64) {
                self.q = q;
            }

            fn position(&self) -> Option<&ConnectablePositionAttributes> {
                self.position.as_ref()
            }

            fn set_position(&mut self, position: Option<ConnectablePositionAttributes>) {
                self.position = position;
            }
        }
    };
}

/// Attributes of a busbar section.
///
/// Busbar sections only exist in node-breaker voltage levels and carry no
/// power-flow quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusbarSectionAttributes {
    /// Voltage level the section belongs to.
    pub voltage_level_id: String,
    /// Optional name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// String properties.
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
    /// Node number.
    pub node: i32,
    /// Diagram position extension slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<BusbarSectionPositionAttributes>,
}

impl BusbarSectionAttributes {
    /// Section on `node` of `voltage_level_id`.
    pub fn new(voltage_level_id: impl Into<String>, node: i32) -> Self {
        Self {
            voltage_level_id: voltage_level_id.into(),
            name: None,
            properties: PropertyMap::new(),
            node,
            position: None,
        }
    }
}

impl_identifiable!(BusbarSectionAttributes, BusbarSection);

/// Kind of load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadType {
    /// Regular consumption.
    #[default]
    Undefined,
    /// Plant auxiliaries.
    Auxiliary,
    /// Modelling artefact.
    Fictitious,
}

/// Attributes of a load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadAttributes {
    /// Voltage level the terminal belongs to.
    pub voltage_level_id: String,
    /// Optional name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// String properties.
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
    /// Node number (node-breaker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<i32>,
    /// Connected bus (bus-breaker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<String>,
    /// Connectable bus (bus-breaker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectable_bus: Option<String>,
    /// Load kind.
    #[serde(default)]
    pub load_type: LoadType,
    /// Active power setpoint in MW.
    #[serde(with = "crate::float")]
    pub p0: f64,
    /// Reactive power setpoint in MVar.
    #[serde(with = "crate::float")]
    pub q0: f64,
    /// Active power flow in MW.
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub p: f64,
    /// Reactive power flow in MVar.
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub q: f64,
    /// Feeder position extension slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<ConnectablePositionAttributes>,
}

impl LoadAttributes {
    /// Load in `voltage_level_id` with zero setpoints and no connection point.
    pub fn new(voltage_level_id: impl Into<String>) -> Self {
        Self {
            voltage_level_id: voltage_level_id.into(),
            name: None,
            properties: PropertyMap::new(),
            node: None,
            bus: None,
            connectable_bus: None,
            load_type: LoadType::Undefined,
            p0: 0.0,
            q0: 0.0,
            p: f64::NAN,
            q: f64::NAN,
            position: None,
        }
    }
}

impl_identifiable!(LoadAttributes, Load);
impl_injection!(LoadAttributes);

/// Primary energy of a generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnergySource {
    /// Hydro.
    Hydro,
    /// Nuclear.
    Nuclear,
    /// Wind.
    Wind,
    /// Thermal.
    Thermal,
    /// Solar.
    Solar,
    /// Anything else.
    #[default]
    Other,
}

/// Attributes of a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorAttributes {
    /// Voltage level the terminal belongs to.
    pub voltage_level_id: String,
    /// Optional name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// String properties.
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
    /// Node number (node-breaker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<i32>,
    /// Connected bus (bus-breaker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<String>,
    /// Connectable bus (bus-breaker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectable_bus: Option<String>,
    /// Primary energy.
    #[serde(default)]
    pub energy_source: EnergySource,
    /// Minimum active power in MW.
    #[serde(with = "crate::float")]
    pub min_p: f64,
    /// Maximum active power in MW.
    #[serde(with = "crate::float")]
    pub max_p: f64,
    /// Whether the generator regulates voltage.
    #[serde(default)]
    pub voltage_regulator_on: bool,
    /// Active power target in MW.
    #[serde(with = "crate::float")]
    pub target_p: f64,
    /// Reactive power target in MVar (NaN when unset).
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub target_q: f64,
    /// Voltage target in kV (NaN when unset).
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub target_v: f64,
    /// Active power flow in MW.
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub p: f64,
    /// Reactive power flow in MVar.
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub q: f64,
    /// Feeder position extension slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<ConnectablePositionAttributes>,
}

impl GeneratorAttributes {
    /// Generator in `voltage_level_id` with an unbounded zero target.
    pub fn new(voltage_level_id: impl Into<String>) -> Self {
        Self {
            voltage_level_id: voltage_level_id.into(),
            name: None,
            properties: PropertyMap::new(),
            node: None,
            bus: None,
            connectable_bus: None,
            energy_source: EnergySource::Other,
            min_p: f64::MIN,
            max_p: f64::MAX,
            voltage_regulator_on: false,
            target_p: 0.0,
            target_q: f64::NAN,
            target_v: f64::NAN,
            p: f64::NAN,
            q: f64::NAN,
            position: None,
        }
    }
}

impl_identifiable!(GeneratorAttributes, Generator);
impl_injection!(GeneratorAttributes);

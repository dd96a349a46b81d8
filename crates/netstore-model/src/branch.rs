// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Two-sided equipment: switches, lines and two windings transformers.

use serde::{Deserialize, Serialize};

use crate::position::ConnectablePositionAttributes;
use crate::properties::PropertyMap;
use crate::resource::{is_nan, nan, IdentifiableAttributes};

/// Side of a two-terminal equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// First terminal.
    One,
    /// Second terminal.
    Two,
}

impl Side {
    /// Both sides, in order.
    pub const BOTH: [Self; 2] = [Self::One, Self::Two];
}

/// Attributes of equipment connected through one terminal per [`Side`].
pub trait BranchAttributes: IdentifiableAttributes {
    /// Voltage level of the terminal on `side`.
    fn voltage_level_id(&self, side: Side) -> &str;
    /// Node number on `side` (node-breaker).
    fn node(&self, side: Side) -> Option<i32>;
    /// Connected bus on `side` (bus-breaker).
    fn bus(&self, side: Side) -> Option<&str>;
    /// Connectable bus on `side` (bus-breaker).
    fn connectable_bus(&self, side: Side) -> Option<&str>;
    /// Active power flow on `side` in MW.
    fn p(&self, side: Side) -> f64;
    /// Sets the active power flow on `side`.
    fn set_p(&mut self, side: Side, p: f64);
    /// Reactive power flow on `side` in MVar.
    fn q(&self, side: Side) -> f64;
    /// Sets the reactive power flow on `side`.
    fn set_q(&mut self, side: Side, q: f64);
    /// Feeder position extension slot of `side`.
    fn position(&self, side: Side) -> Option<&ConnectablePositionAttributes>;
    /// Replaces the feeder position slot of `side` (`None` clears it).
    fn set_position(&mut self, side: Side, position: Option<ConnectablePositionAttributes>);
}

macro_rules! impl_branch {
    ($ty:ty) => {
        impl BranchAttributes for $ty {
            fn voltage_level_id(&self, side: Side) -> &str {
                match side {
                    Side::One => &self.voltage_level_id1,
                    Side::Two => &self.voltage_level_id2,
                }
            }

            fn node(&self, side: Side) -> Option<i32> {
                match side {
                    Side::One => self.node1,
                    Side::Two => self.node2,
                }
            }

            fn bus(&self, side: Side) -> Option<&str> {
                match side {
                    Side::One => self.bus1.as_deref(),
                    Side::Two => self.bus2.as_deref(),
                }
            }

            fn connectable_bus(&self, side: Side) -> Option<&str> {
                match side {
                    Side::One => self.connectable_bus1.as_deref(),
                    Side::Two => self.connectable_bus2.as_deref(),
                }
            }

            fn p(&self, side: Side) -> f64 {
                match side {
                    Side::One => self.p1,
                    Side::Two => self.p2,
                }
            }

            fn set_p(&mut self, side: Side, p: f64) {
                match side {
                    Side::One => self.p1 = p,
                    Side::Two => self.p2 = p,
                }
            }

            fn q(&self, side: Side) -> f64 {
                match side {
                    Side::One => self.q1,
                    Side::Two => self.q2,
                }
            }

            fn set_q(&mut self, side: Side, q: f64) {
                match side {
                    Side::One => self.q1 = q,
                    Side::Two => self.q2 = q,
                }
            }

            fn position(&self, side: Side) -> Option<&ConnectablePositionAttributes> {
                match side {
                    Side::One => self.position1.as_ref(),
                    Side::Two => self.position2.as_ref(),
                }
            }

            fn set_position(&mut self, side: Side, position: Option<ConnectablePositionAttributes>) {
                match side {
                    Side::One => self.position1 = position,
                    Side::Two => self.position2 = position,
                }
            }
        }
    };
}

/// Switch kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwitchKind {
    /// Breaker, able to interrupt load current.
    #[default]
    Breaker,
    /// Disconnector.
    Disconnector,
    /// Load break switch.
    LoadBreakSwitch,
}

/// Attributes of a switch.
///
/// A switch joins two nodes (node-breaker) or two buses (bus-breaker) of a
/// single voltage level. It has no terminals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchAttributes {
    /// Voltage level holding the switch.
    pub voltage_level_id: String,
    /// Optional name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// String properties.
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
    /// Switch kind.
    #[serde(default)]
    pub kind: SwitchKind,
    /// First node (node-breaker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node1: Option<i32>,
    /// Second node (node-breaker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node2: Option<i32>,
    /// First bus (bus-breaker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus1: Option<String>,
    /// Second bus (bus-breaker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus2: Option<String>,
    /// Open state.
    #[serde(default)]
    pub open: bool,
    /// Retained in the bus-breaker projection.
    #[serde(default)]
    pub retained: bool,
    /// Modelling artefact.
    #[serde(default)]
    pub fictitious: bool,
}

impl SwitchAttributes {
    /// Closed node-breaker switch between `node1` and `node2`.
    pub fn between_nodes(voltage_level_id: impl Into<String>, kind: SwitchKind, node1: i32, node2: i32) -> Self {
        Self {
            voltage_level_id: voltage_level_id.into(),
            name: None,
            properties: PropertyMap::new(),
            kind,
            node1: Some(node1),
            node2: Some(node2),
            bus1: None,
            bus2: None,
            open: false,
            retained: false,
            fictitious: false,
        }
    }

    /// Closed bus-breaker switch between `bus1` and `bus2`.
    pub fn between_buses(voltage_level_id: impl Into<String>, bus1: impl Into<String>, bus2: impl Into<String>) -> Self {
        Self {
            voltage_level_id: voltage_level_id.into(),
            name: None,
            properties: PropertyMap::new(),
            kind: SwitchKind::Breaker,
            node1: None,
            node2: None,
            bus1: Some(bus1.into()),
            bus2: Some(bus2.into()),
            open: false,
            retained: false,
            fictitious: false,
        }
    }
}

impl_identifiable!(SwitchAttributes, Switch);

/// Attributes of an AC line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAttributes {
    /// Voltage level of side one.
    pub voltage_level_id1: String,
    /// Voltage level of side two.
    pub voltage_level_id2: String,
    /// Optional name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// String properties.
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
    /// Node of side one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node1: Option<i32>,
    /// Node of side two.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node2: Option<i32>,
    /// Bus of side one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus1: Option<String>,
    /// Bus of side two.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus2: Option<String>,
    /// Connectable bus of side one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectable_bus1: Option<String>,
    /// Connectable bus of side two.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectable_bus2: Option<String>,
    /// Series resistance in ohms.
    #[serde(with = "crate::float")]
    pub r: f64,
    /// Series reactance in ohms.
    #[serde(with = "crate::float")]
    pub x: f64,
    /// Shunt conductance of side one in S.
    #[serde(with = "crate::float")]
    pub g1: f64,
    /// Shunt susceptance of side one in S.
    #[serde(with = "crate::float")]
    pub b1: f64,
    /// Shunt conductance of side two in S.
    #[serde(with = "crate::float")]
    pub g2: f64,
    /// Shunt susceptance of side two in S.
    #[serde(with = "crate::float")]
    pub b2: f64,
    /// Active power flow on side one.
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub p1: f64,
    /// Reactive power flow on side one.
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub q1: f64,
    /// Active power flow on side two.
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub p2: f64,
    /// Reactive power flow on side two.
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub q2: f64,
    /// Feeder position slot of side one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position1: Option<ConnectablePositionAttributes>,
    /// Feeder position slot of side two.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position2: Option<ConnectablePositionAttributes>,
}

impl LineAttributes {
    /// Lossless line between two voltage levels, not yet connected.
    pub fn new(voltage_level_id1: impl Into<String>, voltage_level_id2: impl Into<String>) -> Self {
        Self {
            voltage_level_id1: voltage_level_id1.into(),
            voltage_level_id2: voltage_level_id2.into(),
            name: None,
            properties: PropertyMap::new(),
            node1: None,
            node2: None,
            bus1: None,
            bus2: None,
            connectable_bus1: None,
            connectable_bus2: None,
            r: 0.0,
            x: 0.0,
            g1: 0.0,
            b1: 0.0,
            g2: 0.0,
            b2: 0.0,
            p1: f64::NAN,
            q1: f64::NAN,
            p2: f64::NAN,
            q2: f64::NAN,
            position1: None,
            position2: None,
        }
    }
}

impl_identifiable!(LineAttributes, Line);
impl_branch!(LineAttributes);

/// Regulation mode of a phase tap changer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseRegulationMode {
    /// Limits the current through the transformer.
    CurrentLimiter,
    /// Controls the active power flow.
    ActivePowerControl,
    /// Fixed tap.
    #[default]
    FixedTap,
}

/// One step of a phase tap changer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTapChangerStepAttributes {
    /// Voltage ratio in per unit.
    #[serde(with = "crate::float")]
    pub rho: f64,
    /// Resistance deviation in %.
    #[serde(with = "crate::float")]
    pub r: f64,
    /// Reactance deviation in %.
    #[serde(with = "crate::float")]
    pub x: f64,
    /// Conductance deviation in %.
    #[serde(with = "crate::float")]
    pub g: f64,
    /// Susceptance deviation in %.
    #[serde(with = "crate::float")]
    pub b: f64,
    /// Phase shift in degrees.
    #[serde(with = "crate::float")]
    pub alpha: f64,
}

/// Phase tap changer nested in a transformer's attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTapChangerAttributes {
    /// Position of the first step.
    pub low_tap_position: i32,
    /// Current tap position.
    pub tap_position: i32,
    /// Regulation mode.
    #[serde(default)]
    pub regulation_mode: PhaseRegulationMode,
    /// Regulation target (NaN when unset).
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub regulation_value: f64,
    /// Whether regulation is active.
    #[serde(default)]
    pub regulating: bool,
    /// Target deadband (NaN when unset).
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub target_deadband: f64,
    /// Steps, ordered from `low_tap_position` upwards.
    #[serde(default)]
    pub steps: Vec<PhaseTapChangerStepAttributes>,
}

/// One step of a ratio tap changer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioTapChangerStepAttributes {
    /// Voltage ratio in per unit.
    #[serde(with = "crate::float")]
    pub rho: f64,
    /// Resistance deviation in %.
    #[serde(with = "crate::float")]
    pub r: f64,
    /// Reactance deviation in %.
    #[serde(with = "crate::float")]
    pub x: f64,
    /// Conductance deviation in %.
    #[serde(with = "crate::float")]
    pub g: f64,
    /// Susceptance deviation in %.
    #[serde(with = "crate::float")]
    pub b: f64,
}

/// Ratio tap changer nested in a transformer's attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioTapChangerAttributes {
    /// Position of the first step.
    pub low_tap_position: i32,
    /// Current tap position.
    pub tap_position: i32,
    /// Whether the changer can operate under load.
    #[serde(default)]
    pub load_tap_changing_capabilities: bool,
    /// Whether regulation is active.
    #[serde(default)]
    pub regulating: bool,
    /// Voltage target in kV (NaN when unset).
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub target_v: f64,
    /// Target deadband (NaN when unset).
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub target_deadband: f64,
    /// Steps, ordered from `low_tap_position` upwards.
    #[serde(default)]
    pub steps: Vec<RatioTapChangerStepAttributes>,
}

/// Attributes of a two windings transformer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoWindingsTransformerAttributes {
    /// Voltage level of side one.
    pub voltage_level_id1: String,
    /// Voltage level of side two.
    pub voltage_level_id2: String,
    /// Optional name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// String properties.
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
    /// Node of side one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node1: Option<i32>,
    /// Node of side two.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node2: Option<i32>,
    /// Bus of side one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus1: Option<String>,
    /// Bus of side two.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus2: Option<String>,
    /// Connectable bus of side one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectable_bus1: Option<String>,
    /// Connectable bus of side two.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectable_bus2: Option<String>,
    /// Series resistance in ohms.
    #[serde(with = "crate::float")]
    pub r: f64,
    /// Series reactance in ohms.
    #[serde(with = "crate::float")]
    pub x: f64,
    /// Magnetizing conductance in S.
    #[serde(with = "crate::float")]
    pub g: f64,
    /// Magnetizing susceptance in S.
    #[serde(with = "crate::float")]
    pub b: f64,
    /// Rated voltage of side one in kV.
    #[serde(with = "crate::float")]
    pub rated_u1: f64,
    /// Rated voltage of side two in kV.
    #[serde(with = "crate::float")]
    pub rated_u2: f64,
    /// Active power flow on side one.
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub p1: f64,
    /// Reactive power flow on side one.
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub q1: f64,
    /// Active power flow on side two.
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub p2: f64,
    /// Reactive power flow on side two.
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub q2: f64,
    /// Feeder position slot of side one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position1: Option<ConnectablePositionAttributes>,
    /// Feeder position slot of side two.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position2: Option<ConnectablePositionAttributes>,
    /// Phase tap changer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_tap_changer: Option<PhaseTapChangerAttributes>,
    /// Ratio tap changer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio_tap_changer: Option<RatioTapChangerAttributes>,
}

impl TwoWindingsTransformerAttributes {
    /// Ideal transformer between two voltage levels, not yet connected.
    pub fn new(
        voltage_level_id1: impl Into<String>,
        voltage_level_id2: impl Into<String>,
        rated_u1: f64,
        rated_u2: f64,
    ) -> Self {
        Self {
            voltage_level_id1: voltage_level_id1.into(),
            voltage_level_id2: voltage_level_id2.into(),
            name: None,
            properties: PropertyMap::new(),
            node1: None,
            node2: None,
            bus1: None,
            bus2: None,
            connectable_bus1: None,
            connectable_bus2: None,
            r: 0.0,
            x: 0.0,
            g: 0.0,
            b: 0.0,
            rated_u1,
            rated_u2,
            p1: f64::NAN,
            q1: f64::NAN,
            p2: f64::NAN,
            q2: f64::NAN,
            position1: None,
            position2: None,
            phase_tap_changer: None,
            ratio_tap_changer: None,
        }
    }
}

impl_identifiable!(TwoWindingsTransformerAttributes, TwoWindingsTransformer);
impl_branch!(TwoWindingsTransformerAttributes);

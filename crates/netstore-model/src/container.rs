// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Container kinds: network, substation and voltage level.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::properties::PropertyMap;
use crate::resource::{is_nan, nan};

/// Root attributes of a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAttributes {
    /// Store-wide network identifier.
    pub uuid: Uuid,
    /// Optional name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// String properties.
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
    /// Case date in milliseconds since the Unix epoch.
    pub case_date: i64,
    /// Forecast distance in minutes (0 for a snapshot).
    #[serde(default)]
    pub forecast_distance: i32,
    /// Format the case was imported from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_format: Option<String>,
}

impl NetworkAttributes {
    /// Attributes for a new network with only the mandatory fields set.
    pub fn new(uuid: Uuid, case_date: i64) -> Self {
        Self {
            uuid,
            name: None,
            properties: PropertyMap::new(),
            case_date,
            forecast_distance: 0,
            source_format: None,
        }
    }
}

impl_identifiable!(NetworkAttributes, Network);

/// Attributes of a substation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstationAttributes {
    /// Optional name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// String properties.
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
    /// ISO 3166 alpha-2 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Operating TSO.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tso: Option<String>,
}

impl_identifiable!(SubstationAttributes, Substation);

/// How the equipment of a voltage level is connected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopologyKind {
    /// Equipment attaches to numbered nodes joined by switches.
    #[default]
    NodeBreaker,
    /// Equipment attaches to named configured buses.
    BusBreaker,
}

/// Attributes of a voltage level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoltageLevelAttributes {
    /// Owning substation.
    pub substation_id: String,
    /// Optional name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// String properties.
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
    /// Nominal voltage in kV.
    #[serde(with = "crate::float")]
    pub nominal_v: f64,
    /// Low voltage limit in kV (NaN when unset).
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub low_voltage_limit: f64,
    /// High voltage limit in kV (NaN when unset).
    #[serde(default = "nan", skip_serializing_if = "is_nan", with = "crate::float")]
    pub high_voltage_limit: f64,
    /// Connection mode of the contained equipment.
    #[serde(default)]
    pub topology_kind: TopologyKind,
}

impl VoltageLevelAttributes {
    /// Attributes with limits unset.
    pub fn new(substation_id: impl Into<String>, nominal_v: f64, topology_kind: TopologyKind) -> Self {
        Self {
            substation_id: substation_id.into(),
            name: None,
            properties: PropertyMap::new(),
            nominal_v,
            low_voltage_limit: f64::NAN,
            high_voltage_limit: f64::NAN,
            topology_kind,
        }
    }
}

impl_identifiable!(VoltageLevelAttributes, VoltageLevel);

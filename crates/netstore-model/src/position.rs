// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Extension slot records: positional hints stored inside equipment attributes.
//!
//! These records are never stored as resources of their own. They exist only
//! as optional fields of the owning equipment's attributes.

use serde::{Deserialize, Serialize};

/// Position of a busbar section in a substation diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusbarSectionPositionAttributes {
    /// Busbar rank, starting at 1.
    pub busbar_index: i32,
    /// Section rank along the busbar, starting at 1.
    pub section_index: i32,
}

/// Feeder direction relative to the busbars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Drawn above the busbars.
    Top,
    /// Drawn below the busbars.
    Bottom,
    /// No preference.
    #[default]
    Undefined,
}

/// Feeder position of a connectable (one per terminal side).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectablePositionAttributes {
    /// Feeder label.
    pub label: String,
    /// Ordering among feeders; absent when unordered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Drawing direction.
    #[serde(default)]
    pub direction: Direction,
}

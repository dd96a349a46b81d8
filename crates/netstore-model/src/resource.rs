// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Resource envelope and the attribute contract every equipment kind follows.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::properties::PropertyMap;

/// Kind tag of a stored resource.
///
/// The tag is immutable for the lifetime of a resource and always matches
/// the static kind of its attribute record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    /// Root network resource.
    Network,
    /// Substation container.
    Substation,
    /// Voltage level container.
    VoltageLevel,
    /// Busbar section (node-breaker pseudo-injection).
    BusbarSection,
    /// Load injection.
    Load,
    /// Generator injection.
    Generator,
    /// Switch between two nodes or buses of one voltage level.
    Switch,
    /// AC line between two voltage levels.
    Line,
    /// Two windings transformer.
    TwoWindingsTransformer,
}

impl ResourceType {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Network,
        Self::Substation,
        Self::VoltageLevel,
        Self::BusbarSection,
        Self::Load,
        Self::Generator,
        Self::Switch,
        Self::Line,
        Self::TwoWindingsTransformer,
    ];

    /// Canonical upper-case tag, as used in the encoding.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "NETWORK",
            Self::Substation => "SUBSTATION",
            Self::VoltageLevel => "VOLTAGE_LEVEL",
            Self::BusbarSection => "BUSBAR_SECTION",
            Self::Load => "LOAD",
            Self::Generator => "GENERATOR",
            Self::Switch => "SWITCH",
            Self::Line => "LINE",
            Self::TwoWindingsTransformer => "TWO_WINDINGS_TRANSFORMER",
        }
    }

    /// Returns `true` for kinds connected to a voltage level through terminals.
    pub const fn is_connectable(self) -> bool {
        matches!(
            self,
            Self::BusbarSection
                | Self::Load
                | Self::Generator
                | Self::Switch
                | Self::Line
                | Self::TwoWindingsTransformer
        )
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building or decoding resources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The envelope tag disagrees with the attribute record kind.
    #[error("resource type mismatch for {id}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Resource identifier.
        id: String,
        /// Kind of the attribute record.
        expected: ResourceType,
        /// Kind carried by the envelope.
        found: ResourceType,
    },
    /// The bytes were not a valid resource encoding.
    #[error("invalid resource encoding: {0}")]
    Encoding(String),
}

/// Contract shared by every attribute record.
///
/// `TYPE` binds the record to exactly one [`ResourceType`]; `name` and
/// `properties` are common to all kinds.
pub trait IdentifiableAttributes:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Kind tag of resources carrying this record.
    const TYPE: ResourceType;

    /// Optional human-readable name.
    fn name(&self) -> Option<&str>;

    /// Free-form string properties.
    fn properties(&self) -> &PropertyMap;

    /// Mutable access to the string properties.
    fn properties_mut(&mut self) -> &mut PropertyMap;
}

/// An attribute bundle: the flat, serializable record of one piece of equipment.
///
/// Invariants
/// - `id` and the kind tag never change after construction.
/// - the kind tag always equals `A::TYPE`; decoding rejects a mismatching tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "ResourceRepr<A>",
    bound(deserialize = "A: IdentifiableAttributes")
)]
pub struct Resource<A> {
    #[serde(rename = "type")]
    ty: ResourceType,
    id: String,
    attributes: A,
}

#[derive(Deserialize)]
struct ResourceRepr<A> {
    #[serde(rename = "type")]
    ty: ResourceType,
    id: String,
    attributes: A,
}

impl<A: IdentifiableAttributes> TryFrom<ResourceRepr<A>> for Resource<A> {
    type Error = ModelError;

    fn try_from(repr: ResourceRepr<A>) -> Result<Self, Self::Error> {
        if repr.ty != A::TYPE {
            return Err(ModelError::TypeMismatch {
                id: repr.id,
                expected: A::TYPE,
                found: repr.ty,
            });
        }
        Ok(Self::new(repr.id, repr.attributes))
    }
}

impl<A: IdentifiableAttributes> Resource<A> {
    /// Builds a bundle for `id`; the kind tag is derived from `A`.
    pub fn new(id: impl Into<String>, attributes: A) -> Self {
        Self {
            ty: A::TYPE,
            id: id.into(),
            attributes,
        }
    }
}

impl<A> Resource<A> {
    /// Resource identifier, unique within its network.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Kind tag.
    pub fn resource_type(&self) -> ResourceType {
        self.ty
    }

    /// Attribute record.
    pub fn attributes(&self) -> &A {
        &self.attributes
    }

    /// Mutable attribute record.
    pub fn attributes_mut(&mut self) -> &mut A {
        &mut self.attributes
    }
}

pub(crate) fn nan() -> f64 {
    f64::NAN
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_nan(value: &f64) -> bool {
    value.is_nan()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::SubstationAttributes;

    #[test]
    fn kind_tag_follows_attribute_record() {
        let resource = Resource::new("S", SubstationAttributes::default());
        assert_eq!(resource.resource_type(), ResourceType::Substation);
        assert_eq!(resource.id(), "S");
    }

    #[test]
    fn decoding_rejects_a_mismatching_tag() {
        let json = r#"{"type":"LOAD","id":"S","attributes":{}}"#;
        let err = serde_json::from_str::<Resource<SubstationAttributes>>(json).unwrap_err();
        assert!(err.to_string().contains("type mismatch"), "{err}");
    }

    #[test]
    fn tags_match_serde_names() {
        for kind in ResourceType::ALL {
            let encoded = serde_json::to_string(&kind).unwrap();
            assert_eq!(encoded, format!("\"{}\"", kind.as_str()));
        }
    }
}

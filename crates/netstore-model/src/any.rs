// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Type-erased resource used at the storage boundary.
//!
//! Stores hand bundles of every kind through one channel. [`AnyResource`]
//! closes the set of kinds; decoding reads the envelope tag first and then
//! decodes the attributes with the record type bound to that tag.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::branch::{LineAttributes, SwitchAttributes, TwoWindingsTransformerAttributes};
use crate::container::{NetworkAttributes, SubstationAttributes, VoltageLevelAttributes};
use crate::injection::{BusbarSectionAttributes, GeneratorAttributes, LoadAttributes};
use crate::properties::PropertyMap;
use crate::resource::{IdentifiableAttributes, ModelError, Resource, ResourceType};

macro_rules! any_resource {
    ($($kind:ident => $attrs:ty),+ $(,)?) => {
        /// A resource of any kind.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum AnyResource {
            $(
                #[doc = concat!("A `", stringify!($kind), "` resource.")]
                $kind(Resource<$attrs>),
            )+
        }

        impl AnyResource {
            /// Resource identifier.
            pub fn id(&self) -> &str {
                match self {
                    $(Self::$kind(r) => r.id(),)+
                }
            }

            /// Kind tag.
            pub fn resource_type(&self) -> ResourceType {
                match self {
                    $(Self::$kind(r) => r.resource_type(),)+
                }
            }

            /// Optional name of the equipment.
            pub fn name(&self) -> Option<&str> {
                match self {
                    $(Self::$kind(r) => r.attributes().name(),)+
                }
            }

            /// String properties of the equipment.
            pub fn properties(&self) -> &PropertyMap {
                match self {
                    $(Self::$kind(r) => r.attributes().properties(),)+
                }
            }
        }

        impl<'de> Deserialize<'de> for AnyResource {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let envelope = Envelope::deserialize(deserializer)?;
                match envelope.ty {
                    $(ResourceType::$kind => {
                        typed::<$attrs, D::Error>(envelope.id, envelope.attributes).map(Self::$kind)
                    })+
                }
            }
        }

        $(
            impl From<Resource<$attrs>> for AnyResource {
                fn from(resource: Resource<$attrs>) -> Self {
                    Self::$kind(resource)
                }
            }

            impl TryFrom<AnyResource> for Resource<$attrs> {
                type Error = ModelError;

                fn try_from(any: AnyResource) -> Result<Self, Self::Error> {
                    match any {
                        AnyResource::$kind(r) => Ok(r),
                        other => Err(ModelError::TypeMismatch {
                            id: other.id().to_owned(),
                            expected: ResourceType::$kind,
                            found: other.resource_type(),
                        }),
                    }
                }
            }
        )+
    };
}

any_resource! {
    Network => NetworkAttributes,
    Substation => SubstationAttributes,
    VoltageLevel => VoltageLevelAttributes,
    BusbarSection => BusbarSectionAttributes,
    Load => LoadAttributes,
    Generator => GeneratorAttributes,
    Switch => SwitchAttributes,
    Line => LineAttributes,
    TwoWindingsTransformer => TwoWindingsTransformerAttributes,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    ty: ResourceType,
    id: String,
    attributes: serde_value::Value,
}

fn typed<A, E>(id: String, attributes: serde_value::Value) -> Result<Resource<A>, E>
where
    A: IdentifiableAttributes,
    E: de::Error,
{
    let attributes = attributes
        .deserialize_into::<A>()
        .map_err(|err| E::custom(format!("{} {id}: {err}", A::TYPE)))?;
    Ok(Resource::new(id, attributes))
}

impl AnyResource {
    /// Encodes the resource as JSON bytes.
    ///
    /// # Errors
    /// Returns [`ModelError::Encoding`] if serialization fails.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, ModelError> {
        serde_json::to_vec(self).map_err(|err| ModelError::Encoding(err.to_string()))
    }

    /// Decodes a resource of any kind from JSON bytes.
    ///
    /// # Errors
    /// Returns [`ModelError::Encoding`] for malformed input, unknown kind tags,
    /// or attributes that do not match the tagged kind.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        serde_json::from_slice(bytes).map_err(|err| ModelError::Encoding(err.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_by_envelope_tag() {
        let json = br#"{"type":"BUSBAR_SECTION","id":"BBS1","attributes":{"voltageLevelId":"VL1","name":"B1","node":0}}"#;
        let any = AnyResource::from_json_slice(json).unwrap();
        assert_eq!(any.resource_type(), ResourceType::BusbarSection);
        assert_eq!(any.id(), "BBS1");
        assert_eq!(any.name(), Some("B1"));
        let typed = Resource::<BusbarSectionAttributes>::try_from(any).unwrap();
        assert_eq!(typed.attributes().node, 0);
        assert_eq!(typed.attributes().position, None);
    }

    #[test]
    fn rejects_attributes_of_another_kind() {
        let json = br#"{"type":"LOAD","id":"L","attributes":{"country":"FR"}}"#;
        let err = AnyResource::from_json_slice(json).unwrap_err();
        assert!(matches!(err, ModelError::Encoding(_)));
    }

    #[test]
    fn downcast_reports_both_kinds() {
        let any = AnyResource::from(Resource::new("S1", SubstationAttributes::default()));
        let err = Resource::<LoadAttributes>::try_from(any).unwrap_err();
        assert_eq!(
            err,
            ModelError::TypeMismatch {
                id: "S1".into(),
                expected: ResourceType::Load,
                found: ResourceType::Substation,
            }
        );
    }
}

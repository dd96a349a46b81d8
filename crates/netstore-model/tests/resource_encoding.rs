// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used)]
//! Encoding shape of resources at the storage boundary.

use netstore_model::{
    AnyResource, ConnectablePositionAttributes, Direction, LoadAttributes, NetworkAttributes,
    PropertyMap, Resource, ResourceType, SubstationAttributes,
};
use proptest::prelude::*;
use uuid::Uuid;

#[test]
fn network_bundle_encodes_mandatory_fields_only() {
    let uuid = Uuid::parse_str("7928181c-7977-4592-ba19-88027e4254e4").unwrap();
    let resource = Resource::new("foo", NetworkAttributes::new(uuid, 1_420_070_400_000));
    let json = serde_json::to_string(&resource).unwrap();
    assert_eq!(
        json,
        r#"{"type":"NETWORK","id":"foo","attributes":{"uuid":"7928181c-7977-4592-ba19-88027e4254e4","caseDate":1420070400000,"forecastDistance":0}}"#
    );

    let decoded: Resource<NetworkAttributes> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.id(), "foo");
    assert_eq!(decoded.attributes().case_date, 1_420_070_400_000);
    assert_eq!(decoded.attributes().forecast_distance, 0);
    assert_eq!(decoded.attributes().source_format, None);
}

#[test]
fn substation_bundle_round_trips() {
    let resource = Resource::new(
        "S",
        SubstationAttributes {
            name: Some("SS".into()),
            country: Some("FR".into()),
            tso: Some("RTE".into()),
            ..SubstationAttributes::default()
        },
    );
    let json = serde_json::to_string(&resource).unwrap();
    assert_eq!(
        json,
        r#"{"type":"SUBSTATION","id":"S","attributes":{"name":"SS","country":"FR","tso":"RTE"}}"#
    );

    let any = AnyResource::from_json_slice(json.as_bytes()).unwrap();
    assert_eq!(any.resource_type(), ResourceType::Substation);
    let decoded = Resource::<SubstationAttributes>::try_from(any).unwrap();
    assert_eq!(decoded, resource);
}

#[test]
fn unset_quantities_stay_absent() {
    let resource = Resource::new(
        "LOAD1",
        LoadAttributes {
            node: Some(3),
            p0: 10.0,
            q0: 5.0,
            ..LoadAttributes::new("VL1")
        },
    );
    let json = serde_json::to_value(&resource).unwrap();
    let attributes = json.get("attributes").unwrap();
    for absent in ["p", "q", "bus", "connectableBus", "position", "properties", "name"] {
        assert!(attributes.get(absent).is_none(), "{absent} must be omitted");
    }

    let any = AnyResource::from_json_slice(&serde_json::to_vec(&json).unwrap()).unwrap();
    let decoded = Resource::<LoadAttributes>::try_from(any).unwrap();
    assert!(decoded.attributes().p.is_nan());
    assert_eq!(decoded.attributes().bus, None);
    assert_eq!(decoded.attributes().node, Some(3));
}

#[test]
fn position_slot_survives_encoding() {
    let position = ConnectablePositionAttributes {
        label: "feeder".into(),
        order: Some(4),
        direction: Direction::Bottom,
    };
    let resource = Resource::new(
        "LOAD1",
        LoadAttributes {
            position: Some(position.clone()),
            ..LoadAttributes::new("VL1")
        },
    );
    let bytes = AnyResource::from(resource).to_json_vec().unwrap();
    let decoded = Resource::<LoadAttributes>::try_from(AnyResource::from_json_slice(&bytes).unwrap()).unwrap();
    assert_eq!(decoded.attributes().position, Some(position));
}

#[test]
fn infinite_quantities_survive_encoding() {
    let resource = Resource::new(
        "LOAD1",
        LoadAttributes {
            p: f64::INFINITY,
            q0: f64::NEG_INFINITY,
            ..LoadAttributes::new("VL1")
        },
    );
    let bytes = AnyResource::from(resource).to_json_vec().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let attributes = json.get("attributes").unwrap();
    assert_eq!(attributes.get("p").unwrap(), "Infinity");
    assert_eq!(attributes.get("q0").unwrap(), "-Infinity");
    assert!(attributes.get("q").is_none());

    let decoded = Resource::<LoadAttributes>::try_from(AnyResource::from_json_slice(&bytes).unwrap()).unwrap();
    let attributes = decoded.attributes();
    assert!(attributes.p.is_infinite() && attributes.p.is_sign_positive());
    assert!(attributes.q0.is_infinite() && attributes.q0.is_sign_negative());
    assert!(attributes.q.is_nan());
}

proptest! {
    #[test]
    fn properties_round_trip_through_json(
        entries in prop::collection::btree_map("[a-z]{1,8}", "[ -~]{0,12}", 0..6)
    ) {
        let properties: PropertyMap = entries.clone().into_iter().collect();
        let resource = Resource::new(
            "S",
            SubstationAttributes { properties, ..SubstationAttributes::default() },
        );
        let bytes = AnyResource::from(resource.clone()).to_json_vec().unwrap();
        let decoded = Resource::<SubstationAttributes>::try_from(
            AnyResource::from_json_slice(&bytes).unwrap(),
        ).unwrap();
        prop_assert_eq!(decoded.attributes().properties.names().len(), entries.len());
        prop_assert_eq!(decoded, resource);
    }
}

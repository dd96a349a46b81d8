// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::expect_used, clippy::panic)]
use std::collections::BTreeMap;
use std::sync::Arc;

use netstore_app_core::prefs::IndexPrefs;
use netstore_client::{BundleView, Identifiable, MemoryStore, ResourceIndex, SubstationView};
use netstore_dry_tests::{init_test_tracing, network_test_case};
use proptest::prelude::*;

fn test_case() -> (Arc<MemoryStore>, Arc<ResourceIndex>) {
    init_test_tracing();
    let store = Arc::new(MemoryStore::new());
    let index = network_test_case(store.clone()).expect("build test case");
    (store, index)
}

#[test]
fn fresh_views_have_no_properties() {
    let (_, index) = test_case();
    let s1 = index.resolve_as::<SubstationView>("S1").expect("S1");
    assert!(!s1.has_properties());
    assert!(!s1.has_property("zone"));
    assert_eq!(s1.property("zone"), None);
    assert!(s1.property_names().is_empty());
}

#[test]
fn set_property_is_visible_everywhere() {
    let (_, index) = test_case();
    let s1 = index.resolve_as::<SubstationView>("S1").expect("S1");
    assert_eq!(s1.set_property("zone", "north"), None);

    assert!(s1.has_properties());
    assert_eq!(s1.property("zone").as_deref(), Some("north"));
    assert_eq!(s1.property_or("missing", "d"), "d");
    assert_eq!(s1.property_or("zone", "d"), "north");

    let again = index.resolve("S1").expect("S1 again");
    assert_eq!(again.as_identifiable().property("zone").as_deref(), Some("north"));
}

#[test]
fn emptied_map_matches_absent_map() {
    let (_, index) = test_case();
    let s1 = index.resolve_as::<SubstationView>("S1").expect("S1");
    let s2 = index.resolve_as::<SubstationView>("S2").expect("S2");
    s1.set_property("zone", "north");
    assert_eq!(s1.remove_property("zone").as_deref(), Some("north"));

    assert!(!s1.has_properties());
    assert_eq!(s1.property_names(), s2.property_names());
    assert_eq!(
        s1.core().snapshot().attributes().properties,
        s2.core().snapshot().attributes().properties
    );
}

#[test]
fn overwrite_returns_previous_value() {
    let (_, index) = test_case();
    let net = index.network();
    assert_eq!(net.set_property("owner", "a"), None);
    assert_eq!(net.set_property("owner", "b").as_deref(), Some("a"));
    assert_eq!(net.property_names().into_iter().collect::<Vec<_>>(), ["owner"]);
}

#[test]
fn properties_survive_flush_and_reopen() {
    let (store, index) = test_case();
    index
        .resolve("GEN1")
        .expect("GEN1")
        .as_identifiable()
        .set_property("fuel", "uranium");
    index.flush().expect("flush");

    let reopened = ResourceIndex::open(store, index.network_uuid(), &IndexPrefs::default())
        .expect("reopen");
    let generator = reopened.resolve("GEN1").expect("GEN1");
    assert_eq!(generator.as_identifiable().property("fuel").as_deref(), Some("uranium"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn property_map_round_trips_through_store(
        props in prop::collection::btree_map("[a-z]{1,8}", "[ -~]{0,16}", 0..8)
    ) {
        let (store, index) = test_case();
        let line = index.resolve("L1").expect("L1");
        for (k, v) in &props {
            line.as_identifiable().set_property(k, v);
        }
        index.flush().expect("flush");

        let reopened = ResourceIndex::open(store, index.network_uuid(), &IndexPrefs::default())
            .expect("reopen");
        let line = reopened.resolve("L1").expect("L1");
        let line = line.as_identifiable();
        prop_assert_eq!(line.has_properties(), !props.is_empty());
        let back: BTreeMap<String, String> = line
            .property_names()
            .into_iter()
            .filter_map(|k| line.property(&k).map(|v| (k, v)))
            .collect();
        prop_assert_eq!(back, props);
    }
}

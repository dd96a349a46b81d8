// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::expect_used, clippy::panic, clippy::float_cmp)]
use std::sync::{Arc, Barrier};
use std::thread;

use netstore_app_core::prefs::IndexPrefs;
use netstore_client::{
    Connectable, Equipment, Identifiable, IndexError, LoadView, ResourceIndex, StoreError,
    SubstationView,
};
use netstore_dry_tests::{init_test_tracing, init_tracing, network_test_case, ScriptedStore};
use netstore_model::{LoadAttributes, Resource, ResourceType, SubstationAttributes};

fn fresh() -> (Arc<ScriptedStore>, Arc<ResourceIndex>) {
    init_test_tracing();
    let store = Arc::new(ScriptedStore::new());
    let built = network_test_case(store.clone()).expect("build test case");
    built.flush().expect("flush test case");
    let index = ResourceIndex::open(store.clone(), built.network_uuid(), &IndexPrefs::default())
        .expect("reopen");
    store.reset_counts();
    (store, index)
}

#[test]
fn repeated_lookups_return_the_same_view() {
    let (_, index) = fresh();
    let a = index.resolve("LOAD1").expect("first");
    let b = index.resolve("LOAD1").expect("second");
    assert!(a.ptr_eq(&b));

    let typed = index.resolve_as::<LoadView>("LOAD1").expect("typed");
    let listed = index.views::<LoadView>().expect("listed");
    assert!(Arc::ptr_eq(&typed, &listed[0]));

    let via_network = index.network().load("LOAD1").expect("via network");
    assert!(Arc::ptr_eq(&typed, &via_network));
}

#[test]
fn racing_first_lookups_agree_on_one_view() {
    const THREADS: usize = 8;
    for _ in 0..20 {
        let (_, index) = fresh();
        assert!(!index.is_cached("LOAD1"));
        let barrier = Barrier::new(THREADS);
        let views: Vec<Equipment> = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        index.resolve("LOAD1").expect("resolve")
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("resolver thread"))
                .collect()
        });
        let winner = index.resolve("LOAD1").expect("cached");
        assert!(views.iter().all(|view| view.ptr_eq(&winner)));
    }
}

#[test]
fn cache_hit_skips_the_store() {
    let (store, index) = fresh();
    index.resolve("GEN1").expect("resolve");
    index.resolve("GEN1").expect("resolve again");
    assert_eq!(store.fetch_count(), 1);
    assert!(index.is_cached("GEN1"));
}

#[test]
fn kind_listing_fetches_once() {
    let (store, index) = fresh();
    index.resolve_by_kind(ResourceType::Line).expect("first");
    index.resolve_by_kind(ResourceType::Line).expect("second");
    assert_eq!(store.kind_fetch_count(), 1);
}

#[test]
fn unknown_id_is_not_found() {
    let (_, index) = fresh();
    let err = index.resolve("NOPE").expect_err("absent");
    assert!(err.is_not_found());
    assert!(matches!(err, IndexError::NotFound { ref id } if id == "NOPE"));
}

#[test]
fn wrong_kind_is_not_found() {
    let (_, index) = fresh();
    let err = index.resolve_as::<SubstationView>("LOAD1").expect_err("load is no substation");
    assert!(err.is_not_found());
}

#[test]
fn store_failures_pass_through_but_cache_still_serves() {
    let (store, index) = fresh();
    let cached = index.resolve("S1").expect("warm");
    store.set_fail_on_fetch(true);

    let err = index.resolve("S2").expect_err("store down");
    assert!(matches!(err, IndexError::Store(StoreError::Unavailable(_))));
    assert!(!err.is_not_found());

    let again = index.resolve("S1").expect("served from cache");
    assert!(cached.ptr_eq(&again));
}

#[test]
fn kind_listing_keeps_discovery_order() {
    let (_, index) = fresh();
    index.resolve("S2").expect("touch S2 first");
    let seq = index.resolve_by_kind(ResourceType::Substation).expect("list");
    assert_eq!(seq.ids(), ["S2", "S1"]);

    let first: Vec<String> = seq.iter().map(|v| v.id().to_owned()).collect();
    let second: Vec<String> = seq.iter().map(|v| v.id().to_owned()).collect();
    assert_eq!(first, second);

    let s2 = index.resolve("S2").expect("cached");
    assert!(seq.iter().next().is_some_and(|v| v.ptr_eq(&s2)));
}

#[test]
fn invalidated_ids_stay_unresolvable_until_recreated() {
    let (_, index) = fresh();
    let old = index.resolve_as::<LoadView>("LOAD1").expect("load");
    let seq = index.resolve_by_kind(ResourceType::Load).expect("list");

    assert!(index.invalidate("LOAD1"));
    assert!(!index.invalidate("LOAD1"));
    assert!(index.resolve("LOAD1").expect_err("tombstoned").is_not_found());
    assert_eq!(seq.iter().count(), 0);
    // the detached handle still reads its own copy
    assert_eq!(old.p0(), 600.0);

    let vl1 = index.network().voltage_level("VL1").expect("vl1");
    let fresh_load = vl1
        .new_load(
            "LOAD1",
            LoadAttributes {
                node: Some(7),
                p0: 10.0,
                ..LoadAttributes::new("VL1")
            },
        )
        .expect("recreate");
    assert!(!Arc::ptr_eq(&old, &fresh_load));
    let resolved = index.resolve_as::<LoadView>("LOAD1").expect("resolvable again");
    assert!(Arc::ptr_eq(&resolved, &fresh_load));
}

#[test]
fn network_root_is_pinned() {
    let (_, index) = fresh();
    let root = index.network().id().to_owned();
    assert!(!index.invalidate(&root));
    assert!(index.resolve(&root).is_ok());
    assert!(index.remove(&root).expect_err("root").is_invariant_violation());
}

#[test]
fn duplicate_ids_are_rejected() {
    let (_, index) = fresh();
    let err = index
        .create(Resource::new("S1", SubstationAttributes::default()))
        .expect_err("duplicate");
    assert!(err.is_invariant_violation());

    // not cached yet, but present in the store
    assert!(!index.is_cached("S2"));
    let err = index
        .network()
        .new_substation("S2", SubstationAttributes::default())
        .expect_err("stored duplicate");
    assert!(err.is_invariant_violation());
}

#[test]
fn remove_deletes_from_store_and_cache() {
    let (store, index) = fresh();
    let load = index.resolve_as::<LoadView>("LOAD1").expect("load");
    load.remove().expect("remove");
    assert!(!index.is_cached("LOAD1"));
    assert!(index.resolve("LOAD1").expect_err("gone").is_not_found());
    assert!(index.remove("LOAD1").expect_err("twice").is_not_found());

    let reopened = ResourceIndex::open(store.clone(), index.network_uuid(), &IndexPrefs::default())
        .expect("reopen");
    assert!(reopened.resolve("LOAD1").expect_err("deleted").is_not_found());
}

#[test]
fn remove_surfaces_store_failures() {
    let (store, index) = fresh();
    store.set_fail_on_delete(true);
    let err = index.remove("GEN1").expect_err("delete fails");
    assert!(matches!(err, IndexError::Store(_)));
    store.set_fail_on_delete(false);
    assert!(index.resolve("GEN1").is_ok());
}

#[test]
fn preload_fills_the_cache() {
    let prefs = IndexPrefs::preloading([ResourceType::Substation, ResourceType::Load]);
    init_tracing(&prefs);
    let store = Arc::new(ScriptedStore::new());
    let built = network_test_case(store.clone()).expect("build");
    let index = ResourceIndex::open(store.clone(), built.network_uuid(), &prefs).expect("open");
    assert!(index.is_cached("S1"));
    assert!(index.is_cached("LOAD1"));
    assert!(!index.is_cached("GEN1"));
    // network + 2 substations + 1 load
    assert_eq!(index.cached_len(), 4);
}

#[test]
fn opening_a_missing_network_is_not_found() {
    init_test_tracing();
    let store = Arc::new(ScriptedStore::new());
    let err = ResourceIndex::open(store, uuid::Uuid::nil(), &IndexPrefs::default())
        .expect_err("nothing stored");
    assert!(err.is_not_found());
}

#[test]
fn identifiable_lookup_covers_every_kind() {
    let (_, index) = fresh();
    let network = index.network();
    for id in ["S1", "VL1", "BBS1", "LOAD1", "GEN1", "BRK1", "L1", "TWT1"] {
        let found: Equipment = network.identifiable(id).expect(id);
        assert_eq!(found.id(), id);
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::expect_used, clippy::panic, clippy::float_cmp)]
use std::sync::Arc;

use netstore_app_core::prefs::IndexPrefs;
use netstore_client::{MemoryStore, ResourceIndex, TwoWindingsTransformerView};
use netstore_dry_tests::{fixtures, init_test_tracing, network_test_case};
use netstore_model::PhaseRegulationMode;

fn transformer() -> (Arc<MemoryStore>, Arc<ResourceIndex>, Arc<TwoWindingsTransformerView>) {
    init_test_tracing();
    let store = Arc::new(MemoryStore::new());
    let index = network_test_case(store.clone()).expect("build test case");
    let twt = index
        .resolve_as::<TwoWindingsTransformerView>("TWT1")
        .expect("TWT1");
    (store, index, twt)
}

#[test]
fn phase_tap_changer_reads_nested_steps() {
    let (_, _, twt) = transformer();
    let ptc = twt.phase_tap_changer().expect("phase changer");
    assert_eq!(ptc.low_tap_position().expect("low"), -1);
    assert_eq!(ptc.high_tap_position().expect("high"), 1);
    assert_eq!(ptc.tap_position().expect("tap"), 0);
    assert_eq!(ptc.step_count().expect("count"), 3);
    assert!(ptc.is_regulating().expect("regulating"));
    assert_eq!(ptc.regulation_mode().expect("mode"), PhaseRegulationMode::CurrentLimiter);
    assert_eq!(ptc.regulation_value().expect("value"), 25.0);
    assert_eq!(ptc.target_deadband().expect("deadband"), 22.0);

    let alphas: Vec<f64> = ptc
        .steps()
        .expect("steps")
        .iter()
        .map(|s| s.alpha().expect("alpha"))
        .collect();
    assert_eq!(alphas, [-10.0, 0.0, 10.0]);

    let current = ptc.current_step().expect("current");
    assert_eq!(current.position(), 0);
    assert_eq!(current.rho().expect("rho"), 1.0);
    assert_eq!(current.x().expect("x"), 4.1);
    assert_eq!(
        ptc.step(-1).expect("low step").attributes().expect("attrs"),
        fixtures::phase_tap_changer().steps[0]
    );
}

#[test]
fn positions_outside_the_range_are_rejected() {
    let (_, _, twt) = transformer();
    let rtc = twt.ratio_tap_changer().expect("ratio changer");
    assert!(rtc.step(2).expect_err("past high").is_invariant_violation());
    assert!(rtc.step(-2).expect_err("below low").is_invariant_violation());
    assert!(rtc.set_tap_position(5).is_err());
    assert_eq!(rtc.tap_position().expect("unchanged"), 0);
}

#[test]
fn step_edits_write_through_and_persist() {
    let (store, index, twt) = transformer();
    {
        let ptc = twt.phase_tap_changer().expect("phase changer");
        ptc.set_tap_position(1).expect("tap");
        ptc.step(1).expect("step").set_x(5.0).expect("x");
        ptc.set_regulation_mode(PhaseRegulationMode::FixedTap).expect("mode");

        let rtc = twt.ratio_tap_changer().expect("ratio changer");
        rtc.step(-1).expect("step").set_rho(0.95).expect("rho");
        rtc.set_target_v(230.0).expect("target");
    }

    // another handle on the same view sees the edit before any flush
    let same = index
        .resolve_as::<TwoWindingsTransformerView>("TWT1")
        .expect("TWT1");
    let ptc = same.phase_tap_changer().expect("phase changer");
    assert_eq!(ptc.current_step().expect("current").x().expect("x"), 5.0);

    index.flush().expect("flush");
    let reopened = ResourceIndex::open(store, index.network_uuid(), &IndexPrefs::default())
        .expect("reopen");
    let twt = reopened
        .resolve_as::<TwoWindingsTransformerView>("TWT1")
        .expect("TWT1");
    let ptc = twt.phase_tap_changer().expect("phase changer");
    assert_eq!(ptc.tap_position().expect("tap"), 1);
    assert_eq!(ptc.step(1).expect("step").x().expect("x"), 5.0);
    assert_eq!(ptc.regulation_mode().expect("mode"), PhaseRegulationMode::FixedTap);
    let rtc = twt.ratio_tap_changer().expect("ratio changer");
    assert_eq!(rtc.step(-1).expect("step").rho().expect("rho"), 0.95);
    assert_eq!(rtc.target_v().expect("target"), 230.0);
    assert!(rtc.has_load_tap_changing_capabilities().expect("ltc"));
}

#[test]
fn cleared_changer_handles_go_stale() {
    let (_, _, twt) = transformer();
    let rtc = twt.ratio_tap_changer().expect("ratio changer");
    let step = rtc.step(0).expect("step");
    twt.set_ratio_tap_changer(None);

    assert!(twt.ratio_tap_changer().is_none());
    assert!(rtc.tap_position().expect_err("stale").is_invariant_violation());
    assert!(step.set_r(9.0).expect_err("stale").is_invariant_violation());
    assert!(twt.phase_tap_changer().is_some());
}

#[test]
fn replacing_a_changer_resets_its_steps() {
    let (_, _, twt) = transformer();
    let mut shorter = fixtures::ratio_tap_changer();
    shorter.steps.truncate(2);
    twt.set_ratio_tap_changer(Some(shorter));
    let rtc = twt.ratio_tap_changer().expect("ratio changer");
    assert_eq!(rtc.high_tap_position().expect("high"), 0);
    assert!(rtc.step(1).is_err());
}

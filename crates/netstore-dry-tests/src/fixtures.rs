// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reference network built through the public index API.
//!
//! Layout:
//!
//! ```text
//! S1 (FR)                                  S2 (FR)
//! ├── VL1 380kV node-breaker               └── VL2 380kV node-breaker
//! │   ├── BBS1 "B1" node 0, position 1/1       └── BBS2 node 0
//! │   ├── BRK1 breaker 0-1
//! │   ├── LOAD1 node 1, feeder "LOAD1"
//! │   └── GEN1 node 2
//! ├── VL3 225kV node-breaker
//! │   └── BBS3 node 0
//! └── TWT1 VL1 node 3 / VL3 node 1, phase + ratio tap changers
//! L1 VL1 node 4 / VL2 node 1
//! ```

use std::sync::Arc;

use netstore_app_core::prefs::IndexPrefs;
use netstore_client::{
    BundleStore, BusbarSectionPosition, BusbarSectionView, ConnectablePosition, Extendable,
    Feeder, IndexError, ResourceIndex,
};
use netstore_model::{
    BusbarSectionAttributes, Direction, EnergySource, GeneratorAttributes, LineAttributes,
    LoadAttributes, NetworkAttributes, PhaseRegulationMode, PhaseTapChangerAttributes,
    PhaseTapChangerStepAttributes, RatioTapChangerAttributes, RatioTapChangerStepAttributes,
    Resource, SubstationAttributes, SwitchAttributes, SwitchKind, TopologyKind,
    TwoWindingsTransformerAttributes,
};
use uuid::Uuid;

/// Id of the network root.
pub const NETWORK_ID: &str = "networkTestCase";

/// 2016-06-29T14:54:03.427+02:00 in epoch milliseconds.
pub const CASE_DATE: i64 = 1_467_204_843_427;

const ALPHAS: [f64; 3] = [-10.0, 0.0, 10.0];
const RHOS: [f64; 3] = [0.99, 1.0, 1.01];
const RS: [f64; 3] = [1.0, 1.1, 1.2];
const XS: [f64; 3] = [4.0, 4.1, 4.2];
const GS: [f64; 3] = [0.5, 0.6, 0.7];
const BS: [f64; 3] = [1.5, 1.6, 1.7];

/// Phase tap changer with positions -1..=1, regulating as a current limiter.
pub fn phase_tap_changer() -> PhaseTapChangerAttributes {
    PhaseTapChangerAttributes {
        low_tap_position: -1,
        tap_position: 0,
        regulation_mode: PhaseRegulationMode::CurrentLimiter,
        regulation_value: 25.0,
        regulating: true,
        target_deadband: 22.0,
        steps: (0..3)
            .map(|i| PhaseTapChangerStepAttributes {
                rho: RHOS[i],
                r: RS[i],
                x: XS[i],
                g: GS[i],
                b: BS[i],
                alpha: ALPHAS[i],
            })
            .collect(),
    }
}

/// Ratio tap changer with positions -1..=1, regulating on voltage.
pub fn ratio_tap_changer() -> RatioTapChangerAttributes {
    RatioTapChangerAttributes {
        low_tap_position: -1,
        tap_position: 0,
        load_tap_changing_capabilities: true,
        regulating: true,
        target_v: 225.0,
        target_deadband: 22.0,
        steps: (0..3)
            .map(|i| RatioTapChangerStepAttributes {
                rho: RHOS[i],
                r: RS[i],
                x: XS[i],
                g: GS[i],
                b: BS[i],
            })
            .collect(),
    }
}

/// Builds the reference network in `store` under a fresh uuid and returns
/// its index. Nothing is flushed; call [`ResourceIndex::flush`] to persist
/// view edits made after creation.
///
/// # Errors
///
/// Store errors pass through.
pub fn network_test_case(store: Arc<dyn BundleStore>) -> Result<Arc<ResourceIndex>, IndexError> {
    let mut root = NetworkAttributes::new(Uuid::new_v4(), CASE_DATE);
    root.source_format = Some("test".to_owned());
    let index = ResourceIndex::create_network(store, Resource::new(NETWORK_ID, root), &IndexPrefs::default())?;
    let network = index.network();

    let s1 = network.new_substation(
        "S1",
        SubstationAttributes {
            country: Some("FR".to_owned()),
            tso: Some("RTE".to_owned()),
            ..SubstationAttributes::default()
        },
    )?;
    let vl1 = s1.new_voltage_level("VL1", 380.0, TopologyKind::NodeBreaker)?;
    let vl3 = s1.new_voltage_level("VL3", 225.0, TopologyKind::NodeBreaker)?;

    let s2 = network.new_substation(
        "S2",
        SubstationAttributes {
            country: Some("FR".to_owned()),
            ..SubstationAttributes::default()
        },
    )?;
    let vl2 = s2.new_voltage_level("VL2", 380.0, TopologyKind::NodeBreaker)?;

    let bbs1 = index.create_as::<BusbarSectionView>(Resource::new(
        "BBS1",
        BusbarSectionAttributes {
            name: Some("B1".to_owned()),
            ..BusbarSectionAttributes::new("VL1", 0)
        },
    ))?;
    bbs1.add_extension(BusbarSectionPosition::new(1, 1).into());
    vl2.new_busbar_section("BBS2", 0)?;
    vl3.new_busbar_section("BBS3", 0)?;

    vl1.new_switch("BRK1", SwitchAttributes::between_nodes("VL1", SwitchKind::Breaker, 0, 1))?;

    let load = vl1.new_load(
        "LOAD1",
        LoadAttributes {
            node: Some(1),
            p0: 600.0,
            q0: 200.0,
            ..LoadAttributes::new("VL1")
        },
    )?;
    load.add_extension(
        ConnectablePosition::single(
            Feeder::new("LOAD1").with_order(1).with_direction(Direction::Top),
        )
        .into(),
    );

    vl1.new_generator(
        "GEN1",
        GeneratorAttributes {
            node: Some(2),
            energy_source: EnergySource::Nuclear,
            min_p: 0.0,
            max_p: 1000.0,
            voltage_regulator_on: true,
            target_p: 500.0,
            target_v: 390.0,
            ..GeneratorAttributes::new("VL1")
        },
    )?;

    s1.new_two_windings_transformer(
        "TWT1",
        TwoWindingsTransformerAttributes {
            node1: Some(3),
            node2: Some(1),
            r: 0.5,
            x: 10.0,
            phase_tap_changer: Some(phase_tap_changer()),
            ratio_tap_changer: Some(ratio_tap_changer()),
            ..TwoWindingsTransformerAttributes::new("VL1", "VL3", 380.0, 225.0)
        },
    )?;

    network.new_line(
        "L1",
        LineAttributes {
            node1: Some(4),
            node2: Some(1),
            r: 1.0,
            x: 12.0,
            ..LineAttributes::new("VL1", "VL2")
        },
    )?;

    Ok(index)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use netstore_client::{Identifiable, MemoryStore};

    #[test]
    fn builds_every_kind() {
        let store = Arc::new(MemoryStore::new());
        let index = network_test_case(store.clone()).unwrap();
        let network = index.network();
        assert_eq!(network.id(), NETWORK_ID);
        assert_eq!(network.case_date(), CASE_DATE);
        assert_eq!(network.substations().unwrap().len(), 2);
        assert_eq!(network.voltage_levels().unwrap().len(), 3);
        assert_eq!(network.busbar_sections().unwrap().len(), 3);
        assert_eq!(network.lines().unwrap().len(), 1);
        assert_eq!(network.two_windings_transformers().unwrap().len(), 1);
        // 1 network + 2 substations + 3 voltage levels + 3 sections
        // + switch + load + generator + transformer + line
        assert_eq!(store.len(index.network_uuid()), 14);
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! netstore-model: attribute bundles for network store equipment.
//!
//! Every piece of equipment is persisted as a flat [`Resource`]: an id, a
//! [`ResourceType`] tag and a kind-specific attribute record. Optional
//! metadata (positions, tap changers) lives in nested sub-records of the
//! attributes rather than as separate resources.
//!
//! Bundles encode as `{"type": ..., "id": ..., "attributes": {...}}`. Optional
//! fields that are unset are omitted from the encoding and decode back to
//! absent, never to a zero value.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::use_self
)]

#[macro_use]
mod macros;

mod any;
mod branch;
mod container;
mod float;
mod injection;
mod position;
mod properties;
mod resource;

pub use any::AnyResource;
pub use branch::{
    BranchAttributes, LineAttributes, PhaseRegulationMode, PhaseTapChangerAttributes,
    PhaseTapChangerStepAttributes, RatioTapChangerAttributes, RatioTapChangerStepAttributes,
    Side, SwitchAttributes, SwitchKind, TwoWindingsTransformerAttributes,
};
pub use container::{
    NetworkAttributes, SubstationAttributes, TopologyKind, VoltageLevelAttributes,
};
pub use injection::{
    BusbarSectionAttributes, EnergySource, GeneratorAttributes, InjectionAttributes,
    LoadAttributes, LoadType,
};
pub use position::{BusbarSectionPositionAttributes, ConnectablePositionAttributes, Direction};
pub use properties::PropertyMap;
pub use resource::{IdentifiableAttributes, ModelError, Resource, ResourceType};

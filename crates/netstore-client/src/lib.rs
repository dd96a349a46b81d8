// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! netstore-client: identity-mapped views over a network bundle store.
//!
//! A [`ResourceIndex`] caches one typed view per element id. Views read and
//! write their attribute bundle in place; [`ResourceIndex::flush`] writes
//! every cached bundle back through the [`BundleStore`] port.
//!
//! ```text
//! BundleStore ──fetch──▶ AnyResource ──Equipment::build──▶ view (cached by id)
//!      ▲                                                      │
//!      └───────────────────────── flush ◀── snapshot ─────────┘
//! ```
//!
//! Positional extensions are never stored separately: they flatten into
//! optional slots of their owner's attributes and are rebuilt on read.
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
    clippy::missing_errors_doc,
    clippy::use_self
)]

mod equipment;
mod error;
mod extension;
mod index;
mod memory;
mod store;
mod sync;
mod terminal;
mod view;

pub use equipment::{Equipment, View};
pub use error::{IndexError, UnsupportedReason};
pub use extension::{
    BusbarSectionPosition, ConnectablePosition, Extension, ExtensionData, ExtensionKind, Feeder,
    SlotCodec,
};
pub use index::{ResourceIndex, ViewSeq};
pub use memory::MemoryStore;
pub use store::{BundleStore, StoreError};
pub use terminal::{Terminal, TerminalAdapter};
pub use view::{
    BundleView, BusbarSectionView, Connectable, Extendable, GeneratorView, Identifiable,
    LineView, LoadView, NetworkView, PhaseTapChanger, PhaseTapChangerStep, RatioTapChanger,
    RatioTapChangerStep, SubstationView, SwitchView, TwoWindingsTransformerView, ViewCore,
    VoltageLevelView,
};

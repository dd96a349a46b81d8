// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for netstore crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`store`] - Bundle store wrapper with call counts and failure injection
//! - [`fixtures`] - Reference network built through the public index API
//! - [`logging`] - Test tracing subscriber

pub mod config;
pub mod fixtures;
pub mod logging;
pub mod store;

pub use config::{ConfigCall, InMemoryConfigStore};
pub use fixtures::{network_test_case, CASE_DATE, NETWORK_ID};
pub use logging::{init_test_tracing, init_tracing};
pub use store::ScriptedStore;

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for netstore tools (config, index prefs).
//! Keeps storage adapters thin and framework-agnostic.

pub mod config;
pub mod config_port;
pub mod prefs;

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tracing subscriber for tests.

use netstore_app_core::prefs::{IndexPrefs, DEFAULT_LOG_FILTER};
use tracing_subscriber::EnvFilter;

/// Filter described by `prefs.log_filter`, or [`DEFAULT_LOG_FILTER`] when
/// that directive does not parse.
pub fn prefs_filter(prefs: &IndexPrefs) -> EnvFilter {
    EnvFilter::try_new(&prefs.log_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs a test-writer fmt subscriber filtered by `RUST_LOG`, falling
/// back to the filter saved in `prefs`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing(prefs: &IndexPrefs) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| prefs_filter(prefs));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// [`init_tracing`] with default preferences.
pub fn init_test_tracing() {
    init_tracing(&IndexPrefs::default());
}

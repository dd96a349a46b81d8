// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved preferences for opening a resource index.

use netstore_model::ResourceType;
use serde::{Deserialize, Serialize};

/// Config key under which [`IndexPrefs`] are stored.
pub const INDEX_PREFS_KEY: &str = "index";

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "netstore=info";

/// How a resource index is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexPrefs {
    /// Kinds fetched eagerly when the index opens.
    pub preload: Vec<ResourceType>,
    /// Tracing filter directive (`RUST_LOG` syntax).
    pub log_filter: String,
}

impl Default for IndexPrefs {
    fn default() -> Self {
        Self {
            preload: Vec::new(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl IndexPrefs {
    /// Prefs that preload `kinds`.
    pub fn preloading(kinds: impl IntoIterator<Item = ResourceType>) -> Self {
        Self {
            preload: kinds.into_iter().collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let prefs: IndexPrefs = serde_json::from_str(r#"{"preload":["LOAD"]}"#).unwrap();
        assert_eq!(prefs.preload, vec![ResourceType::Load]);
        assert_eq!(prefs.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn encodes_with_camel_case_keys() {
        let prefs = IndexPrefs::preloading([ResourceType::VoltageLevel]);
        let json = serde_json::to_string(&prefs).unwrap();
        assert_eq!(
            json,
            r#"{"preload":["VOLTAGE_LEVEL"],"logFilter":"netstore=info"}"#
        );
    }
}

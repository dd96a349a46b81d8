// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service and storage port for netstore tools.
//!
//! Values are JSON documents stored as raw blobs under a logical key. The
//! [`ConfigStore`] port only moves bytes; [`ConfigService`] owns encoding.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Byte-level storage for config documents, keyed by logical name.
pub trait ConfigStore {
    /// Raw document for `key`, or [`ConfigError::NotFound`].
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replaces the document for `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Config failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No document under the key.
    #[error("config key not found")]
    NotFound,
    /// Filesystem failure in a store adapter.
    #[error("config i/o: {0}")]
    Io(#[from] std::io::Error),
    /// Document is not valid JSON for the requested type.
    #[error("config encoding: {0}")]
    Serde(#[from] serde_json::Error),
    /// Store-specific failure.
    #[error("config store: {0}")]
    Other(String),
}

/// JSON encoding layer over a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wraps `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwraps the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Decodes the document under `key`.
    ///
    /// A missing key and an empty document both read as `Ok(None)`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(ConfigError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// [`load`](Self::load) with `T::default()` for a missing document.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, ConfigError> {
        self.load(key).map(Option::unwrap_or_default)
    }

    /// Encodes `value` as pretty JSON under `key`.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        self.store.save_raw(key, &serde_json::to_vec_pretty(value)?)
    }
}

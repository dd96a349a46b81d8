// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` for netstore tools.
//!
//! Each key maps to `<base>/<key>.json`. Writes go to a sibling temp file
//! first and are renamed into place, so a reader never sees half a document.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use netstore_app_core::config::{ConfigError, ConfigStore};

/// JSON config files under one base directory.
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Store under the platform config directory (`~/.config/netstore` on Linux).
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("dev", "flyingrobots", "netstore")
            .ok_or_else(|| ConfigError::Other("no home directory for config".into()))?;
        Self::with_base(dirs.config_dir())
    }

    /// Store under `base`, created if missing.
    pub fn with_base(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        fs::create_dir_all(base.as_ref())?;
        Ok(Self {
            base: base.as_ref().to_path_buf(),
        })
    }

    /// Base directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    // Keys are flat names; anything that could escape `base` is refused.
    fn path_for(&self, key: &str) -> Result<PathBuf, ConfigError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ConfigError::Other(format!("invalid config key '{key}'")));
        }
        Ok(self.base.join(format!("{key}.json")))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        fs::read(self.path_for(key)?).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::Io(err),
        })
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");
        fs::create_dir_all(&self.base)?;
        fs::write(&staging, data)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use netstore_app_core::config::ConfigService;
    use netstore_app_core::config_port::PrefsPort;
    use netstore_app_core::prefs::IndexPrefs;
    use netstore_model::ResourceType;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::with_base(dir.path()).unwrap();
        assert!(matches!(store.load_raw("absent"), Err(ConfigError::NotFound)));
    }

    #[test]
    fn creates_nested_base_directory() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("a").join("b");
        let store = FsConfigStore::with_base(&base).unwrap();
        assert!(base.is_dir());
        assert_eq!(store.base(), base.as_path());
    }

    #[test]
    fn prefs_persist_as_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(FsConfigStore::with_base(dir.path()).unwrap());
        let prefs = IndexPrefs::preloading([ResourceType::Line]);
        service.save_prefs(&prefs);

        let raw = fs::read_to_string(dir.path().join("index.json")).unwrap();
        assert!(raw.contains("\"LINE\""));

        let reopened = ConfigService::new(FsConfigStore::with_base(dir.path()).unwrap());
        assert_eq!(reopened.load_prefs(), Some(prefs));
        assert!(!dir.path().join("index.json.tmp").exists());
    }

    #[test]
    fn keys_cannot_leave_the_base() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::with_base(dir.path()).unwrap();
        for key in ["", "../index", "a/b", ".hidden"] {
            assert!(matches!(store.save_raw(key, b"{}"), Err(ConfigError::Other(_))));
            assert!(matches!(store.load_raw(key), Err(ConfigError::Other(_))));
        }
    }

    #[test]
    fn save_replaces_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::with_base(dir.path()).unwrap();
        store.save_raw("index", b"{\"preload\":[]}").unwrap();
        store.save_raw("index", b"{}").unwrap();
        assert_eq!(store.load_raw("index").unwrap(), b"{}");
    }
}

// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory-backed key-value store: one file per key.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use textrack_core::{AdapterType, HealthStatus, KeyValueStore, PluginAdapter, TextrackError};

/// Stores each key as a file named after the key inside `dir`.
///
/// Writes go to a temp file in the same directory which is then renamed
/// over the target, so a reader never observes a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, TextrackError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(TextrackError::storage)?;
        debug!(dir = %dir.display(), "file store opened");
        Ok(Self { dir })
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, TextrackError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(TextrackError::storage(format!("invalid store key `{key}`")));
        }
        Ok(self.dir.join(key))
    }
}

#[async_trait]
impl PluginAdapter for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, TextrackError> {
        match std::fs::metadata(&self.dir) {
            Ok(meta) if meta.permissions().readonly() => Ok(HealthStatus::Degraded(format!(
                "{} is read-only",
                self.dir.display()
            ))),
            Ok(meta) if meta.is_dir() => Ok(HealthStatus::Healthy),
            Ok(_) => Ok(HealthStatus::Unhealthy(format!(
                "{} is not a directory",
                self.dir.display()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "{}: {e}",
                self.dir.display()
            ))),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, TextrackError> {
        let path = self.key_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => {
                debug!(key, bytes = value.len(), "store read");
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TextrackError::storage(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TextrackError> {
        let path = self.key_path(key)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(TextrackError::storage)?;
        tmp.write_all(value.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(TextrackError::storage)?;
        tmp.persist(&path)
            .map_err(|e| TextrackError::storage(e.error))?;
        debug!(key, bytes = value.len(), "store write");
        Ok(())
    }
}

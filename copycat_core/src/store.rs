use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{AccountRecord, Field};

/// username -> record, persisted as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    accounts: BTreeMap<String, AccountRecord>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
        }
    }

    /// Read the whole store. A missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No cache at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(Error::IOError(path.to_path_buf(), e)),
        };
        let store: Store = serde_json::from_str(&content).map_err(|e| Error::JSONError(path.to_path_buf(), e))?;
        tracing::info!("Loaded {} accounts from {}", store.len(), path.display());
        Ok(store)
    }

    /// Write the whole store, replacing the file.
    ///
    /// The document is pretty-printed with four-space indentation and
    /// non-ASCII text is written as is.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut content = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut content, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)
            .map_err(|e| Error::JSONError(path.to_path_buf(), e))?;

        // Write next to the target first so a failed write leaves the old file intact
        let temp_path = temp_path(path);
        std::fs::write(&temp_path, &content).map_err(|e| Error::IOError(temp_path.clone(), e))?;
        std::fs::rename(&temp_path, path).map_err(|e| Error::IOError(path.to_path_buf(), e))?;
        tracing::info!("Saved {} accounts to {}", self.len(), path.display());
        Ok(())
    }

    pub fn has_field(&self, username: &str, field: Field) -> bool {
        self.accounts.get(username).is_some_and(|r| r.has(field))
    }

    pub fn get(&self, username: &str) -> Option<&AccountRecord> {
        self.accounts.get(username)
    }

    /// Record of `username`, created empty if absent.
    pub fn record_mut(&mut self, username: &str) -> &mut AccountRecord {
        self.accounts.entry(username.to_string()).or_default()
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

//! In-memory project storage with an optional byte quota.
//!
//! Behaves like a browser `localStorage` area: string keys, string values,
//! writes rejected once the total size would exceed the quota, and the whole
//! area can become unavailable.

use crate::model::project::{Project, ProjectId};
use crate::repo::project_repo::{
    decode_readable, encode_project, ProjectStorage, StorageError, StorageResult,
};

/// Key-value project storage kept in process memory.
#[derive(Debug, Clone)]
pub struct MemoryProjectStorage {
    entries: Vec<(String, String)>,
    quota_bytes: Option<usize>,
    available: bool,
}

impl Default for MemoryProjectStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProjectStorage {
    /// Unlimited, available storage.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            quota_bytes: None,
            available: true,
        }
    }

    /// Storage that rejects writes growing it past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::new()
        }
    }

    pub fn set_quota(&mut self, quota_bytes: Option<usize>) {
        self.quota_bytes = quota_bytes;
    }

    /// Unavailable storage fails every operation with `Unavailable`.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total stored key and value bytes.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    /// Raw stored JSON for a project, if present.
    pub fn raw_entry(&self, id: ProjectId) -> Option<&str> {
        let key = id.to_string();
        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Stores raw text under a key, bypassing encoding and quota.
    ///
    /// Lets callers seed legacy or corrupted entries.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    fn ensure_available(&self) -> StorageResult<()> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::Unavailable)
        }
    }
}

impl ProjectStorage for MemoryProjectStorage {
    fn save_project(&mut self, project: &Project) -> StorageResult<()> {
        self.ensure_available()?;

        let key = project.id.to_string();
        let value = encode_project(project)?;

        if let Some(quota) = self.quota_bytes {
            let others: usize = self
                .entries
                .iter()
                .filter(|(existing, _)| *existing != key)
                .map(|(existing, stored)| existing.len() + stored.len())
                .sum();
            let required = others + key.len() + value.len();
            if required > quota {
                return Err(StorageError::QuotaExceeded { required, quota });
            }
        }

        self.insert_raw(key, value);
        Ok(())
    }

    fn remove_project(&mut self, id: ProjectId) -> StorageResult<()> {
        self.ensure_available()?;
        let key = id.to_string();
        self.entries.retain(|(existing, _)| *existing != key);
        Ok(())
    }

    fn retrieve_all_projects(&self) -> StorageResult<Vec<Project>> {
        self.ensure_available()?;
        Ok(decode_readable(
            "memory",
            self.entries
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        ))
    }
}

//! Key-value store contract and in-memory implementation.
//!
//! # Responsibility
//! - Define the narrow text key-value seam the storage gateway writes through.
//! - Provide a volatile store with an optional byte quota.
//!
//! # Invariants
//! - A failed write leaves the previous value for that key intact.
//! - Removing an absent key is not an error.

use crate::db::DbError;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a key-value backend.
#[derive(Debug)]
pub enum StoreError {
    /// Write would push total stored bytes over the configured quota.
    QuotaExceeded {
        key: String,
        requested_bytes: usize,
        quota_bytes: usize,
    },
    /// Record could not be encoded as JSON text.
    Serialize(serde_json::Error),
    /// Underlying database failure.
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                key,
                requested_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {requested_bytes} bytes requested, quota {quota_bytes}"
            ),
            Self::Serialize(err) => write!(f, "failed to encode record: {err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QuotaExceeded { .. } => None,
            Self::Serialize(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous text key-value storage.
pub trait KvStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&mut self, key: &str) -> StoreResult<()>;
}

/// Volatile store, optionally bounded by a total byte quota.
///
/// Usage is counted as key bytes plus value bytes over all entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Total bytes currently stored.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryKvStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(quota_bytes) = self.quota_bytes {
            let replaced = self
                .entries
                .get(key)
                .map_or(0, |previous| key.len() + previous.len());
            let requested_bytes = self.used_bytes() - replaced + key.len() + value.len();
            if requested_bytes > quota_bytes {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    requested_bytes,
                    quota_bytes,
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KvStore, MemoryKvStore, StoreError};

    #[test]
    fn set_get_remove_roundtrip() {
        let mut store = MemoryKvStore::new();
        store.set_item("k", "v1").unwrap();
        store.set_item("k", "v2").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v2"));

        store.remove_item("k").unwrap();
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }

    #[test]
    fn quota_rejects_oversized_write_and_keeps_previous_value() {
        let mut store = MemoryKvStore::with_quota(8);
        store.set_item("k", "abc").unwrap();

        let err = store.set_item("k", "abcdefghij").unwrap_err();
        assert!(matches!(
            err,
            StoreError::QuotaExceeded {
                requested_bytes: 11,
                quota_bytes: 8,
                ..
            }
        ));
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn quota_counts_replaced_value_only_once() {
        let mut store = MemoryKvStore::with_quota(5);
        store.set_item("k", "1234").unwrap();
        store.set_item("k", "4321").unwrap();
        assert_eq!(store.used_bytes(), 5);
    }
}

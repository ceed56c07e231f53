//! Persistence gateway over a key-value store.
//!
//! # Responsibility
//! - Own JSON serialization of the four board records.
//! - Validate stored records at the read boundary.
//! - Keep storage failures from reaching board callers.
//!
//! # Invariants
//! - Reads never fail: absent, unreadable or invalid records degrade to
//!   `None` / empty lists.
//! - `write_*` operations are best-effort; failures are logged and dropped.
//! - `reset_board` never touches the session records.
//! - Log lines carry keys and error kinds only, never record content.

use crate::model::activity::Activity;
use crate::model::session::Session;
use crate::model::task::Task;
use crate::repo::kv_store::{KvStore, StoreError, StoreResult};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;

const DEFAULT_KEY_PREFIX: &str = "taskboard";
const REMEMBER_TRUE: &str = "true";
const REMEMBER_FALSE: &str = "false";

/// Storage keys for the four board records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub user: String,
    pub remember: String,
    pub tasks: String,
    pub activities: String,
}

impl StorageKeys {
    /// Keys namespaced by `prefix`, e.g. `<prefix>_tasks`.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            user: format!("{prefix}_user"),
            remember: format!("{prefix}_remember"),
            tasks: format!("{prefix}_tasks"),
            activities: format!("{prefix}_activity"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

/// Failure kinds recovered inside the gateway.
#[derive(Debug)]
enum ReadFailure {
    Store(String),
    Corrupt(String),
}

/// Typed façade over a [`KvStore`].
pub struct StorageGateway<S: KvStore> {
    store: S,
    keys: StorageKeys,
}

impl<S: KvStore> StorageGateway<S> {
    /// Creates a gateway with the default `taskboard_*` keys.
    pub fn new(store: S) -> Self {
        Self::with_keys(store, StorageKeys::default())
    }

    pub fn with_keys(store: S, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Returns the stored session marker, if present and valid.
    pub fn read_user(&self) -> Option<Session> {
        let session: Session = self.read_record(&self.keys.user)?;
        if !session.is_valid() {
            warn!(
                "event=storage_read module=storage status=corrupt key={} error_code=invalid_session",
                self.keys.user
            );
            return None;
        }
        Some(session)
    }

    /// Stores the session marker and remember flag. Best-effort.
    pub fn write_user(&mut self, session: &Session, remember: bool) {
        if let Err(err) = self.try_write_user(session, remember) {
            log_write_failure(&self.keys.user, &err);
        }
    }

    /// Fallible variant of [`StorageGateway::write_user`].
    ///
    /// The previous flag is dropped before the marker is written, so a write
    /// that fails partway reads back as not remembered.
    pub fn try_write_user(&mut self, session: &Session, remember: bool) -> StoreResult<()> {
        let text = encode(session)?;
        self.store.remove_item(&self.keys.remember)?;
        self.store.set_item(&self.keys.user, &text)?;
        let flag = if remember {
            REMEMBER_TRUE
        } else {
            REMEMBER_FALSE
        };
        self.store.set_item(&self.keys.remember, flag)
    }

    /// Removes the session marker and remember flag.
    pub fn clear_user(&mut self) {
        for key in [self.keys.user.clone(), self.keys.remember.clone()] {
            if let Err(err) = self.store.remove_item(&key) {
                log_write_failure(&key, &err);
            }
        }
    }

    /// `true` only when the remember flag reads exactly `"true"`.
    pub fn should_remember(&self) -> bool {
        match self.store.get_item(&self.keys.remember) {
            Ok(value) => value.as_deref() == Some(REMEMBER_TRUE),
            Err(err) => {
                warn!(
                    "event=storage_read module=storage status=error key={} error={}",
                    self.keys.remember, err
                );
                false
            }
        }
    }

    /// Returns the stored task list, or an empty list when missing or invalid.
    pub fn read_tasks(&self) -> Vec<Task> {
        let Some(tasks) = self.read_record::<Vec<Task>>(&self.keys.tasks) else {
            return Vec::new();
        };
        if let Err(reason) = validate_tasks(&tasks) {
            warn!(
                "event=storage_read module=storage status=corrupt key={} error_code={}",
                self.keys.tasks, reason
            );
            return Vec::new();
        }
        tasks
    }

    /// Overwrites the stored task list. Best-effort.
    pub fn write_tasks(&mut self, tasks: &[Task]) {
        if let Err(err) = self.try_write_tasks(tasks) {
            log_write_failure(&self.keys.tasks, &err);
        }
    }

    pub fn try_write_tasks(&mut self, tasks: &[Task]) -> StoreResult<()> {
        let text = encode(tasks)?;
        self.store.set_item(&self.keys.tasks, &text)?;
        debug!(
            "event=storage_write module=storage status=ok key={} count={}",
            self.keys.tasks,
            tasks.len()
        );
        Ok(())
    }

    /// Returns the stored activity log, or an empty list when missing or invalid.
    pub fn read_activities(&self) -> Vec<Activity> {
        self.read_record(&self.keys.activities).unwrap_or_default()
    }

    /// Overwrites the stored activity log. Best-effort.
    pub fn write_activities(&mut self, activities: &[Activity]) {
        if let Err(err) = self.try_write_activities(activities) {
            log_write_failure(&self.keys.activities, &err);
        }
    }

    pub fn try_write_activities(&mut self, activities: &[Activity]) -> StoreResult<()> {
        let text = encode(activities)?;
        self.store.set_item(&self.keys.activities, &text)?;
        debug!(
            "event=storage_write module=storage status=ok key={} count={}",
            self.keys.activities,
            activities.len()
        );
        Ok(())
    }

    /// Removes the task list and activity log. Session records stay.
    pub fn reset_board(&mut self) {
        for key in [self.keys.tasks.clone(), self.keys.activities.clone()] {
            if let Err(err) = self.store.remove_item(&key) {
                log_write_failure(&key, &err);
            }
        }
    }

    fn read_record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_read_record(key) {
            Ok(value) => value,
            Err(ReadFailure::Store(message)) => {
                warn!("event=storage_read module=storage status=error key={key} error={message}");
                None
            }
            Err(ReadFailure::Corrupt(message)) => {
                warn!(
                    "event=storage_read module=storage status=corrupt key={key} error={message}"
                );
                None
            }
        }
    }

    fn try_read_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ReadFailure> {
        let Some(text) = self
            .store
            .get_item(key)
            .map_err(|err| ReadFailure::Store(err.to_string()))?
        else {
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| {
                ReadFailure::Corrupt(format!(
                    "{:?} line={} column={}",
                    err.classify(),
                    err.line(),
                    err.column()
                ))
            })
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> StoreResult<String> {
    Ok(serde_json::to_string(value)?)
}

fn validate_tasks(tasks: &[Task]) -> Result<(), &'static str> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.validate().is_err() {
            return Err("invalid_task");
        }
        if !seen.insert(task.id.as_str()) {
            return Err("duplicate_task_id");
        }
    }
    Ok(())
}

fn log_write_failure(key: &str, err: &StoreError) {
    error!("event=storage_write module=storage status=error key={key} error={err}");
}

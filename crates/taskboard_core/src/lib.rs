//! Core domain logic for the task board.
//! This crate is the single source of truth for board invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{Activity, ActivityAction};
pub use model::session::Session;
pub use model::task::{
    parse_tags, Priority, Task, TaskDraft, TaskId, TaskPatch, TaskStatus, TaskValidationError,
};
pub use repo::kv_store::{KvStore, MemoryKvStore, StoreError, StoreResult};
pub use repo::sqlite_kv_store::SqliteKvStore;
pub use repo::storage_gateway::{StorageGateway, StorageKeys};
pub use service::board_query::{compare_due_dates, filter_tasks, BoardQuery};
pub use service::board_service::{BoardError, BoardResult, BoardService};
pub use service::session_service::{
    login, logout, require_session, validate_login_input, Credentials, LoginError,
    DEMO_CREDENTIALS,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

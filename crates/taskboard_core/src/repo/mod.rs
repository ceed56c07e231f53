//! Storage layer: key-value backends and the typed persistence gateway.
//!
//! # Responsibility
//! - Define the key-value contract board storage is written through.
//! - Isolate SQLite and JSON details from board orchestration.
//!
//! # Invariants
//! - Gateway reads never surface storage or decode errors.
//! - Backends report write failures as `StoreError`.

pub mod kv_store;
pub mod sqlite_kv_store;
pub mod storage_gateway;

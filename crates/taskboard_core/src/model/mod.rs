//! Domain model for the task board.
//!
//! # Responsibility
//! - Define canonical data structures used by board business logic.
//! - Keep the persisted JSON shape in one place.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Activities are append-only; deletion is represented by a `Deleted` entry.

pub mod activity;
pub mod session;
pub mod task;

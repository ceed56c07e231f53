//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage gateway calls into board and session use-cases.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod board_query;
pub mod board_service;
pub mod session_service;

//! Persistence layer for projects.
//!
//! # Responsibility
//! - Define the durable storage contract used by the project store.
//! - Provide SQLite and in-memory implementations of that contract.
//!
//! # Invariants
//! - Storage writes are whole-project replacements keyed by project id.
//! - Storage APIs return semantic errors (`QuotaExceeded`, `Unavailable`)
//!   in addition to transport errors.

pub mod memory_repo;
pub mod project_repo;

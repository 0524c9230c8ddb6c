//! Core use-case services.
//!
//! # Responsibility
//! - Own the authoritative project collection and its write-through rules.
//! - Provide the pure sort/filter transforms used by task views.
//!
//! # Invariants
//! - Only `ProjectStore` mutates persisted state.
//! - Service layer remains storage-agnostic through `ProjectStorage`.

pub mod project_service;
pub mod task_filter;

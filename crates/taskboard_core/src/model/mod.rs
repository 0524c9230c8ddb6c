//! Domain model for projects and their tasks and notes.
//!
//! # Responsibility
//! - Define the records owned by the project store.
//! - Provide factories that assign stable generated identifiers.
//! - Define the closed tag types (`Priority`, `Status`) and their ordinals.
//!
//! # Invariants
//! - Every entity is identified by a v4 `Uuid` that is never reused.
//! - A task or note belongs to exactly one project's collection.
//! - Entity collections keep insertion order.

pub mod form;
pub mod note;
pub mod project;
pub mod tag;
pub mod task;

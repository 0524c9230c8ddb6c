//! Presentation-side state: paging, view modes and UI intents.
//!
//! # Responsibility
//! - Decide what the main content area shows and produce render frames.
//! - Keep paging state consistent while the underlying collections change.
//!
//! # Invariants
//! - View code only reads from `ProjectStore`, except for the selection
//!   cursor moved by opening and leaving projects.

pub mod card_action;
pub mod display;
pub mod pager;

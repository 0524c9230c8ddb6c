//! Core domain logic for Taskboard.
//! Projects own tasks and notes; every mutation is written through to storage.

pub mod app;
pub mod config;
pub mod db;
pub mod events;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use app::{AppError, AppResult, ProjectChoice, Session, TaskboardApp};
pub use config::{ConfigError, CoreConfig};
pub use events::{Event, EventBus, EventType, SubscriptionId};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::form::{FormError, TaskForm};
pub use model::note::{Note, NoteId};
pub use model::project::{Project, ProjectId, ProjectSummary, DEFAULT_PROJECT_TITLE};
pub use model::task::{Priority, Status, Task, TaskDetails, TaskId, TaskSummary};
pub use repo::memory_repo::MemoryProjectStorage;
pub use repo::project_repo::{
    ProjectStorage, SqliteProjectStorage, StorageError, StorageResult,
};
pub use service::project_service::{ProjectStore, StoreError, StoreResult};
pub use service::task_filter::{filtered_tasks, sorted_tasks, FilterBy, SortBy};
pub use view::card_action::CardAction;
pub use view::display::{
    ContentMode, DisplayController, DisplayState, Frame, PageInfo, RecordingRenderer, Renderer,
    TaskViewOptions,
};
pub use view::pager::Pager;

/// Minimal health-check API for host wiring checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

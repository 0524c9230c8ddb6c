//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and its read projections.
//! - Define `Priority` and `Status` with the ordinals used for sorting.
//!
//! # Invariants
//! - `id` is generated once and never changes for the task lifetime.
//! - Status and detail edits are separate operations; `apply_details` never
//!   touches `status`.

use crate::model::tag::{normalize_tag_name, UnknownTagError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a task inside its owning project.
pub type TaskId = Uuid;

/// Task urgency, ordered `Low < Medium < High < Urgent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Every variant in ascending level order.
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// Ordinal used by priority sorting.
    pub fn level(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Urgent => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_tag_name(value).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(UnknownTagError::new("priority", value)),
        }
    }
}

/// Task progress, ordered `NotStarted < InProgress < Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NotStarted,
    InProgress,
    Done,
}

impl Status {
    /// Every variant in ascending level order.
    pub const ALL: [Status; 3] = [Status::NotStarted, Status::InProgress, Status::Done];

    /// Ordinal used by status sorting.
    pub fn level(self) -> u8 {
        match self {
            Self::NotStarted => 1,
            Self::InProgress => 2,
            Self::Done => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_tag_name(value).as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(UnknownTagError::new("status", value)),
        }
    }
}

/// Editable task fields, replaced as a unit by detail edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    /// Marks the task for analytics/charting.
    pub trackable: bool,
}

/// Read projection used by task lists, sorting and filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub id: TaskId,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub status: Status,
    pub priority: Priority,
}

/// Canonical task record.
///
/// Field names serialize in camelCase to match the stored project format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// Serialized as an RFC 3339 string.
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub status: Status,
    pub trackable: bool,
}

impl Task {
    /// Creates a task with a generated stable ID.
    pub fn new(details: TaskDetails, status: Status) -> Self {
        Self::with_id(Uuid::new_v4(), details, status)
    }

    /// Creates a task with a caller-provided ID.
    ///
    /// Used by storage loading where identity already exists.
    pub fn with_id(id: TaskId, details: TaskDetails, status: Status) -> Self {
        Self {
            id,
            title: details.title,
            description: details.description,
            due_date: details.due_date,
            priority: details.priority,
            status,
            trackable: details.trackable,
        }
    }

    pub fn summary(&self) -> TaskSummary {
        TaskSummary {
            id: self.id,
            title: self.title.clone(),
            due_date: self.due_date,
            status: self.status,
            priority: self.priority,
        }
    }

    pub fn details(&self) -> TaskDetails {
        TaskDetails {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            priority: self.priority,
            trackable: self.trackable,
        }
    }

    /// Replaces every detail field; `status` is left untouched.
    pub fn apply_details(&mut self, details: TaskDetails) {
        self.title = details.title;
        self.description = details.description;
        self.due_date = details.due_date;
        self.priority = details.priority;
        self.trackable = details.trackable;
    }

    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, Status, Task, TaskDetails};
    use chrono::{TimeZone, Utc};

    fn details(title: &str) -> TaskDetails {
        TaskDetails {
            title: title.to_string(),
            description: "desc".to_string(),
            due_date: Utc.with_ymd_and_hms(2025, 9, 17, 0, 0, 0).unwrap(),
            priority: Priority::Medium,
            trackable: true,
        }
    }

    #[test]
    fn levels_follow_declared_order() {
        assert!(Priority::Low.level() < Priority::Medium.level());
        assert!(Priority::High.level() < Priority::Urgent.level());
        assert!(Status::NotStarted.level() < Status::InProgress.level());
        assert!(Status::InProgress.level() < Status::Done.level());
    }

    #[test]
    fn parse_accepts_display_names_and_rejects_unknown() {
        assert_eq!("Urgent".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!("In Progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!(Status::NotStarted.to_string().parse::<Status>().unwrap(), Status::NotStarted);

        let err = "someday".parse::<Priority>().unwrap_err();
        assert_eq!(err.kind, "priority");
    }

    #[test]
    fn new_tasks_get_distinct_ids() {
        let a = Task::new(details("a"), Status::NotStarted);
        let b = Task::new(details("a"), Status::NotStarted);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn apply_details_keeps_status() {
        let mut task = Task::new(details("before"), Status::InProgress);
        let mut updated = details("after");
        updated.priority = Priority::Urgent;
        updated.trackable = false;

        task.apply_details(updated.clone());

        assert_eq!(task.details(), updated);
        assert_eq!(task.status, Status::InProgress);
    }
}

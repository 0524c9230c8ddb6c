//! Sorting and filtering over task summaries.
//!
//! # Responsibility
//! - Bind each `SortBy` variant to a comparator and each `FilterBy` variant
//!   to a predicate.
//! - Provide pure transforms that return new vectors.
//!
//! # Invariants
//! - Inputs are never mutated.
//! - Sorting is stable; descending order is the reverse of the ascending
//!   result.
//! - A task is overdue only when it is not done and its due instant falls
//!   before the start of today in local time.

use crate::model::tag::{normalize_tag_name, UnknownTagError};
use crate::model::task::{Status, TaskSummary};
use chrono::{Local, NaiveDate};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Task ordering criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortBy {
    Priority,
    DueDate,
    Status,
}

impl SortBy {
    pub const ALL: [SortBy; 3] = [SortBy::Priority, SortBy::DueDate, SortBy::Status];

    /// Ascending comparator bound to this criterion.
    pub fn compare(self, a: &TaskSummary, b: &TaskSummary) -> Ordering {
        match self {
            Self::Priority => a.priority.level().cmp(&b.priority.level()),
            Self::DueDate => a.due_date.cmp(&b.due_date),
            Self::Status => a.status.level().cmp(&b.status.level()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::DueDate => "due_date",
            Self::Status => "status",
        }
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_tag_name(value).as_str() {
            "priority" => Ok(Self::Priority),
            "due_date" | "date" => Ok(Self::DueDate),
            "status" => Ok(Self::Status),
            _ => Err(UnknownTagError::new("sort_by", value)),
        }
    }
}

/// Task subset criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterBy {
    Finished,
    Unfinished,
    Overdue,
}

impl FilterBy {
    pub const ALL: [FilterBy; 3] = [FilterBy::Finished, FilterBy::Unfinished, FilterBy::Overdue];

    /// Predicate evaluated against the current local date.
    pub fn matches(self, task: &TaskSummary) -> bool {
        self.matches_at(task, Local::now().date_naive())
    }

    /// Predicate evaluated as if the local date were `today`.
    pub fn matches_at(self, task: &TaskSummary, today: NaiveDate) -> bool {
        match self {
            Self::Finished => task.status == Status::Done,
            Self::Unfinished => task.status != Status::Done,
            Self::Overdue => {
                task.status != Status::Done
                    && task.due_date.with_timezone(&Local).date_naive() < today
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Unfinished => "unfinished",
            Self::Overdue => "overdue",
        }
    }
}

impl Display for FilterBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterBy {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_tag_name(value).as_str() {
            "finished" => Ok(Self::Finished),
            "unfinished" => Ok(Self::Unfinished),
            "overdue" => Ok(Self::Overdue),
            _ => Err(UnknownTagError::new("filter_by", value)),
        }
    }
}

/// Returns a sorted copy of `tasks`.
///
/// Returns `None` when `tasks` or `sort_by` is absent.
pub fn sorted_tasks(
    tasks: Option<&[TaskSummary]>,
    sort_by: Option<SortBy>,
    ascending: bool,
) -> Option<Vec<TaskSummary>> {
    let sort_by = sort_by?;
    let mut sorted = tasks?.to_vec();
    sorted.sort_by(|a, b| sort_by.compare(a, b));
    if !ascending {
        sorted.reverse();
    }
    Some(sorted)
}

/// Returns the tasks matching `filter_by`, in input order.
///
/// Returns `None` when `tasks` or `filter_by` is absent.
pub fn filtered_tasks(
    tasks: Option<&[TaskSummary]>,
    filter_by: Option<FilterBy>,
) -> Option<Vec<TaskSummary>> {
    let filter_by = filter_by?;
    Some(
        tasks?
            .iter()
            .filter(|task| filter_by.matches(task))
            .cloned()
            .collect(),
    )
}

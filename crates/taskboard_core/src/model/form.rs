//! Raw form input and its conversion into typed task fields.
//!
//! # Responsibility
//! - Accept the string values a UI form produces for tasks.
//! - Convert them to `TaskDetails` or report which field is invalid.
//!
//! # Invariants
//! - Dates use the `YYYY-MM-DD` form-input shape and map to UTC midnight.
//! - A blank title is rejected; a blank description is allowed.

use crate::model::tag::UnknownTagError;
use crate::model::task::{Priority, TaskDetails};
use chrono::{DateTime, NaiveDate, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Form conversion failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Title is blank after trim.
    EmptyTitle,
    /// Date is not a valid `YYYY-MM-DD` value.
    InvalidDate(String),
    /// Priority name is not a known variant.
    UnknownPriority(UnknownTagError),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be blank"),
            Self::InvalidDate(value) => write!(f, "invalid date `{value}`; expected YYYY-MM-DD"),
            Self::UnknownPriority(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownPriority(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UnknownTagError> for FormError {
    fn from(value: UnknownTagError) -> Self {
        Self::UnknownPriority(value)
    }
}

/// String fields captured from a task create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Priority name, e.g. `medium`.
    pub priority: String,
    /// Checkbox value; `on` or `true` means checked.
    pub trackable: String,
}

impl TaskForm {
    /// Converts raw strings into typed task details.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `InvalidDate` when the date does not parse.
    /// - `UnknownPriority` when the priority name is not recognized.
    pub fn into_details(self) -> Result<TaskDetails, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::EmptyTitle);
        }

        Ok(TaskDetails {
            title: title.to_string(),
            description: self.description,
            due_date: parse_form_date(&self.date)?,
            priority: self.priority.parse::<Priority>()?,
            trackable: parse_checkbox(&self.trackable),
        })
    }
}

/// Parses a `YYYY-MM-DD` form date into UTC midnight of that day.
pub fn parse_form_date(value: &str) -> Result<DateTime<Utc>, FormError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, FORM_DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
        .ok_or_else(|| FormError::InvalidDate(trimmed.to_string()))
}

/// Formats a due date back into the form-input shape.
pub fn format_form_date(value: &DateTime<Utc>) -> String {
    value.format(FORM_DATE_FORMAT).to_string()
}

fn parse_checkbox(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "on" | "true")
}

#[cfg(test)]
mod tests {
    use super::{format_form_date, parse_form_date, FormError, TaskForm};
    use crate::model::task::Priority;

    fn form() -> TaskForm {
        TaskForm {
            title: "  Write report ".to_string(),
            description: "quarterly".to_string(),
            date: "2025-09-17".to_string(),
            priority: "high".to_string(),
            trackable: "on".to_string(),
        }
    }

    #[test]
    fn valid_form_converts_to_details() {
        let details = form().into_details().unwrap();
        assert_eq!(details.title, "Write report");
        assert_eq!(details.priority, Priority::High);
        assert!(details.trackable);
        assert_eq!(format_form_date(&details.due_date), "2025-09-17");
    }

    #[test]
    fn unchecked_box_is_not_trackable() {
        let mut input = form();
        input.trackable = String::new();
        assert!(!input.into_details().unwrap().trackable);
    }

    #[test]
    fn invalid_fields_are_reported() {
        let mut blank = form();
        blank.title = "   ".to_string();
        assert_eq!(blank.into_details().unwrap_err(), FormError::EmptyTitle);

        let mut bad_date = form();
        bad_date.date = "17/09/2025".to_string();
        assert!(matches!(
            bad_date.into_details().unwrap_err(),
            FormError::InvalidDate(_)
        ));

        let mut bad_priority = form();
        bad_priority.priority = "asap".to_string();
        assert!(matches!(
            bad_priority.into_details().unwrap_err(),
            FormError::UnknownPriority(_)
        ));
    }

    #[test]
    fn form_date_is_utc_midnight() {
        let date = parse_form_date("2024-02-29").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-02-29T00:00:00+00:00");
    }
}

//! UI intents raised by interacting with project, task and note cards.

use crate::model::tag::{normalize_tag_name, UnknownTagError};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Closed set of card interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardAction {
    OpenProject,
    OpenTask,
    DeleteProject,
    DeleteTask,
    DeleteNote,
    ChangeTaskStatus,
    EditNote,
    EditTask,
}

impl CardAction {
    pub const ALL: [CardAction; 8] = [
        CardAction::OpenProject,
        CardAction::OpenTask,
        CardAction::DeleteProject,
        CardAction::DeleteTask,
        CardAction::DeleteNote,
        CardAction::ChangeTaskStatus,
        CardAction::EditNote,
        CardAction::EditTask,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenProject => "open_project",
            Self::OpenTask => "open_task",
            Self::DeleteProject => "delete_project",
            Self::DeleteTask => "delete_task",
            Self::DeleteNote => "delete_note",
            Self::ChangeTaskStatus => "change_task_status",
            Self::EditNote => "edit_note",
            Self::EditTask => "edit_task",
        }
    }
}

impl Display for CardAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardAction {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_tag_name(value);
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| UnknownTagError::new("card_action", value))
    }
}

#[cfg(test)]
mod tests {
    use super::CardAction;

    #[test]
    fn ui_labels_resolve_to_actions() {
        assert_eq!(
            "Change Task Status".parse::<CardAction>().unwrap(),
            CardAction::ChangeTaskStatus
        );
        assert_eq!("open-project".parse::<CardAction>().unwrap(), CardAction::OpenProject);
        assert!("Archive Project".parse::<CardAction>().is_err());
    }
}

//! Project domain model.
//!
//! # Responsibility
//! - Own a project's tasks and notes in insertion order.
//! - Provide index-preserving remove/restore helpers for rollback paths.
//!
//! # Invariants
//! - Task ids are unique within `tasks`; note ids are unique within `notes`.
//! - Inserting an entity whose id already exists replaces it in place.

use crate::model::note::{Note, NoteId};
use crate::model::task::{Task, TaskId};
use uuid::Uuid;

/// Stable identifier for a project; also its storage key.
pub type ProjectId = Uuid;

/// Title used by the bootstrap project created on an empty store.
pub const DEFAULT_PROJECT_TITLE: &str = "Default";

/// List projection of a project: counts instead of full collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub title: String,
    pub tasks: usize,
    pub notes: usize,
}

/// Top-level container owning a set of tasks and notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    tasks: Vec<Task>,
    notes: Vec<Note>,
}

impl Project {
    /// Creates an empty project with a generated stable ID.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates an empty project with a caller-provided ID.
    pub fn with_id(id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            tasks: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id,
            title: self.title.clone(),
            tasks: self.tasks.len(),
            notes: self.notes.len(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|note| note.id == id)
    }

    /// Appends a task, or replaces the one with the same id in place.
    ///
    /// Returns the replaced task, if any.
    pub fn insert_task(&mut self, task: Task) -> Option<Task> {
        match self.tasks.iter().position(|existing| existing.id == task.id) {
            Some(index) => Some(std::mem::replace(&mut self.tasks[index], task)),
            None => {
                self.tasks.push(task);
                None
            }
        }
    }

    /// Removes a task and returns it with its former position.
    pub fn remove_task(&mut self, id: TaskId) -> Option<(usize, Task)> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some((index, self.tasks.remove(index)))
    }

    /// Re-inserts a task at `index` (clamped to the current length).
    pub fn restore_task(&mut self, index: usize, task: Task) {
        let index = index.min(self.tasks.len());
        self.tasks.insert(index, task);
    }

    /// Appends a note, or replaces the one with the same id in place.
    pub fn insert_note(&mut self, note: Note) -> Option<Note> {
        match self.notes.iter().position(|existing| existing.id == note.id) {
            Some(index) => Some(std::mem::replace(&mut self.notes[index], note)),
            None => {
                self.notes.push(note);
                None
            }
        }
    }

    /// Removes a note and returns it with its former position.
    pub fn remove_note(&mut self, id: NoteId) -> Option<(usize, Note)> {
        let index = self.notes.iter().position(|note| note.id == id)?;
        Some((index, self.notes.remove(index)))
    }

    /// Re-inserts a note at `index` (clamped to the current length).
    pub fn restore_note(&mut self, index: usize, note: Note) {
        let index = index.min(self.notes.len());
        self.notes.insert(index, note);
    }
}

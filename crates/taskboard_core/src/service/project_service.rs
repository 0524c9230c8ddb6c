//! Project store: the authoritative owner of projects, tasks and notes.
//!
//! # Responsibility
//! - Hold every project in memory, in insertion order.
//! - Track the selected-project cursor used by task/note operations.
//! - Write every mutation through to `ProjectStorage`.
//!
//! # Invariants
//! - After a successful mutation, storage and memory hold the same project.
//! - After a failed write, the in-memory change is rolled back to the value
//!   captured before the mutation.
//! - Project deletion removes from storage before memory.
//! - Operations never panic; failures are returned as `StoreError`.

use crate::model::note::{Note, NoteId};
use crate::model::project::{Project, ProjectId, ProjectSummary, DEFAULT_PROJECT_TITLE};
use crate::model::task::{Status, Task, TaskDetails, TaskId, TaskSummary};
use crate::repo::project_repo::{ProjectStorage, StorageError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Project store failures.
#[derive(Debug)]
pub enum StoreError {
    /// Referenced project id is unknown.
    ProjectNotFound(ProjectId),
    /// Operation needs a selected project and none is selected.
    NoProjectSelected,
    /// Task id is unknown in the target project.
    TaskNotFound(TaskId),
    /// Note id is unknown in the target project.
    NoteNotFound(NoteId),
    /// Required input is missing or blank.
    Validation(&'static str),
    /// Durable write failed; the in-memory change was rolled back.
    Persistence(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::NoProjectSelected => write!(f, "no project is selected"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Validation(message) => write!(f, "invalid input: {message}"),
            Self::Persistence(err) => write!(f, "failed to persist project: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

/// In-memory project collection with write-through persistence.
pub struct ProjectStore<S: ProjectStorage> {
    storage: S,
    projects: Vec<Project>,
    selected: Option<ProjectId>,
}

impl<S: ProjectStorage> ProjectStore<S> {
    /// Creates an empty store over the given storage.
    ///
    /// Nothing is read from storage until `load_from_storage` is called.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            projects: Vec::new(),
            selected: None,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    /// Persists a project, then inserts it into memory.
    ///
    /// A project with an already known id replaces the existing one.
    pub fn add_project(&mut self, project: Project) -> StoreResult<()> {
        if project.title.trim().is_empty() {
            return Err(StoreError::Validation("project title must not be blank"));
        }
        persist(&mut self.storage, &project, "project_add")?;

        debug!(
            "event=project_add module=project_service status=ok project_id={}",
            project.id
        );
        match self.index_of(project.id) {
            Some(index) => self.projects[index] = project,
            None => self.projects.push(project),
        }
        Ok(())
    }

    /// Adds a task to `project_id`, or to the selected project when `None`.
    pub fn add_task(&mut self, task: Task, project_id: Option<ProjectId>) -> StoreResult<()> {
        let index = self.target_index(project_id)?;
        let project = &mut self.projects[index];
        let task_id = task.id;
        let replaced = project.insert_task(task);

        if let Err(err) = persist(&mut self.storage, project, "task_add") {
            match replaced {
                Some(previous) => {
                    project.insert_task(previous);
                }
                None => {
                    project.remove_task(task_id);
                }
            }
            return Err(err);
        }

        debug!(
            "event=task_add module=project_service status=ok project_id={} task_id={}",
            project.id, task_id
        );
        Ok(())
    }

    /// Adds a note to `project_id`, or to the selected project when `None`.
    pub fn add_note(&mut self, note: Note, project_id: Option<ProjectId>) -> StoreResult<()> {
        let index = self.target_index(project_id)?;
        let project = &mut self.projects[index];
        let note_id = note.id;
        let replaced = project.insert_note(note);

        if let Err(err) = persist(&mut self.storage, project, "note_add") {
            match replaced {
                Some(previous) => {
                    project.insert_note(previous);
                }
                None => {
                    project.remove_note(note_id);
                }
            }
            return Err(err);
        }

        debug!(
            "event=note_add module=project_service status=ok project_id={} note_id={}",
            project.id, note_id
        );
        Ok(())
    }

    /// Removes a project from storage, then from memory.
    ///
    /// Clears the selection when the removed project was selected.
    ///
    /// # Errors
    /// - `Persistence` when storage removal fails; memory is untouched.
    /// - `ProjectNotFound` when storage succeeded but no such project was loaded.
    pub fn delete_project(&mut self, id: ProjectId) -> StoreResult<()> {
        if let Err(err) = self.storage.remove_project(id) {
            error!(
                "event=project_delete module=project_service status=error error_code=storage_remove_failed project_id={} error={}",
                id, err
            );
            return Err(StoreError::Persistence(err));
        }

        let index = self.index_of(id).ok_or(StoreError::ProjectNotFound(id))?;
        self.projects.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }

        info!("event=project_delete module=project_service status=ok project_id={id}");
        Ok(())
    }

    /// Deletes a task from the selected project.
    pub fn delete_task(&mut self, task_id: TaskId) -> StoreResult<()> {
        let index = self.selected_index()?;
        let project = &mut self.projects[index];
        let (position, removed) = project
            .remove_task(task_id)
            .ok_or(StoreError::TaskNotFound(task_id))?;

        if let Err(err) = persist(&mut self.storage, project, "task_delete") {
            project.restore_task(position, removed);
            return Err(err);
        }
        Ok(())
    }

    /// Deletes a note from the selected project.
    pub fn delete_note(&mut self, note_id: NoteId) -> StoreResult<()> {
        let index = self.selected_index()?;
        let project = &mut self.projects[index];
        let (position, removed) = project
            .remove_note(note_id)
            .ok_or(StoreError::NoteNotFound(note_id))?;

        if let Err(err) = persist(&mut self.storage, project, "note_delete") {
            project.restore_note(position, removed);
            return Err(err);
        }
        Ok(())
    }

    /// Sets the status of a task in the selected project.
    pub fn edit_task_status(&mut self, task_id: TaskId, status: Status) -> StoreResult<()> {
        let index = self.selected_index()?;
        let project = &mut self.projects[index];
        let task = project
            .task_mut(task_id)
            .ok_or(StoreError::TaskNotFound(task_id))?;
        let previous = std::mem::replace(&mut task.status, status);

        if let Err(err) = persist(&mut self.storage, project, "task_status_edit") {
            if let Some(task) = project.task_mut(task_id) {
                task.status = previous;
            }
            return Err(err);
        }
        Ok(())
    }

    /// Replaces the detail fields of a task in the selected project.
    pub fn edit_task_details(&mut self, task_id: TaskId, details: TaskDetails) -> StoreResult<()> {
        if details.title.trim().is_empty() {
            return Err(StoreError::Validation("task title must not be blank"));
        }

        let index = self.selected_index()?;
        let project = &mut self.projects[index];
        let task = project
            .task_mut(task_id)
            .ok_or(StoreError::TaskNotFound(task_id))?;
        let snapshot = task.details();
        task.apply_details(details);

        if let Err(err) = persist(&mut self.storage, project, "task_details_edit") {
            if let Some(task) = project.task_mut(task_id) {
                task.apply_details(snapshot);
            }
            return Err(err);
        }
        Ok(())
    }

    /// Replaces title and content of a note in the selected project.
    ///
    /// Rollback restores both fields.
    pub fn edit_note(
        &mut self,
        note_id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<()> {
        let title = title.into();
        let content = content.into();
        if title.trim().is_empty() {
            return Err(StoreError::Validation("note title must not be blank"));
        }
        if content.trim().is_empty() {
            return Err(StoreError::Validation("note content must not be blank"));
        }

        let index = self.selected_index()?;
        let project = &mut self.projects[index];
        let note = project
            .note_mut(note_id)
            .ok_or(StoreError::NoteNotFound(note_id))?;
        let previous_title = std::mem::replace(&mut note.title, title);
        let previous_content = std::mem::replace(&mut note.content, content);

        if let Err(err) = persist(&mut self.storage, project, "note_edit") {
            if let Some(note) = project.note_mut(note_id) {
                note.title = previous_title;
                note.content = previous_content;
            }
            return Err(err);
        }
        Ok(())
    }

    /// Title of `project_id`, or of the selected project when `None`.
    pub fn project_name(&self, project_id: Option<ProjectId>) -> Option<&str> {
        let id = project_id.or(self.selected)?;
        self.project(id).map(|project| project.title.as_str())
    }

    pub fn task_name(&self, task_id: TaskId) -> Option<&str> {
        self.selected_project()?
            .task(task_id)
            .map(|task| task.title.as_str())
    }

    pub fn note_name(&self, note_id: NoteId) -> Option<&str> {
        self.selected_project()?
            .note(note_id)
            .map(|note| note.title.as_str())
    }

    pub fn selected_project_id(&self) -> Option<ProjectId> {
        self.selected
    }

    /// Summaries of every project, regardless of selection.
    pub fn all_projects(&self) -> Vec<ProjectSummary> {
        self.projects.iter().map(Project::summary).collect()
    }

    /// Task summaries of the selected project; `None` when nothing is selected.
    pub fn all_tasks(&self) -> Option<Vec<TaskSummary>> {
        Some(
            self.selected_project()?
                .tasks()
                .iter()
                .map(Task::summary)
                .collect(),
        )
    }

    /// Notes of the selected project; `None` when nothing is selected.
    pub fn all_notes(&self) -> Option<&[Note]> {
        self.selected_project().map(Project::notes)
    }

    pub fn task_details(&self, task_id: TaskId) -> Option<TaskDetails> {
        self.selected_project()?.task(task_id).map(Task::details)
    }

    pub fn note(&self, note_id: NoteId) -> Option<&Note> {
        self.selected_project()?.note(note_id)
    }

    /// Moves the cursor to `project_id`.
    pub fn select_project(&mut self, project_id: ProjectId) -> StoreResult<()> {
        if self.index_of(project_id).is_none() {
            return Err(StoreError::ProjectNotFound(project_id));
        }
        self.selected = Some(project_id);
        Ok(())
    }

    /// Clears the cursor.
    pub fn leave_project(&mut self) {
        self.selected = None;
    }

    /// Imports projects that were just read from storage.
    ///
    /// Nothing is written back. Projects with a blank title are skipped; a
    /// known id replaces the loaded project in place. Returns how many were
    /// imported.
    pub fn load_projects(&mut self, projects: Vec<Project>) -> usize {
        let mut loaded = 0;
        for project in projects {
            if project.title.trim().is_empty() {
                warn!(
                    "event=project_load module=project_service status=error error_code=blank_title project_id={}",
                    project.id
                );
                continue;
            }
            match self.index_of(project.id) {
                Some(index) => self.projects[index] = project,
                None => self.projects.push(project),
            }
            loaded += 1;
        }
        loaded
    }

    /// Reads every stored project and imports it.
    ///
    /// # Errors
    /// - `Persistence` when storage cannot be read; memory is untouched.
    pub fn load_from_storage(&mut self) -> StoreResult<usize> {
        let projects = self.storage.retrieve_all_projects().map_err(|err| {
            error!(
                "event=project_load module=project_service status=error error_code=storage_read_failed error={err}"
            );
            StoreError::Persistence(err)
        })?;
        let loaded = self.load_projects(projects);
        info!("event=project_load module=project_service status=ok loaded={loaded}");
        Ok(loaded)
    }

    /// Creates and persists the `Default` project when the store is empty.
    ///
    /// Returns the new project id, or `None` when projects already exist.
    /// The project is kept in memory even when persisting it fails.
    pub fn initialize_default_project(&mut self) -> Option<ProjectId> {
        self.bootstrap_default_project(true)
    }

    /// Like `initialize_default_project`, but never writes to storage.
    ///
    /// Used when storage could not be read, so the next session does not
    /// find an extra `Default` next to the unreadable data.
    pub fn initialize_unsaved_default_project(&mut self) -> Option<ProjectId> {
        self.bootstrap_default_project(false)
    }

    fn bootstrap_default_project(&mut self, save: bool) -> Option<ProjectId> {
        if !self.projects.is_empty() {
            return None;
        }

        let project = Project::new(DEFAULT_PROJECT_TITLE);
        let id = project.id;
        if save {
            if let Err(err) = self.storage.save_project(&project) {
                warn!(
                    "event=default_project_init module=project_service status=degraded project_id={id} error={err}"
                );
            }
        }
        self.projects.push(project);
        info!(
            "event=default_project_init module=project_service status=ok project_id={id} saved={save}"
        );
        Some(id)
    }

    fn index_of(&self, id: ProjectId) -> Option<usize> {
        self.projects.iter().position(|project| project.id == id)
    }

    fn selected_project(&self) -> Option<&Project> {
        self.selected.and_then(|id| self.project(id))
    }

    fn selected_index(&self) -> StoreResult<usize> {
        let id = self.selected.ok_or(StoreError::NoProjectSelected)?;
        self.index_of(id).ok_or(StoreError::ProjectNotFound(id))
    }

    fn target_index(&self, project_id: Option<ProjectId>) -> StoreResult<usize> {
        match project_id {
            Some(id) => self.index_of(id).ok_or(StoreError::ProjectNotFound(id)),
            None => self.selected_index(),
        }
    }
}

fn persist<S: ProjectStorage>(
    storage: &mut S,
    project: &Project,
    operation: &'static str,
) -> StoreResult<()> {
    storage.save_project(project).map_err(|err| {
        error!(
            "event={} module=project_service status=error error_code=persist_failed project_id={} error={}",
            operation, project.id, err
        );
        StoreError::Persistence(err)
    })
}

#[cfg(test)]
mod tests {
    use super::{ProjectStore, StoreError};
    use crate::model::note::Note;
    use crate::model::project::Project;
    use crate::repo::memory_repo::MemoryProjectStorage;

    #[test]
    fn blank_project_title_is_rejected() {
        let mut store = ProjectStore::new(MemoryProjectStorage::new());
        let err = store.add_project(Project::new("  ")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.is_empty());
        assert!(store.storage().is_empty());
    }

    #[test]
    fn selected_scope_operations_fail_without_selection() {
        let mut store = ProjectStore::new(MemoryProjectStorage::new());
        let project = Project::new("A");
        store.add_project(project).unwrap();

        assert!(matches!(
            store.add_note(Note::new("n", "c"), None),
            Err(StoreError::NoProjectSelected)
        ));
        assert!(store.all_tasks().is_none());
        assert!(store.all_notes().is_none());
        assert!(store.project_name(None).is_none());
    }

    #[test]
    fn edit_note_rolls_back_title_and_content() {
        let mut store = ProjectStore::new(MemoryProjectStorage::new());
        let project = Project::new("A");
        let project_id = project.id;
        store.add_project(project).unwrap();
        store.select_project(project_id).unwrap();
        let note = Note::new("title", "content");
        store.add_note(note.clone(), None).unwrap();

        store.storage_mut().set_available(false);
        let err = store.edit_note(note.id, "new title", "new content").unwrap_err();

        assert!(matches!(err, StoreError::Persistence(_)));
        assert_eq!(store.note(note.id), Some(&note));
    }

    #[test]
    fn loading_does_not_write_back() {
        let mut store = ProjectStore::new(MemoryProjectStorage::new());
        let kept = Project::new("Kept");
        let loaded = store.load_projects(vec![kept.clone(), Project::new(" ")]);

        assert_eq!(loaded, 1);
        assert_eq!(store.project(kept.id), Some(&kept));
        assert!(store.storage().is_empty());
    }

    #[test]
    fn unsaved_default_stays_in_memory() {
        let mut store = ProjectStore::new(MemoryProjectStorage::new());

        assert!(store.initialize_unsaved_default_project().is_some());
        assert!(store.initialize_unsaved_default_project().is_none());
        assert_eq!(store.len(), 1);
        assert!(store.storage().is_empty());
    }
}

//! Application facade: the use cases UI glue calls into.
//!
//! # Responsibility
//! - Own the project store, the display controller and the event bus.
//! - Turn raw UI input into store mutations and publish success events.
//! - Route card interactions to operations or request events.
//!
//! # Invariants
//! - A success event is published only after the store reports success;
//!   failed use cases publish nothing.
//! - The display controller is subscribed to every domain event.
//! - Request events are queued for the UI glue, never handled by core.

use crate::events::{Event, EventBus, EventType, SubscriptionId};
use crate::model::form::{FormError, TaskForm};
use crate::model::note::{Note, NoteId};
use crate::model::project::{Project, ProjectId, ProjectSummary};
use crate::model::tag::UnknownTagError;
use crate::model::task::{Status, Task, TaskId};
use crate::repo::project_repo::ProjectStorage;
use crate::service::project_service::{ProjectStore, StoreError};
use crate::service::task_filter::{FilterBy, SortBy};
use crate::view::card_action::CardAction;
use crate::view::display::{ContentMode, DisplayController, DisplayState, Renderer};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const REQUEST_EVENTS: [EventType; 7] = [
    EventType::ProjectDeleteRequested,
    EventType::TaskDeleteRequested,
    EventType::NoteDeleteRequested,
    EventType::TaskViewRequested,
    EventType::NoteViewRequested,
    EventType::TaskEditRequested,
    EventType::NoteEditRequested,
];

/// Use-case level failures.
#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Form(FormError),
    UnknownTag(UnknownTagError),
    /// A card action arrived without the value it needs.
    MissingValue(&'static str),
    /// A card action is not valid in the current view.
    InvalidState {
        action: CardAction,
        state: DisplayState,
    },
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Form(err) => write!(f, "{err}"),
            Self::UnknownTag(err) => write!(f, "{err}"),
            Self::MissingValue(name) => write!(f, "missing value: {name}"),
            Self::InvalidState { action, state } => {
                write!(f, "action `{action}` is not available in `{state}`")
            }
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Form(err) => Some(err),
            Self::UnknownTag(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<FormError> for AppError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

impl From<UnknownTagError> for AppError {
    fn from(value: UnknownTagError) -> Self {
        Self::UnknownTag(value)
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Entry of a "target project" choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectChoice {
    pub id: ProjectId,
    pub title: String,
    /// Marks the selected project, listed first.
    pub is_current: bool,
}

/// State shared with event handlers.
pub struct Session<S: ProjectStorage, R: Renderer> {
    store: ProjectStore<S>,
    display: DisplayController<R>,
    requests: Vec<Event>,
}

impl<S: ProjectStorage, R: Renderer> Session<S, R> {
    pub fn store(&self) -> &ProjectStore<S> {
        &self.store
    }

    pub fn display(&self) -> &DisplayController<R> {
        &self.display
    }

    /// Request events published since the last `take_requests`.
    pub fn pending_requests(&self) -> &[Event] {
        &self.requests
    }
}

/// Single-user project/task/note application core.
pub struct TaskboardApp<S: ProjectStorage + 'static, R: Renderer + 'static> {
    session: Session<S, R>,
    bus: EventBus<Session<S, R>>,
}

impl<S: ProjectStorage + 'static, R: Renderer + 'static> TaskboardApp<S, R> {
    /// Wires store, display and bus; nothing is loaded or rendered yet.
    pub fn new(storage: S, renderer: R, page_size: usize) -> Self {
        let mut bus = EventBus::new();
        for kind in EventType::DOMAIN {
            bus.subscribe(kind, |session: &mut Session<S, R>, event: &Event| {
                session.display.handle_event(&session.store, event);
            });
        }
        for kind in REQUEST_EVENTS {
            bus.subscribe(kind, |session: &mut Session<S, R>, event: &Event| {
                session.requests.push(event.clone());
            });
        }

        Self {
            session: Session {
                store: ProjectStore::new(storage),
                display: DisplayController::with_page_size(renderer, page_size),
                requests: Vec::new(),
            },
            bus,
        }
    }

    /// Loads stored projects, bootstraps `Default` if empty, shows the list.
    ///
    /// Returns the number of projects loaded from storage. When storage
    /// cannot be read at all, the failure is logged and the session starts
    /// with an in-memory `Default` that is not saved.
    pub fn start(&mut self) -> usize {
        let loaded = match self.session.store.load_from_storage() {
            Ok(count) => {
                self.session.store.initialize_default_project();
                count
            }
            Err(err) => {
                warn!("event=app_start module=app status=degraded error={err}");
                self.session.store.initialize_unsaved_default_project();
                0
            }
        };
        self.session.display.show_projects(&self.session.store);
        info!(
            "event=app_start module=app status=ok loaded={} projects={}",
            loaded,
            self.session.store.len()
        );
        loaded
    }

    pub fn store(&self) -> &ProjectStore<S> {
        &self.session.store
    }

    pub fn display(&self) -> &DisplayController<R> {
        &self.session.display
    }

    pub fn session(&self) -> &Session<S, R> {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        self.session.display.renderer()
    }

    pub fn storage_mut(&mut self) -> &mut S {
        self.session.store.storage_mut()
    }

    /// Registers an additional handler, run after the built-in ones.
    pub fn subscribe<F>(&mut self, kind: EventType, handler: F) -> SubscriptionId
    where
        F: Fn(&mut Session<S, R>, &Event) + 'static,
    {
        self.bus.subscribe(kind, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Drains queued request events (delete/view/edit requests).
    pub fn take_requests(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.session.requests)
    }

    pub fn create_project(&mut self, title: &str) -> AppResult<ProjectId> {
        let project = Project::new(title.trim());
        let summary = project.summary();
        self.session.store.add_project(project)?;
        info!(
            "event=project_create module=app status=ok project_id={}",
            summary.id
        );
        let id = summary.id;
        self.publish(Event::ProjectCreated(summary));
        Ok(id)
    }

    /// Creates a `NotStarted` task in `project_id`, or the selected project.
    pub fn create_task(
        &mut self,
        form: TaskForm,
        project_id: Option<ProjectId>,
    ) -> AppResult<TaskId> {
        let details = form.into_details()?;
        let project_id = self.target_project(project_id)?;
        let task = Task::new(details, Status::NotStarted);
        let task_id = task.id;
        self.session.store.add_task(task.clone(), Some(project_id))?;
        self.publish(Event::TaskCreated { task, project_id });
        Ok(task_id)
    }

    /// Creates a note in `project_id`, or the selected project.
    pub fn create_note(
        &mut self,
        title: &str,
        content: &str,
        project_id: Option<ProjectId>,
    ) -> AppResult<NoteId> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Form(FormError::EmptyTitle));
        }
        let project_id = self.target_project(project_id)?;
        let note = Note::new(title, content);
        let note_id = note.id;
        self.session.store.add_note(note.clone(), Some(project_id))?;
        self.publish(Event::NoteCreated { note, project_id });
        Ok(note_id)
    }

    pub fn delete_project(&mut self, project_id: ProjectId) -> AppResult<()> {
        self.session.store.delete_project(project_id)?;
        self.publish(Event::ProjectDeleted(project_id));
        Ok(())
    }

    pub fn delete_task(&mut self, task_id: TaskId) -> AppResult<()> {
        self.session.store.delete_task(task_id)?;
        self.publish(Event::TaskDeleted(task_id));
        Ok(())
    }

    pub fn delete_note(&mut self, note_id: NoteId) -> AppResult<()> {
        self.session.store.delete_note(note_id)?;
        self.publish(Event::NoteDeleted(note_id));
        Ok(())
    }

    pub fn change_task_status(&mut self, task_id: TaskId, status: Status) -> AppResult<()> {
        self.session.store.edit_task_status(task_id, status)?;
        self.publish(Event::TaskEdited(task_id));
        Ok(())
    }

    /// Replaces a task's details from a submitted edit form.
    pub fn edit_task(&mut self, task_id: TaskId, form: TaskForm) -> AppResult<()> {
        let details = form.into_details()?;
        self.session.store.edit_task_details(task_id, details)?;
        self.publish(Event::TaskEdited(task_id));
        Ok(())
    }

    pub fn edit_note(&mut self, note_id: NoteId, title: &str, content: &str) -> AppResult<()> {
        self.session.store.edit_note(note_id, title.trim(), content)?;
        self.publish(Event::NoteEdited(note_id));
        Ok(())
    }

    pub fn open_project(&mut self, project_id: ProjectId) -> AppResult<()> {
        let Session { store, display, .. } = &mut self.session;
        display.open_project(store, project_id)?;
        Ok(())
    }

    pub fn leave_project(&mut self) {
        let Session { store, display, .. } = &mut self.session;
        display.leave_project(store);
    }

    pub fn switch_content(&mut self, mode: ContentMode) {
        let Session { store, display, .. } = &mut self.session;
        display.switch_content(store, mode);
    }

    pub fn set_sort(&mut self, sort_by: Option<SortBy>, ascending: bool) {
        let Session { store, display, .. } = &mut self.session;
        display.set_sort(store, sort_by, ascending);
    }

    pub fn set_filter(&mut self, filter_by: Option<FilterBy>) {
        let Session { store, display, .. } = &mut self.session;
        display.set_filter(store, filter_by);
    }

    pub fn set_page_size(&mut self, size: usize) {
        let Session { store, display, .. } = &mut self.session;
        display.set_page_size(store, size);
    }

    pub fn next_page(&mut self) -> bool {
        let Session { store, display, .. } = &mut self.session;
        display.next_page(store)
    }

    pub fn prev_page(&mut self) -> bool {
        let Session { store, display, .. } = &mut self.session;
        display.prev_page(store)
    }

    /// Projects a new task or note can target, selected project first.
    pub fn project_choices(&self) -> Vec<ProjectChoice> {
        let current = self.session.store.selected_project_id();
        let mut choices: Vec<ProjectChoice> = self
            .session
            .store
            .all_projects()
            .into_iter()
            .map(|ProjectSummary { id, title, .. }| ProjectChoice {
                id,
                title,
                is_current: Some(id) == current,
            })
            .collect();
        // Stable: keeps the remaining projects in insertion order.
        choices.sort_by_key(|choice| !choice.is_current);
        choices
    }

    /// Routes a card interaction on entity `id`.
    ///
    /// `value` carries the selected option for `ChangeTaskStatus`.
    pub fn dispatch_card_action(
        &mut self,
        action: CardAction,
        id: Uuid,
        value: Option<&str>,
    ) -> AppResult<()> {
        match action {
            CardAction::OpenProject => self.open_project(id),
            CardAction::DeleteProject => {
                self.publish(Event::ProjectDeleteRequested(id));
                Ok(())
            }
            CardAction::DeleteTask => {
                self.publish(Event::TaskDeleteRequested(id));
                Ok(())
            }
            CardAction::DeleteNote => {
                self.publish(Event::NoteDeleteRequested(id));
                Ok(())
            }
            CardAction::OpenTask => {
                self.publish(Event::TaskViewRequested(id));
                Ok(())
            }
            CardAction::EditTask => {
                self.publish(Event::TaskEditRequested(id));
                Ok(())
            }
            CardAction::EditNote => {
                self.publish(Event::NoteEditRequested(id));
                Ok(())
            }
            CardAction::ChangeTaskStatus => {
                let state = self.session.display.state();
                if state != DisplayState::ViewTasks {
                    return Err(AppError::InvalidState { action, state });
                }
                let status = value
                    .ok_or(AppError::MissingValue("status"))?
                    .parse::<Status>()?;
                self.change_task_status(id, status)
            }
        }
    }

    fn target_project(&self, project_id: Option<ProjectId>) -> AppResult<ProjectId> {
        match project_id.or(self.session.store.selected_project_id()) {
            Some(id) => Ok(id),
            None => Err(AppError::Store(StoreError::NoProjectSelected)),
        }
    }

    fn publish(&mut self, event: Event) {
        self.bus.publish(&mut self.session, &event);
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, TaskboardApp};
    use crate::model::form::FormError;
    use crate::repo::memory_repo::MemoryProjectStorage;
    use crate::service::project_service::StoreError;
    use crate::view::card_action::CardAction;
    use crate::view::display::{DisplayState, RecordingRenderer};
    use std::error::Error;

    #[test]
    fn errors_describe_and_chain() {
        let err = AppError::from(StoreError::NoProjectSelected);
        assert_eq!(err.to_string(), "no project is selected");
        assert!(err.source().is_some());

        let err = AppError::InvalidState {
            action: CardAction::ChangeTaskStatus,
            state: DisplayState::ViewProjects,
        };
        assert_eq!(
            err.to_string(),
            "action `change_task_status` is not available in `view_projects`"
        );
        assert!(err.source().is_none());
        assert!(AppError::from(FormError::EmptyTitle).source().is_some());
    }

    #[test]
    fn task_creation_needs_a_target_project() {
        let mut app = TaskboardApp::new(MemoryProjectStorage::new(), RecordingRenderer::new(), 3);
        app.start();

        let err = app.create_note("n", "c", None).unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::NoProjectSelected)));
        assert_eq!(app.renderer().frames().len(), 1);
    }

    #[test]
    fn start_skips_corrupt_entries() {
        let mut storage = MemoryProjectStorage::new();
        storage.insert_raw("broken", "{");
        let mut app = TaskboardApp::new(storage, RecordingRenderer::new(), 3);

        assert_eq!(app.start(), 0);
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.store().storage().len(), 2);
    }

    #[test]
    fn unreadable_storage_gets_no_saved_default() {
        let mut storage = MemoryProjectStorage::new();
        storage.set_available(false);
        let mut app = TaskboardApp::new(storage, RecordingRenderer::new(), 3);

        assert_eq!(app.start(), 0);
        assert_eq!(app.store().len(), 1);
        app.storage_mut().set_available(true);
        assert!(app.store().storage().is_empty());
    }
}

//! Display orchestration: which collection the main view shows, and how.
//!
//! # Responsibility
//! - Track the active view (`DisplayState`) and the in-project content toggle.
//! - Compose store queries with sort, filter and paging into render frames.
//! - React to domain events by re-querying and re-rendering the active view.
//!
//! # Invariants
//! - Every view transition and every sort/filter/page-size change resets the
//!   pager to page 1.
//! - Events outside the active view's scope are ignored.
//! - After a deletion the pager steps back one page if its page emptied.

use crate::events::Event;
use crate::model::note::Note;
use crate::model::project::{ProjectId, ProjectSummary};
use crate::model::tag::{normalize_tag_name, UnknownTagError};
use crate::model::task::TaskSummary;
use crate::repo::project_repo::ProjectStorage;
use crate::service::project_service::{ProjectStore, StoreResult};
use crate::service::task_filter::{filtered_tasks, sorted_tasks, FilterBy, SortBy};
use crate::view::pager::Pager;
use log::debug;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Heading shown above the project list.
pub const ALL_PROJECTS_HEADING: &str = "All Projects";

/// Mutually exclusive main-view modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayState {
    ViewProjects,
    ViewTasks,
    ViewNotes,
}

impl DisplayState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewProjects => "view_projects",
            Self::ViewTasks => "view_tasks",
            Self::ViewNotes => "view_notes",
        }
    }
}

impl Display for DisplayState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayState {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_tag_name(value).as_str() {
            "view_projects" => Ok(Self::ViewProjects),
            "view_tasks" => Ok(Self::ViewTasks),
            "view_notes" => Ok(Self::ViewNotes),
            _ => Err(UnknownTagError::new("display_state", value)),
        }
    }
}

/// In-project toggle between the task list and the note list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentMode {
    #[default]
    Tasks,
    Notes,
}

impl ContentMode {
    pub fn display_state(self) -> DisplayState {
        match self {
            Self::Tasks => DisplayState::ViewTasks,
            Self::Notes => DisplayState::ViewNotes,
        }
    }
}

impl FromStr for ContentMode {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_tag_name(value).as_str() {
            "tasks" | "view_tasks" => Ok(Self::Tasks),
            "notes" | "view_notes" => Ok(Self::Notes),
            _ => Err(UnknownTagError::new("content_mode", value)),
        }
    }
}

/// Sort and filter controls of the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskViewOptions {
    /// `None` keeps insertion order.
    pub sort_by: Option<SortBy>,
    pub ascending: bool,
    /// `None` shows every task.
    pub filter_by: Option<FilterBy>,
}

impl Default for TaskViewOptions {
    fn default() -> Self {
        Self {
            sort_by: None,
            ascending: true,
            filter_by: None,
        }
    }
}

/// Paging position of a rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based current page.
    pub number: usize,
    /// Pages needed for `total` items; at least 1.
    pub count: usize,
    /// Items in the whole (sorted/filtered) collection.
    pub total: usize,
}

/// Everything the UI needs to draw the main view once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Projects {
        heading: String,
        page: PageInfo,
        items: Vec<ProjectSummary>,
    },
    Tasks {
        heading: String,
        page: PageInfo,
        items: Vec<TaskSummary>,
    },
    Notes {
        heading: String,
        page: PageInfo,
        items: Vec<Note>,
    },
}

impl Frame {
    pub fn state(&self) -> DisplayState {
        match self {
            Self::Projects { .. } => DisplayState::ViewProjects,
            Self::Tasks { .. } => DisplayState::ViewTasks,
            Self::Notes { .. } => DisplayState::ViewNotes,
        }
    }

    pub fn heading(&self) -> &str {
        match self {
            Self::Projects { heading, .. }
            | Self::Tasks { heading, .. }
            | Self::Notes { heading, .. } => heading,
        }
    }

    pub fn page(&self) -> PageInfo {
        match self {
            Self::Projects { page, .. } | Self::Tasks { page, .. } | Self::Notes { page, .. } => {
                *page
            }
        }
    }
}

/// UI collaborator that draws frames.
pub trait Renderer {
    fn render(&mut self, frame: &Frame);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, frame: &Frame) {
        (**self).render(frame);
    }
}

/// Renderer that keeps every frame it receives.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: Vec<Frame>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

/// View-state machine over a `ProjectStore`.
pub struct DisplayController<R: Renderer> {
    state: DisplayState,
    content_mode: ContentMode,
    options: TaskViewOptions,
    pager: Pager,
    renderer: R,
}

impl<R: Renderer> DisplayController<R> {
    /// Starts in `ViewProjects` with default paging and task options.
    pub fn new(renderer: R) -> Self {
        Self {
            state: DisplayState::ViewProjects,
            content_mode: ContentMode::default(),
            options: TaskViewOptions::default(),
            pager: Pager::new(),
            renderer,
        }
    }

    pub fn with_page_size(renderer: R, page_size: usize) -> Self {
        let mut controller = Self::new(renderer);
        controller.pager.set_page_size(page_size);
        controller
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn content_mode(&self) -> ContentMode {
        self.content_mode
    }

    pub fn options(&self) -> TaskViewOptions {
        self.options
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Enters `ViewProjects` and renders the project list.
    pub fn show_projects<S: ProjectStorage>(&mut self, store: &ProjectStore<S>) {
        self.transition(DisplayState::ViewProjects);
        self.render(store, false);
    }

    /// Selects a project and shows its tasks or notes per the content toggle.
    ///
    /// # Errors
    /// - `ProjectNotFound` when the id is unknown; the view is unchanged.
    pub fn open_project<S: ProjectStorage>(
        &mut self,
        store: &mut ProjectStore<S>,
        project_id: ProjectId,
    ) -> StoreResult<()> {
        store.select_project(project_id)?;
        self.transition(self.content_mode.display_state());
        self.render(store, false);
        Ok(())
    }

    /// Clears the selection and returns to the project list.
    pub fn leave_project<S: ProjectStorage>(&mut self, store: &mut ProjectStore<S>) {
        store.leave_project();
        self.show_projects(store);
    }

    /// Flips the content toggle; switches view only while a project is open.
    pub fn switch_content<S: ProjectStorage>(
        &mut self,
        store: &ProjectStore<S>,
        mode: ContentMode,
    ) {
        self.content_mode = mode;
        if self.state == DisplayState::ViewProjects {
            return;
        }
        self.transition(mode.display_state());
        self.render(store, false);
    }

    pub fn set_sort<S: ProjectStorage>(
        &mut self,
        store: &ProjectStore<S>,
        sort_by: Option<SortBy>,
        ascending: bool,
    ) {
        self.options.sort_by = sort_by;
        self.options.ascending = ascending;
        self.task_control_changed(store);
    }

    pub fn set_filter<S: ProjectStorage>(
        &mut self,
        store: &ProjectStore<S>,
        filter_by: Option<FilterBy>,
    ) {
        self.options.filter_by = filter_by;
        self.task_control_changed(store);
    }

    /// Clamps and applies a page size, then re-renders from page 1.
    pub fn set_page_size<S: ProjectStorage>(&mut self, store: &ProjectStore<S>, size: usize) {
        self.pager.set_page_size(size);
        self.pager.reset_page_number();
        self.render(store, false);
    }

    pub fn next_page<S: ProjectStorage>(&mut self, store: &ProjectStore<S>) -> bool {
        let moved = match self.state {
            DisplayState::ViewProjects => self.pager.next_page(&store.all_projects()),
            DisplayState::ViewTasks => match self.visible_tasks(store) {
                Some(tasks) => self.pager.next_page(&tasks),
                None => false,
            },
            DisplayState::ViewNotes => match store.all_notes() {
                Some(notes) => self.pager.next_page(notes),
                None => false,
            },
        };
        if moved {
            self.render(store, false);
        }
        moved
    }

    pub fn prev_page<S: ProjectStorage>(&mut self, store: &ProjectStore<S>) -> bool {
        let moved = self.pager.prev_page();
        if moved {
            self.render(store, false);
        }
        moved
    }

    /// Re-renders the active view, stepping back a page if it emptied.
    pub fn refresh<S: ProjectStorage>(&mut self, store: &ProjectStore<S>) {
        self.render(store, true);
    }

    /// Applies a published event to the active view.
    pub fn handle_event<S: ProjectStorage>(&mut self, store: &ProjectStore<S>, event: &Event) {
        let selected = store.selected_project_id();
        let relevant = match (self.state, event) {
            (DisplayState::ViewProjects, Event::ProjectCreated(_))
            | (DisplayState::ViewProjects, Event::ProjectDeleted(_))
            | (DisplayState::ViewProjects, Event::TaskCreated { .. })
            | (DisplayState::ViewProjects, Event::TaskDeleted(_))
            | (DisplayState::ViewProjects, Event::NoteCreated { .. })
            | (DisplayState::ViewProjects, Event::NoteDeleted(_)) => true,
            (DisplayState::ViewTasks, Event::TaskCreated { project_id, .. })
            | (DisplayState::ViewNotes, Event::NoteCreated { project_id, .. }) => {
                selected == Some(*project_id)
            }
            (DisplayState::ViewTasks, Event::TaskDeleted(_))
            | (DisplayState::ViewTasks, Event::TaskEdited(_))
            | (DisplayState::ViewNotes, Event::NoteDeleted(_))
            | (DisplayState::ViewNotes, Event::NoteEdited(_)) => true,
            // The open project was deleted underneath the view.
            (DisplayState::ViewTasks | DisplayState::ViewNotes, Event::ProjectDeleted(_)) => {
                if selected.is_none() {
                    self.show_projects(store);
                }
                return;
            }
            _ => false,
        };

        if !relevant {
            debug!(
                "event=display_event_skipped module=display state={} kind={}",
                self.state,
                event.kind()
            );
            return;
        }
        self.render(store, true);
    }

    /// Builds the frame for the active view without rendering it.
    ///
    /// Returns `None` for task/note views when no project is selected.
    pub fn current_frame<S: ProjectStorage>(&self, store: &ProjectStore<S>) -> Option<Frame> {
        let mut pager = self.pager.clone();
        self.build_frame(store, &mut pager, false)
    }

    fn transition(&mut self, state: DisplayState) {
        debug!(
            "event=display_transition module=display from={} to={}",
            self.state, state
        );
        self.state = state;
        self.pager.reset_page_number();
    }

    fn task_control_changed<S: ProjectStorage>(&mut self, store: &ProjectStore<S>) {
        self.pager.reset_page_number();
        if self.state == DisplayState::ViewTasks {
            self.render(store, false);
        }
    }

    fn render<S: ProjectStorage>(&mut self, store: &ProjectStore<S>, revalidate: bool) {
        let mut pager = self.pager.clone();
        let frame = self.build_frame(store, &mut pager, revalidate);
        self.pager = pager;
        if let Some(frame) = frame {
            self.renderer.render(&frame);
        }
    }

    fn build_frame<S: ProjectStorage>(
        &self,
        store: &ProjectStore<S>,
        pager: &mut Pager,
        revalidate: bool,
    ) -> Option<Frame> {
        match self.state {
            DisplayState::ViewProjects => {
                let (items, page) = paged(pager, &store.all_projects(), revalidate);
                Some(Frame::Projects {
                    heading: ALL_PROJECTS_HEADING.to_string(),
                    page,
                    items,
                })
            }
            DisplayState::ViewTasks => {
                let tasks = self.visible_tasks(store)?;
                let (items, page) = paged(pager, &tasks, revalidate);
                Some(Frame::Tasks {
                    heading: store.project_name(None)?.to_string(),
                    page,
                    items,
                })
            }
            DisplayState::ViewNotes => {
                let (items, page) = paged(pager, store.all_notes()?, revalidate);
                Some(Frame::Notes {
                    heading: store.project_name(None)?.to_string(),
                    page,
                    items,
                })
            }
        }
    }

    /// Tasks of the selected project after sorting, then filtering.
    fn visible_tasks<S: ProjectStorage>(
        &self,
        store: &ProjectStore<S>,
    ) -> Option<Vec<TaskSummary>> {
        let tasks = store.all_tasks()?;
        let TaskViewOptions {
            sort_by,
            ascending,
            filter_by,
        } = self.options;
        let sorted = sorted_tasks(Some(tasks.as_slice()), sort_by, ascending).unwrap_or(tasks);
        Some(filtered_tasks(Some(sorted.as_slice()), filter_by).unwrap_or(sorted))
    }
}

fn paged<T: Clone>(pager: &mut Pager, all: &[T], revalidate: bool) -> (Vec<T>, PageInfo) {
    if revalidate && !pager.is_current_page_valid(all) {
        pager.prev_page();
    }
    let items = pager.current_page_items(all).to_vec();
    let page = PageInfo {
        number: pager.current_page_number(),
        count: pager.page_count(all.len()),
        total: all.len(),
    };
    (items, page)
}

//! In-process publish/subscribe for domain and UI-request events.
//!
//! # Responsibility
//! - Map each `EventType` to an ordered list of handlers.
//! - Dispatch published events synchronously, in subscription order.
//!
//! # Invariants
//! - Handlers receive the shared context as `&mut C`; the bus holds no
//!   domain state of its own.
//! - A handler cannot publish through the bus it is registered on; follow-up
//!   events are published by the caller after `publish` returns.

use crate::model::note::{Note, NoteId};
use crate::model::project::{ProjectId, ProjectSummary};
use crate::model::tag::{normalize_tag_name, UnknownTagError};
use crate::model::task::{Task, TaskId};
use log::trace;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Closed set of event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    ProjectCreated,
    ProjectDeleted,
    TaskCreated,
    TaskDeleted,
    TaskEdited,
    NoteCreated,
    NoteDeleted,
    NoteEdited,
    ProjectDeleteRequested,
    TaskDeleteRequested,
    NoteDeleteRequested,
    TaskViewRequested,
    NoteViewRequested,
    TaskEditRequested,
    NoteEditRequested,
}

impl EventType {
    /// Events describing a completed store mutation.
    pub const DOMAIN: [EventType; 8] = [
        EventType::ProjectCreated,
        EventType::ProjectDeleted,
        EventType::TaskCreated,
        EventType::TaskDeleted,
        EventType::TaskEdited,
        EventType::NoteCreated,
        EventType::NoteDeleted,
        EventType::NoteEdited,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectCreated => "project_created",
            Self::ProjectDeleted => "project_deleted",
            Self::TaskCreated => "task_created",
            Self::TaskDeleted => "task_deleted",
            Self::TaskEdited => "task_edited",
            Self::NoteCreated => "note_created",
            Self::NoteDeleted => "note_deleted",
            Self::NoteEdited => "note_edited",
            Self::ProjectDeleteRequested => "project_delete_requested",
            Self::TaskDeleteRequested => "task_delete_requested",
            Self::NoteDeleteRequested => "note_delete_requested",
            Self::TaskViewRequested => "task_view_requested",
            Self::NoteViewRequested => "note_view_requested",
            Self::TaskEditRequested => "task_edit_requested",
            Self::NoteEditRequested => "note_edit_requested",
        }
    }
}

impl Display for EventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_tag_name(value);
        [
            Self::ProjectCreated,
            Self::ProjectDeleted,
            Self::TaskCreated,
            Self::TaskDeleted,
            Self::TaskEdited,
            Self::NoteCreated,
            Self::NoteDeleted,
            Self::NoteEdited,
            Self::ProjectDeleteRequested,
            Self::TaskDeleteRequested,
            Self::NoteDeleteRequested,
            Self::TaskViewRequested,
            Self::NoteViewRequested,
            Self::TaskEditRequested,
            Self::NoteEditRequested,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == normalized)
        .ok_or_else(|| UnknownTagError::new("event_type", value))
    }
}

/// Event with the minimal payload subscribers need to decide relevance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ProjectCreated(ProjectSummary),
    ProjectDeleted(ProjectId),
    TaskCreated { task: Task, project_id: ProjectId },
    TaskDeleted(TaskId),
    TaskEdited(TaskId),
    NoteCreated { note: Note, project_id: ProjectId },
    NoteDeleted(NoteId),
    NoteEdited(NoteId),
    ProjectDeleteRequested(ProjectId),
    TaskDeleteRequested(TaskId),
    NoteDeleteRequested(NoteId),
    TaskViewRequested(TaskId),
    NoteViewRequested(NoteId),
    TaskEditRequested(TaskId),
    NoteEditRequested(NoteId),
}

impl Event {
    pub fn kind(&self) -> EventType {
        match self {
            Self::ProjectCreated(_) => EventType::ProjectCreated,
            Self::ProjectDeleted(_) => EventType::ProjectDeleted,
            Self::TaskCreated { .. } => EventType::TaskCreated,
            Self::TaskDeleted(_) => EventType::TaskDeleted,
            Self::TaskEdited(_) => EventType::TaskEdited,
            Self::NoteCreated { .. } => EventType::NoteCreated,
            Self::NoteDeleted(_) => EventType::NoteDeleted,
            Self::NoteEdited(_) => EventType::NoteEdited,
            Self::ProjectDeleteRequested(_) => EventType::ProjectDeleteRequested,
            Self::TaskDeleteRequested(_) => EventType::TaskDeleteRequested,
            Self::NoteDeleteRequested(_) => EventType::NoteDeleteRequested,
            Self::TaskViewRequested(_) => EventType::TaskViewRequested,
            Self::NoteViewRequested(_) => EventType::NoteViewRequested,
            Self::TaskEditRequested(_) => EventType::TaskEditRequested,
            Self::NoteEditRequested(_) => EventType::NoteEditRequested,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<C> = Box<dyn Fn(&mut C, &Event)>;

/// Synchronous observer registry keyed by event tag.
pub struct EventBus<C> {
    handlers: HashMap<EventType, Vec<(SubscriptionId, Handler<C>)>>,
    next_id: u64,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            next_id: 0,
        }
    }

    /// Appends `handler` to the subscriber list of `kind`.
    pub fn subscribe<F>(&mut self, kind: EventType, handler: F) -> SubscriptionId
    where
        F: Fn(&mut C, &Event) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Removes a subscription; returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for handlers in self.handlers.values_mut() {
            if let Some(index) = handlers.iter().position(|(existing, _)| *existing == id) {
                handlers.remove(index);
                return true;
            }
        }
        false
    }

    /// Runs every handler of `event.kind()` in subscription order.
    ///
    /// Returns the number of handlers invoked.
    pub fn publish(&self, context: &mut C, event: &Event) -> usize {
        let Some(handlers) = self.handlers.get(&event.kind()) else {
            return 0;
        };
        trace!(
            "event=bus_publish module=events kind={} subscribers={}",
            event.kind(),
            handlers.len()
        );
        for (_, handler) in handlers {
            handler(context, event);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, kind: EventType) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

use chrono::{TimeZone, Utc};
use taskboard_core::{
    MemoryProjectStorage, Note, Priority, Project, ProjectStorage, ProjectStore, Status,
    StorageError, StoreError, Task, TaskDetails, DEFAULT_PROJECT_TITLE,
};

fn details(title: &str) -> TaskDetails {
    TaskDetails {
        title: title.to_string(),
        description: "write it down".to_string(),
        due_date: Utc.with_ymd_and_hms(2025, 9, 17, 0, 0, 0).unwrap(),
        priority: Priority::High,
        trackable: false,
    }
}

fn store_with_project(title: &str) -> (ProjectStore<MemoryProjectStorage>, Project) {
    let mut store = ProjectStore::new(MemoryProjectStorage::new());
    let project = Project::new(title);
    store.add_project(project.clone()).unwrap();
    (store, project)
}

#[test]
fn single_project_summary_after_add() {
    let (store, project) = store_with_project("Home");

    let summaries = store.all_projects();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, project.id);
    assert_eq!(summaries[0].title, "Home");
    assert_eq!(summaries[0].tasks, 0);
    assert_eq!(summaries[0].notes, 0);
    assert_eq!(store.storage().len(), 1);
}

#[test]
fn blank_project_title_is_rejected_before_storage() {
    let mut store = ProjectStore::new(MemoryProjectStorage::new());

    let err = store.add_project(Project::new("   ")).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(store.is_empty());
    assert!(store.storage().is_empty());
}

#[test]
fn add_then_delete_task_round_trips() {
    let (mut store, project) = store_with_project("Home");
    store.select_project(project.id).unwrap();

    let task = Task::new(details("Laundry"), Status::NotStarted);
    store.add_task(task.clone(), None).unwrap();
    assert_eq!(store.all_tasks().unwrap(), vec![task.summary()]);
    assert_eq!(store.task_name(task.id), Some("Laundry"));

    store.delete_task(task.id).unwrap();
    assert_eq!(store.all_tasks().unwrap(), Vec::new());

    let stored = store.storage().retrieve_all_projects().unwrap();
    assert!(stored[0].tasks().is_empty());
}

#[test]
fn add_task_to_explicit_project_ignores_selection() {
    let (mut store, home) = store_with_project("Home");
    let work = Project::new("Work");
    store.add_project(work.clone()).unwrap();
    store.select_project(home.id).unwrap();

    let task = Task::new(details("Report"), Status::InProgress);
    store.add_task(task.clone(), Some(work.id)).unwrap();

    assert!(store.all_tasks().unwrap().is_empty());
    assert_eq!(store.project(work.id).unwrap().tasks(), &[task]);
}

#[test]
fn operations_without_selection_fail() {
    let (mut store, _) = store_with_project("Home");
    let task = Task::new(details("Orphan"), Status::NotStarted);

    assert!(matches!(
        store.add_task(task.clone(), None),
        Err(StoreError::NoProjectSelected)
    ));
    assert!(matches!(
        store.delete_task(task.id),
        Err(StoreError::NoProjectSelected)
    ));
    assert!(store.all_tasks().is_none());
    assert!(store.all_notes().is_none());
}

#[test]
fn failed_add_task_rolls_back_memory() {
    let (mut store, project) = store_with_project("Home");
    store.select_project(project.id).unwrap();
    store.storage_mut().set_available(false);

    let task = Task::new(details("Never stored"), Status::NotStarted);
    let err = store.add_task(task, None).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Persistence(StorageError::Unavailable)
    ));
    assert!(store.all_tasks().unwrap().is_empty());
}

#[test]
fn quota_failure_restores_deleted_note_position() {
    let (mut store, project) = store_with_project("Home");
    store.select_project(project.id).unwrap();
    let first = Note::new("first", "a");
    let second = Note::new("second", "b");
    store.add_note(first.clone(), None).unwrap();
    store.add_note(second.clone(), None).unwrap();

    store.storage_mut().set_quota(Some(1));
    assert!(matches!(
        store.delete_note(first.id),
        Err(StoreError::Persistence(StorageError::QuotaExceeded { .. }))
    ));
    assert_eq!(store.all_notes().unwrap(), &[first, second]);
}

#[test]
fn failed_edits_restore_previous_values() {
    let (mut store, project) = store_with_project("Home");
    store.select_project(project.id).unwrap();
    let task = Task::new(details("Original"), Status::NotStarted);
    let note = Note::new("Title", "Body");
    store.add_task(task.clone(), None).unwrap();
    store.add_note(note.clone(), None).unwrap();

    store.storage_mut().set_available(false);
    assert!(store.edit_task_status(task.id, Status::Done).is_err());
    assert!(store.edit_task_details(task.id, details("Changed")).is_err());
    assert!(store.edit_note(note.id, "New", "Text").is_err());

    assert_eq!(store.task_details(task.id).unwrap(), task.details());
    assert_eq!(store.all_tasks().unwrap()[0].status, Status::NotStarted);
    assert_eq!(store.note(note.id).unwrap(), &note);
}

#[test]
fn edits_are_written_through() {
    let (mut store, project) = store_with_project("Home");
    store.select_project(project.id).unwrap();
    let task = Task::new(details("Original"), Status::NotStarted);
    store.add_task(task.clone(), None).unwrap();

    store.edit_task_status(task.id, Status::Done).unwrap();
    store.edit_task_details(task.id, details("Renamed")).unwrap();

    let stored = store.storage().retrieve_all_projects().unwrap();
    let stored_task = stored[0].task(task.id).unwrap();
    assert_eq!(stored_task.title, "Renamed");
    assert_eq!(stored_task.status, Status::Done);
}

#[test]
fn default_project_is_created_once() {
    let mut store = ProjectStore::new(MemoryProjectStorage::new());

    let id = store.initialize_default_project().unwrap();
    assert!(store.initialize_default_project().is_none());

    let summaries = store.all_projects();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, id);
    assert_eq!(summaries[0].title, DEFAULT_PROJECT_TITLE);
    assert_eq!(store.storage().len(), 1);
}

#[test]
fn default_project_survives_unavailable_storage() {
    let mut storage = MemoryProjectStorage::new();
    storage.set_available(false);
    let mut store = ProjectStore::new(storage);

    assert!(store.initialize_default_project().is_some());
    assert_eq!(store.len(), 1);
}

#[test]
fn deleting_selected_project_clears_selection() {
    let (mut store, project) = store_with_project("Home");
    store.select_project(project.id).unwrap();

    store.delete_project(project.id).unwrap();

    assert!(store.selected_project_id().is_none());
    assert!(store.is_empty());
    assert!(store.storage().is_empty());
    assert!(matches!(
        store.delete_project(project.id),
        Err(StoreError::ProjectNotFound(_))
    ));
}

#[test]
fn load_from_storage_restores_saved_projects() {
    let (store, project) = store_with_project("Home");
    let raw = store.storage().raw_entry(project.id).unwrap().to_string();

    let mut storage = MemoryProjectStorage::new();
    storage.insert_raw(project.id.to_string(), raw);
    let mut reloaded = ProjectStore::new(storage);

    assert_eq!(reloaded.load_from_storage().unwrap(), 1);
    assert_eq!(reloaded.project_name(Some(project.id)), Some("Home"));
    assert!(reloaded.initialize_default_project().is_none());
}

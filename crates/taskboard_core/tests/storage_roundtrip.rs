use chrono::{Duration, Utc};
use taskboard_core::db::{open_db, open_db_in_memory};
use taskboard_core::repo::project_repo::encode_project;
use taskboard_core::{
    MemoryProjectStorage, Note, Priority, Project, ProjectStorage, ProjectStore,
    SqliteProjectStorage, Status, StorageError, Task, TaskDetails,
};

fn sample_project(title: &str) -> Project {
    let mut project = Project::new(title);
    project.insert_task(Task::new(
        TaskDetails {
            title: "Ship".to_string(),
            description: "release build".to_string(),
            due_date: Utc::now() + Duration::days(3),
            priority: Priority::Urgent,
            trackable: true,
        },
        Status::InProgress,
    ));
    project.insert_note(Note::new("Ideas", "more tests"));
    project
}

#[test]
fn sqlite_round_trip_keeps_due_date_instant() {
    let mut storage = SqliteProjectStorage::try_new(open_db_in_memory().unwrap()).unwrap();
    let project = sample_project("Release");

    storage.save_project(&project).unwrap();
    let loaded = storage.retrieve_all_projects().unwrap();

    assert_eq!(loaded, vec![project.clone()]);
    assert_eq!(
        loaded[0].tasks()[0].due_date.timestamp_millis(),
        project.tasks()[0].due_date.timestamp_millis()
    );
}

#[test]
fn memory_round_trip_matches_sqlite_format() {
    let mut memory = MemoryProjectStorage::new();
    let project = sample_project("Release");

    memory.save_project(&project).unwrap();

    assert_eq!(
        memory.raw_entry(project.id).unwrap(),
        encode_project(&project).unwrap()
    );
    assert_eq!(memory.retrieve_all_projects().unwrap(), vec![project]);
}

#[test]
fn resave_replaces_and_keeps_creation_order() {
    let mut storage = SqliteProjectStorage::try_new(open_db_in_memory().unwrap()).unwrap();
    let mut first = sample_project("First");
    let second = sample_project("Second");
    storage.save_project(&first).unwrap();
    storage.save_project(&second).unwrap();

    first.title = "First, renamed".to_string();
    storage.save_project(&first).unwrap();

    let titles: Vec<String> = storage
        .retrieve_all_projects()
        .unwrap()
        .into_iter()
        .map(|project| project.title)
        .collect();
    assert_eq!(titles, vec!["First, renamed", "Second"]);

    storage.remove_project(first.id).unwrap();
    storage.remove_project(first.id).unwrap();
    assert_eq!(storage.retrieve_all_projects().unwrap().len(), 1);
}

#[test]
fn store_state_survives_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    let (project_id, task_id) = {
        let storage = SqliteProjectStorage::try_new(open_db(&path).unwrap()).unwrap();
        let mut store = ProjectStore::new(storage);
        let project = Project::new("Garden");
        let project_id = project.id;
        store.add_project(project).unwrap();
        store.select_project(project_id).unwrap();
        let task = sample_project("scratch").tasks()[0].clone();
        let task_id = task.id;
        store.add_task(task, None).unwrap();
        store.edit_task_status(task_id, Status::Done).unwrap();
        (project_id, task_id)
    };

    let storage = SqliteProjectStorage::try_new(open_db(&path).unwrap()).unwrap();
    let mut store = ProjectStore::new(storage);
    assert_eq!(store.load_from_storage().unwrap(), 1);
    assert!(store.initialize_default_project().is_none());

    store.select_project(project_id).unwrap();
    let tasks = store.all_tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task_id);
    assert_eq!(tasks[0].status, Status::Done);
}

#[test]
fn unmigrated_connection_is_rejected() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();

    let err = SqliteProjectStorage::try_new(conn).err().unwrap();
    assert!(matches!(
        err,
        StorageError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

#[test]
fn corrupted_entries_are_skipped_by_both_backends() {
    let project = sample_project("Release");
    let mut memory = MemoryProjectStorage::new();
    memory.insert_raw(uuid::Uuid::new_v4().to_string(), "not json");
    memory.save_project(&project).unwrap();

    assert_eq!(memory.retrieve_all_projects().unwrap(), vec![project.clone()]);

    let mut storage = SqliteProjectStorage::try_new(open_db_in_memory().unwrap()).unwrap();
    storage
        .connection()
        .execute(
            "INSERT INTO projects (id, payload) VALUES (?1, ?2);",
            rusqlite::params![
                uuid::Uuid::new_v4().to_string(),
                encode_project(&project).unwrap()
            ],
        )
        .unwrap();
    storage
        .connection()
        .execute(
            "INSERT INTO projects (id, payload) VALUES ('garbage', '{');",
            [],
        )
        .unwrap();
    storage.save_project(&project).unwrap();

    assert_eq!(storage.retrieve_all_projects().unwrap(), vec![project]);
}

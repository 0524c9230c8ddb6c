use rusqlite::Connection;
use taskboard_core::db::migrations::{current_user_version, latest_version};
use taskboard_core::db::{open_db, open_db_in_dir, open_db_in_memory, DbError, DB_FILE_NAME};

#[test]
fn in_memory_database_reaches_latest_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "projects");
    assert_column_exists(&conn, "projects", "created_seq");
}

#[test]
fn reopening_a_file_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO projects (id, payload) VALUES ('p1', '{}');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(current_user_version(&second).unwrap(), latest_version());
    let rows: i64 = second
        .query_row("SELECT COUNT(*) FROM projects;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn open_in_dir_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    let conn = open_db_in_dir(&nested).unwrap();
    assert!(nested.join(DB_FILE_NAME).exists());
    assert_table_exists(&conn, "projects");
}

#[test]
fn unmigrated_file_is_rejected_until_opened() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.sqlite3");
    let conn = Connection::open(&path).unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), 0);
    assert!(taskboard_core::SqliteProjectStorage::try_new(conn).is_err());
    assert_eq!(
        current_user_version(&open_db(&path).unwrap()).unwrap(),
        latest_version()
    );
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

fn assert_column_exists(conn: &Connection, table_name: &str, column: &str) {
    let columns: Vec<String> = conn
        .prepare(&format!("PRAGMA table_info({table_name});"))
        .unwrap()
        .query_map([], |row| row.get(1))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(
        columns.iter().any(|name| name == column),
        "column {column} missing from {table_name}"
    );
}

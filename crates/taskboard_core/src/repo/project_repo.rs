//! Project storage contract, stored format and SQLite implementation.
//!
//! # Responsibility
//! - Define the durable key-value contract the project store writes through.
//! - Convert projects to and from their stored JSON shape.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - One entry per project, keyed by the project id string.
//! - Stored value is `{ title, tasks: [[id, task]...], notes: [[id, note]...], id }`.
//! - Read paths skip, and log, entries that fail to decode or whose key and
//!   embedded ids disagree; one bad entry never hides the others.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use crate::model::project::{Project, ProjectId};
use crate::model::task::{Task, TaskId};
use log::error;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failures of the durable project storage.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
    /// Writing would grow storage past its byte quota.
    QuotaExceeded { required: usize, quota: usize },
    /// Storage backend cannot be used at all.
    Unavailable,
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "project serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored project data: {message}"),
            Self::QuotaExceeded { required, quota } => write!(
                f,
                "storage quota exceeded: {required} bytes required, quota is {quota}"
            ),
            Self::Unavailable => write!(f, "project storage is unavailable"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Durable key-value storage for whole projects.
pub trait ProjectStorage {
    /// Writes the full project under its id, replacing any previous value.
    fn save_project(&mut self, project: &Project) -> StorageResult<()>;
    /// Removes the entry for `id`; removing an absent entry succeeds.
    fn remove_project(&mut self, id: ProjectId) -> StorageResult<()>;
    /// Reads every decodable stored project; empty when nothing is stored.
    ///
    /// Entries that fail to decode are logged and skipped. Errors are
    /// reserved for the backend itself being unreadable.
    fn retrieve_all_projects(&self) -> StorageResult<Vec<Project>>;
}

/// Stored shape of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProject {
    pub title: String,
    pub tasks: Vec<(TaskId, Task)>,
    pub notes: Vec<(NoteId, Note)>,
    pub id: ProjectId,
}

/// Converts a project into its stored shape.
pub fn project_to_storage_format(project: &Project) -> StoredProject {
    StoredProject {
        title: project.title.clone(),
        tasks: project
            .tasks()
            .iter()
            .map(|task| (task.id, task.clone()))
            .collect(),
        notes: project
            .notes()
            .iter()
            .map(|note| (note.id, note.clone()))
            .collect(),
        id: project.id,
    }
}

/// Rebuilds a project from its stored shape.
///
/// # Errors
/// - `InvalidData` when an entry key differs from the embedded entity id.
pub fn project_from_storage_format(stored: StoredProject) -> StorageResult<Project> {
    let mut project = Project::with_id(stored.id, stored.title);

    for (key, task) in stored.tasks {
        if key != task.id {
            return Err(StorageError::InvalidData(format!(
                "task key `{key}` does not match task id `{}` in project `{}`",
                task.id, stored.id
            )));
        }
        project.insert_task(task);
    }

    for (key, note) in stored.notes {
        if key != note.id {
            return Err(StorageError::InvalidData(format!(
                "note key `{key}` does not match note id `{}` in project `{}`",
                note.id, stored.id
            )));
        }
        project.insert_note(note);
    }

    Ok(project)
}

/// Serializes a project into its stored JSON text.
pub fn encode_project(project: &Project) -> StorageResult<String> {
    Ok(serde_json::to_string(&project_to_storage_format(project))?)
}

/// Parses stored JSON text back into a project.
pub fn decode_project(payload: &str) -> StorageResult<Project> {
    let stored: StoredProject = serde_json::from_str(payload)?;
    project_from_storage_format(stored)
}

/// Decodes one stored entry and checks it against its key.
///
/// # Errors
/// - `InvalidData` when the key is not a uuid or differs from the stored id.
/// - `Serialization` when the payload is not a stored project.
pub fn decode_entry(key: &str, payload: &str) -> StorageResult<Project> {
    let key_id = Uuid::parse_str(key)
        .map_err(|_| StorageError::InvalidData(format!("invalid project key `{key}`")))?;
    let project = decode_project(payload)?;
    if project.id != key_id {
        return Err(StorageError::InvalidData(format!(
            "project key `{key}` does not match stored id `{}`",
            project.id
        )));
    }
    Ok(project)
}

/// Decodes `entries`, dropping the ones that fail with an error log.
pub(crate) fn decode_readable<'a>(
    backend: &'static str,
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<Project> {
    entries
        .into_iter()
        .filter_map(|(key, payload)| match decode_entry(key, payload) {
            Ok(project) => Some(project),
            Err(err) => {
                error!(
                    "event=project_read module=repo status=error error_code=entry_skipped backend={backend} key={key} error={err}"
                );
                None
            }
        })
        .collect()
}

/// SQLite-backed project storage.
pub struct SqliteProjectStorage {
    conn: Connection,
}

impl SqliteProjectStorage {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` when the `projects` table is absent.
    pub fn try_new(conn: Connection) -> StorageResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl ProjectStorage for SqliteProjectStorage {
    fn save_project(&mut self, project: &Project) -> StorageResult<()> {
        let payload = encode_project(project)?;
        self.conn.execute(
            "INSERT INTO projects (id, payload, created_seq)
             VALUES (?1, ?2, (SELECT COALESCE(MAX(created_seq), 0) + 1 FROM projects))
             ON CONFLICT(id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![project.id.to_string(), payload],
        )?;
        Ok(())
    }

    fn remove_project(&mut self, id: ProjectId) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }

    /// Reads projects in creation order; undecodable rows are skipped.
    fn retrieve_all_projects(&self) -> StorageResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, payload FROM projects ORDER BY created_seq ASC, id ASC;")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>("id")?, row.get::<_, String>("payload")?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(decode_readable(
            "sqlite",
            rows.iter().map(|(key, payload)| (key.as_str(), payload.as_str())),
        ))
    }
}

fn ensure_connection_ready(conn: &Connection) -> StorageResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(StorageError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'projects'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(StorageError::MissingRequiredTable("projects"));
    }

    Ok(())
}

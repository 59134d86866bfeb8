//! SQLite-backed persistence for principals and documents.
//!
//! Tables:
//! - `users`: id, email (unique), password_hash
//! - `documents`: id, title, content, owner_id, created_at, updated_at
//!
//! # Invariants
//! - At most one `users` row per email. The unique constraint is the only
//!   arbiter, so two racing registrations cannot both succeed.
//! - Every document lookup and update is filtered by `owner_id` in the same
//!   statement that filters by `id`.
//! - Timestamps are stored as milliseconds since the Unix epoch.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

/// Principal (user account) identifier.
pub type PrincipalId = i64;
/// Document identifier.
pub type DocumentId = i64;

const DOCUMENT_COLUMNS: &str = "id, title, content, owner_id, created_at, updated_at";

/// A registered account.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: String,
    pub password_hash: String,
}

impl std::fmt::Debug for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    pub owner_id: PrincipalId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Errors that can occur during store operations.
#[derive(Debug)]
pub enum StoreError {
    /// SQLite reported an error.
    Sqlite(rusqlite::Error),
    /// A row with the same unique key already exists.
    Conflict,
    /// The connection mutex was poisoned by a panicking thread.
    LockPoisoned,
    /// The database directory could not be created.
    Io(std::io::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(e) => write!(f, "sqlite error: {e}"),
            Self::Conflict => write!(f, "unique constraint violated"),
            Self::LockPoisoned => write!(f, "store lock poisoned"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Conflict | Self::LockPoisoned => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Relational store for principals and their documents.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the database at the given path.
    ///
    /// Missing parent directories are created.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        // WAL mode for concurrent reads + crash safety
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Self::init(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_documents_owner ON documents(owner_id, updated_at);",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    // ── Principals ──────────────────────────────────────────────────

    pub fn get_principal_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, StoreError> {
        let conn = self.conn()?;
        let principal = conn
            .query_row(
                "SELECT id, email, password_hash FROM users WHERE id = ?1",
                params![id],
                principal_from_row,
            )
            .optional()?;
        Ok(principal)
    }

    /// Look up a principal by email. The comparison is case-sensitive.
    pub fn get_principal_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError> {
        let conn = self.conn()?;
        let principal = conn
            .query_row(
                "SELECT id, email, password_hash FROM users WHERE email = ?1",
                params![email],
                principal_from_row,
            )
            .optional()?;
        Ok(principal)
    }

    /// Insert a new principal.
    ///
    /// # Errors
    /// Returns `StoreError::Conflict` if the email is already registered; the
    /// table is left unchanged in that case.
    pub fn insert_principal(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Principal, StoreError> {
        let conn = self.conn()?;
        let result = conn.execute(
            "INSERT INTO users (email, password_hash) VALUES (?1, ?2)",
            params![email, password_hash],
        );

        match result {
            Ok(_) => Ok(Principal {
                id: conn.last_insert_rowid(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
            }),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(StoreError::Conflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a principal and their documents.
    ///
    /// No request path reaches this; it exists for administration.
    pub fn delete_principal(&self, id: PrincipalId) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // ── Documents ───────────────────────────────────────────────────

    pub fn insert_document(
        &self,
        owner_id: PrincipalId,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Document, StoreError> {
        let conn = self.conn()?;
        let millis = now.timestamp_millis();
        conn.execute(
            "INSERT INTO documents (title, content, owner_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![title, content, owner_id, millis],
        )?;
        let id = conn.last_insert_rowid();

        let document = conn.query_row(
            &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"),
            params![id],
            document_from_row,
        )?;
        Ok(document)
    }

    /// Fetch a document only if it belongs to `owner_id`.
    pub fn get_document(
        &self,
        id: DocumentId,
        owner_id: PrincipalId,
    ) -> Result<Option<Document>, StoreError> {
        let conn = self.conn()?;
        let document = conn
            .query_row(
                &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1 AND owner_id = ?2"),
                params![id, owner_id],
                document_from_row,
            )
            .optional()?;
        Ok(document)
    }

    /// All documents of `owner_id`, most recently updated first.
    pub fn list_documents(&self, owner_id: PrincipalId) -> Result<Vec<Document>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents
             WHERE owner_id = ?1
             ORDER BY updated_at DESC, id DESC"
        ))?;
        let documents = stmt
            .query_map(params![owner_id], document_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(documents)
    }

    /// Update the given fields of a document owned by `owner_id`.
    ///
    /// `None` fields keep their stored value. Returns `Ok(None)` when no
    /// document with that id belongs to `owner_id`.
    pub fn update_document(
        &self,
        id: DocumentId,
        owner_id: PrincipalId,
        title: Option<&str>,
        content: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<Document>, StoreError> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE documents
             SET title = COALESCE(?1, title),
                 content = COALESCE(?2, content),
                 updated_at = ?3
             WHERE id = ?4 AND owner_id = ?5",
            params![title, content, now.timestamp_millis(), id, owner_id],
        )?;
        if updated == 0 {
            return Ok(None);
        }

        let document = conn.query_row(
            &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1 AND owner_id = ?2"),
            params![id, owner_id],
            document_from_row,
        )?;
        Ok(Some(document))
    }
}

fn principal_from_row(row: &Row<'_>) -> rusqlite::Result<Principal> {
    Ok(Principal {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
    })
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        owner_id: row.get(3)?,
        created_at: timestamp_from_millis(row, 4)?,
        updated_at: timestamp_from_millis(row, 5)?,
    })
}

fn timestamp_from_millis(row: &Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(index)?;
    DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(index, millis))
}

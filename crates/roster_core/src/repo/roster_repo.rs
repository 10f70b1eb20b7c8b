//! Roster repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the whole roster as one JSON document under a fixed key.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Saves replace the stored document atomically (single upsert).
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::person::Person;
use crate::model::roster::Roster;
use crate::model::zone::ZoneRegistry;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized roster.
pub const ROSTER_STORAGE_KEY: &str = "roster.staff.v1";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for roster persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Stored document cannot be decoded or breaks roster invariants.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted roster data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "roster repository requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for the roster document.
pub trait RosterRepository {
    /// Loads the stored roster; `Ok(None)` when nothing was saved yet.
    fn load_roster(&self, registry: &ZoneRegistry) -> RepoResult<Option<Roster>>;
    /// Replaces the stored roster with `persons`.
    fn save_roster(&self, persons: &[Person]) -> RepoResult<()>;
    /// Deletes the stored roster. Idempotent.
    fn clear_roster(&self) -> RepoResult<()>;
}

/// SQLite-backed roster repository over the `local_storage` table.
pub struct SqliteRosterRepository<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteRosterRepository<'conn> {
    /// Creates a repository after checking the connection is migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::try_with_key(conn, ROSTER_STORAGE_KEY)
    }

    /// Same as `try_new`, storing under a custom key.
    pub fn try_with_key(conn: &'conn Connection, key: impl Into<String>) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self {
            conn,
            key: key.into(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl RosterRepository for SqliteRosterRepository<'_> {
    fn load_roster(&self, registry: &ZoneRegistry) -> RepoResult<Option<Roster>> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(json) = stored else {
            return Ok(None);
        };
        parse_roster_document(&json, registry).map(Some)
    }

    fn save_roster(&self, persons: &[Person]) -> RepoResult<()> {
        let json = serde_json::to_string(persons)
            .map_err(|err| RepoError::InvalidData(format!("cannot encode roster: {err}")))?;

        self.conn.execute(
            "INSERT INTO local_storage (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), json],
        )?;
        Ok(())
    }

    fn clear_roster(&self) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM local_storage WHERE key = ?1;",
            [self.key.as_str()],
        )?;
        Ok(())
    }
}

/// Decodes a stored roster document and checks roster invariants.
pub fn parse_roster_document(json: &str, registry: &ZoneRegistry) -> RepoResult<Roster> {
    let persons: Vec<Person> = serde_json::from_str(json)
        .map_err(|err| RepoError::InvalidData(format!("cannot decode roster: {err}")))?;
    let roster = Roster::new(persons);
    roster
        .check_integrity(registry)
        .map_err(RepoError::InvalidData)?;
    Ok(roster)
}

//! Per-project snapshot persistence.
//!
//! # Responsibility
//! - Define the load/save contract the services depend on.
//! - Provide a SQLite-backed implementation storing JSON snapshots.
//!
//! # Invariants
//! - `load` resolves to `None` when nothing was saved for the project.
//! - Loaded snapshots are validated; invalid data is an error, not a default.

mod sqlite;

pub use sqlite::SqliteSnapshotStore;

use crate::db::DbError;
use crate::model::improvement::ImprovementState;
use crate::model::metric::MetricState;
use crate::worklog::is_valid_day;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug)]
pub enum PersistenceError {
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData {
        feature: &'static str,
        project_id: String,
        message: String,
    },
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "snapshot serialization failed: {err}"),
            Self::InvalidData {
                feature,
                project_id,
                message,
            } => write!(
                f,
                "invalid persisted {feature} snapshot for project `{project_id}`: {message}"
            ),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData { .. } => None,
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// State that can be stored as one per-project snapshot.
pub trait Snapshot: Serialize + DeserializeOwned {
    /// Storage key distinguishing feature snapshots of one project.
    const FEATURE: &'static str;

    fn check(&self) -> Result<(), String>;
}

impl Snapshot for ImprovementState {
    const FEATURE: &'static str = "improvement";

    fn check(&self) -> Result<(), String> {
        self.validate().map_err(|err| err.to_string())
    }
}

impl Snapshot for MetricState {
    const FEATURE: &'static str = "metric";

    fn check(&self) -> Result<(), String> {
        if self.ids.len() != self.entities.len() {
            return Err("metric ids and entities disagree".to_string());
        }
        for id in &self.ids {
            match self.entities.get(id) {
                Some(metric) if &metric.id == id && is_valid_day(id) => {}
                _ => return Err(format!("invalid metric entry `{id}`")),
            }
        }
        Ok(())
    }
}

/// Load/save contract for one snapshot type.
pub trait SnapshotPersistence<S: Snapshot> {
    /// Returns the saved snapshot, or `None` if the project has none.
    fn load(&self, project_id: &str) -> PersistenceResult<Option<S>>;
    /// Replaces the saved snapshot for the project.
    fn save(&self, project_id: &str, state: &S) -> PersistenceResult<()>;
}

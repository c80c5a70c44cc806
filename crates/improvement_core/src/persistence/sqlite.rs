//! SQLite snapshot store over `project_snapshots`.

use super::{PersistenceError, PersistenceResult, Snapshot, SnapshotPersistence};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::time::Instant;

/// Stores one JSON payload per `(project_id, feature)`.
pub struct SqliteSnapshotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Project ids that have a snapshot for `feature`, most recent first.
    pub fn list_projects(&self, feature: &str) -> PersistenceResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT project_id
             FROM project_snapshots
             WHERE feature = ?1
             ORDER BY updated_at DESC, project_id ASC;",
        )?;
        let rows = stmt.query_map([feature], |row| row.get::<_, String>(0))?;
        let mut projects = Vec::new();
        for row in rows {
            projects.push(row?);
        }
        Ok(projects)
    }

    /// Deletes the snapshot for one feature. Returns whether a row existed.
    pub fn delete(&self, project_id: &str, feature: &str) -> PersistenceResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM project_snapshots WHERE project_id = ?1 AND feature = ?2;",
            params![project_id, feature],
        )?;
        Ok(changed > 0)
    }
}

impl<S: Snapshot> SnapshotPersistence<S> for SqliteSnapshotStore<'_> {
    fn load(&self, project_id: &str) -> PersistenceResult<Option<S>> {
        let started_at = Instant::now();
        let payload = self
            .conn
            .query_row(
                "SELECT payload
                 FROM project_snapshots
                 WHERE project_id = ?1 AND feature = ?2;",
                params![project_id, S::FEATURE],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            info!(
                "event=snapshot_load module=persistence status=ok feature={} found=false duration_ms={}",
                S::FEATURE,
                started_at.elapsed().as_millis()
            );
            return Ok(None);
        };

        let state = serde_json::from_str::<S>(&payload)
            .map_err(|err| invalid_data::<S>(project_id, err.to_string()))
            .and_then(|state| {
                state
                    .check()
                    .map_err(|message| invalid_data::<S>(project_id, message))?;
                Ok(state)
            });

        match state {
            Ok(state) => {
                info!(
                    "event=snapshot_load module=persistence status=ok feature={} found=true bytes={} duration_ms={}",
                    S::FEATURE,
                    payload.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(Some(state))
            }
            Err(err) => {
                error!(
                    "event=snapshot_load module=persistence status=error feature={} error_code=invalid_snapshot",
                    S::FEATURE
                );
                Err(err)
            }
        }
    }

    fn save(&self, project_id: &str, state: &S) -> PersistenceResult<()> {
        let payload = serde_json::to_string(state)?;
        self.conn.execute(
            "INSERT INTO project_snapshots (project_id, feature, payload)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (project_id, feature) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![project_id, S::FEATURE, payload],
        )?;
        info!(
            "event=snapshot_save module=persistence status=ok feature={} bytes={}",
            S::FEATURE,
            payload.len()
        );
        Ok(())
    }
}

fn invalid_data<S: Snapshot>(project_id: &str, message: String) -> PersistenceError {
    PersistenceError::InvalidData {
        feature: S::FEATURE,
        project_id: project_id.to_string(),
        message,
    }
}

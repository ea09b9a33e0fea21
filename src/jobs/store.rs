/*!
 * SQLite-backed persistence for job records.
 *
 * One table, WAL mode, schema-versioned like the rest of the local state
 * this tool keeps. An in-memory variant exists for tests.
 */

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::errors::JobError;

use super::models::{JobRecord, JobState};

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "subgen.db";

/// Default database directory name under the user's data directory
const DEFAULT_DB_DIRNAME: &str = "subgen";

/// Job registry store with thread-safe connection access
#[derive(Clone)]
pub struct JobStore {
    /// Path to the database file
    db_path: PathBuf,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
}

impl JobStore {
    /// Open the registry at the default location
    pub fn new_default() -> Result<Self> {
        let db_path = Self::default_database_path()?;
        Self::new(&db_path)
    }

    /// Open the registry at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        info!("Opening job registry at: {:?}", db_path);

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;
        initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory registry (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory job registry");

        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;
        initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Default database path under the user's local data directory
    pub fn default_database_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Insert a new job record
    pub fn insert(&self, record: &JobRecord) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO jobs (id, video_path, audio_path, subtitle_path, rendered_path,
                               state, file_hash, language, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.id,
                record.video_path,
                record.audio_path,
                record.subtitle_path,
                record.rendered_path,
                record.state.as_str(),
                record.file_hash,
                record.language,
                record.created_at,
                record.updated_at,
            ],
        )
        .with_context(|| format!("Failed to insert job {}", record.id))?;

        debug!("Registered job {} for {}", record.id, record.video_path);
        Ok(())
    }

    /// Fetch one job record by id
    pub fn get(&self, id: &str) -> Result<JobRecord> {
        let conn = self.lock();
        let record = conn
            .query_row(
                "SELECT id, video_path, audio_path, subtitle_path, rendered_path,
                        state, file_hash, language, created_at, updated_at
                 FROM jobs WHERE id = ?1",
                params![id],
                row_to_record,
            )
            .optional()
            .with_context(|| format!("Failed to query job {}", id))?;

        record.ok_or_else(|| JobError::NotFound(id.to_string()).into())
    }

    /// List all job records, newest first
    pub fn list(&self) -> Result<Vec<JobRecord>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, video_path, audio_path, subtitle_path, rendered_path,
                    state, file_hash, language, created_at, updated_at
             FROM jobs ORDER BY created_at DESC",
        )?;

        let records = stmt
            .query_map([], row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to list jobs")?;

        Ok(records)
    }

    /// Move a job to a new lifecycle state, rejecting invalid transitions
    pub fn transition(&self, id: &str, next: JobState) -> Result<JobRecord> {
        let mut record = self.get(id)?;
        record.state = record.state.checked_transition(next)?;
        record.updated_at = chrono::Utc::now().to_rfc3339();

        let conn = self.lock();
        conn.execute(
            "UPDATE jobs SET state = ?1, updated_at = ?2 WHERE id = ?3",
            params![record.state.as_str(), record.updated_at, record.id],
        )
        .with_context(|| format!("Failed to update state of job {}", id))?;

        debug!("Job {} -> {}", id, next);
        Ok(record)
    }

    /// Record the audio artifact of a job
    pub fn set_audio_path(&self, id: &str, path: &Path) -> Result<()> {
        self.set_artifact(id, "audio_path", path)
    }

    /// Record the subtitle artifact of a job
    pub fn set_subtitle_path(&self, id: &str, path: &Path) -> Result<()> {
        self.set_artifact(id, "subtitle_path", path)
    }

    /// Record the rendered artifact of a job
    pub fn set_rendered_path(&self, id: &str, path: &Path) -> Result<()> {
        self.set_artifact(id, "rendered_path", path)
    }

    fn set_artifact(&self, id: &str, column: &str, path: &Path) -> Result<()> {
        // column names are fixed by the three callers above
        let sql = format!(
            "UPDATE jobs SET {} = ?1, updated_at = ?2 WHERE id = ?3",
            column
        );

        let conn = self.lock();
        let updated = conn
            .execute(
                &sql,
                params![
                    path.to_string_lossy().to_string(),
                    chrono::Utc::now().to_rfc3339(),
                    id
                ],
            )
            .with_context(|| format!("Failed to set {} of job {}", column, id))?;

        if updated == 0 {
            return Err(JobError::NotFound(id.to_string()).into());
        }
        Ok(())
    }

    /// Delete a job and all of its recorded artifacts.
    ///
    /// The record is removed first so a crash mid-cleanup cannot leave a
    /// record pointing at half-deleted artifacts; leftover files are reported
    /// and removed on a later attempt by path. The source video is never
    /// touched.
    pub fn delete_with_artifacts(&self, id: &str) -> Result<()> {
        let record = self.get(id)?;

        {
            let conn = self.lock();
            conn.execute("DELETE FROM jobs WHERE id = ?1", params![id])
                .with_context(|| format!("Failed to delete job {}", id))?;
        }

        for path in record.artifact_paths() {
            let path = PathBuf::from(path);
            if path.exists() {
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!("Failed to remove artifact {:?}: {}", path, e);
                }
            }
        }

        info!("Deleted job {} and its artifacts", id);
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // Mutex poisoning only happens when another thread panicked while
        // holding the lock; the connection itself is still usable.
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Map a database row to a job record
fn row_to_record(row: &Row) -> rusqlite::Result<JobRecord> {
    let state_str: String = row.get(5)?;
    let state = JobState::parse(&state_str).unwrap_or(JobState::Uploaded);

    Ok(JobRecord {
        id: row.get(0)?,
        video_path: row.get(1)?,
        audio_path: row.get(2)?,
        subtitle_path: row.get(3)?,
        rendered_path: row.get(4)?,
        state,
        file_hash: row.get(6)?,
        language: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Initialize the database schema
fn initialize_schema(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing job registry schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Migrating job registry schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        // v1 is the first released schema; nothing to migrate yet
    } else {
        debug!("Job registry schema is up to date (v{})", current_version);
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

fn create_all_tables(conn: &Connection) -> Result<()> {
    // WAL for better concurrency and crash recovery
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS jobs (
            id TEXT PRIMARY KEY,
            video_path TEXT NOT NULL,
            audio_path TEXT,
            subtitle_path TEXT,
            rendered_path TEXT,
            state TEXT NOT NULL,
            file_hash TEXT NOT NULL,
            language TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_jobs_state ON jobs(state);
        CREATE INDEX IF NOT EXISTS idx_jobs_file_hash ON jobs(file_hash);",
    )
    .context("Failed to create job registry tables")?;

    Ok(())
}

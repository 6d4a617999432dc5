//! SQLite search index in the layout Dash expects.
//!
//! The table is rebuilt from scratch on every run. All writes of a run go into
//! one transaction which is committed by [`IndexStore::finalize`], or by `Drop`
//! if the run bails out early, so the handle is released exactly once on every
//! exit path.

use crate::{Error, IndexEntry, Result, StoredEntry};
use rusqlite::{Connection, params};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const SCHEMA: &str = "
CREATE TABLE searchIndex(id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, type TEXT, path TEXT);
CREATE UNIQUE INDEX anchor ON searchIndex (name, type, path);
";

const INSERT_OR_IGNORE: &str =
    "INSERT OR IGNORE INTO searchIndex(name, type, path) VALUES (?1, ?2, ?3)";

/// Append-only writer for the `searchIndex` table.
pub struct IndexStore {
    conn: Option<Connection>,
    inserted: usize,
    ignored: usize,
}

impl IndexStore {
    /// Delete any index at `path`, then create a fresh one with the schema applied.
    pub fn create(path: &Path) -> Result<Self> {
        if path.is_file() {
            fs::remove_file(path).map_err(|e| {
                Error::Index(format!("cannot remove old index {}: {e}", path.display()))
            })?;
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::Index(format!("cannot create index {}: {e}", path.display())))?;
        debug!("Created search index at {}", path.display());
        Self::with_schema(conn)
    }

    /// Open an in-memory index (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::with_schema(Connection::open_in_memory()?)
    }

    fn with_schema(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        conn.execute_batch("BEGIN")?;
        Ok(Self {
            conn: Some(conn),
            inserted: 0,
            ignored: 0,
        })
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| Error::Index("index already finalized".into()))
    }

    /// Record an entry. A uniqueness conflict is an expected duplicate and
    /// returns `Ok(false)`.
    pub fn insert_ignore(&mut self, entry: &IndexEntry) -> Result<bool> {
        let path = entry.resolved_path();
        let changed = self
            .conn()?
            .prepare_cached(INSERT_OR_IGNORE)?
            .execute(params![entry.name, entry.category.as_str(), path])?;

        if changed == 0 {
            self.ignored += 1;
            debug!(name = %entry.name, category = %entry.category, %path, "duplicate index entry ignored");
            Ok(false)
        } else {
            self.inserted += 1;
            Ok(true)
        }
    }

    /// Rows added during this run.
    pub const fn inserted(&self) -> usize {
        self.inserted
    }

    /// Insert attempts that hit the uniqueness constraint.
    pub const fn ignored(&self) -> usize {
        self.ignored
    }

    /// Number of rows in the table.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM searchIndex", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// All rows ordered by id.
    pub fn entries(&self) -> Result<Vec<StoredEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name, type, path FROM searchIndex ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredEntry {
                name: row.get(0)?,
                kind: row.get(1)?,
                path: row.get(2)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    /// Commit all writes and close the database.
    pub fn finalize(mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => {
                conn.execute_batch("COMMIT")?;
                conn.close().map_err(|(_, e)| Error::from(e))
            },
            None => Ok(()),
        }
    }
}

impl Drop for IndexStore {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = conn.execute_batch("COMMIT") {
                warn!("Failed to commit search index on early exit: {e}");
            }
        }
    }
}

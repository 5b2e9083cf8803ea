//! SQLite connection bootstrap for a Leafnotes workspace file.

use crate::{LeafnotesError, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Columns a `notes` table must carry for the file to be accepted.
const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "title",
    "content",
    "parent_id",
    "is_folder",
    "sort_order",
    "created_at",
    "updated_at",
];

/// Owns the SQLite connection backing a workspace.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Creates the schema in a new database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LeafnotesError::Database`] if the file cannot be opened or
    /// already contains a `notes` table.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::configure(&conn)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Opens an existing workspace database and checks its structure.
    ///
    /// # Errors
    ///
    /// Returns [`LeafnotesError::InvalidWorkspace`] if the file is not a
    /// Leafnotes database, or [`LeafnotesError::Database`] for SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::configure(&conn)?;

        let present: Vec<String> = {
            let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('notes')")?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            names
        };

        if present.is_empty() {
            return Err(LeafnotesError::InvalidWorkspace(
                "Not a valid Leafnotes database".to_string(),
            ));
        }
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|col| !present.iter().any(|p| p == *col))
        {
            return Err(LeafnotesError::InvalidWorkspace(format!(
                "notes table is missing column '{missing}'"
            )));
        }

        Ok(Self { conn })
    }

    /// Creates an empty, schema-only database that lives in memory.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    fn configure(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

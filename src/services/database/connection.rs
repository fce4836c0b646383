use anyhow::{Context, Result};
use rusqlite::Connection;

use super::schema;

/// Thin wrapper around the application's SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at the provided path.
    pub fn new(path: &str) -> Result<Self> {
        let conn =
            Connection::open(path).context(format!("Failed to open database at {}", path))?;
        Ok(Self { conn })
    }

    /// Opens the database and brings its schema up to date.
    pub fn open_initialized(path: &str) -> Result<Self> {
        let db = Self::new(path)?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Provides read/write access to the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates tables and runs migrations.
    pub fn initialize_schema(&self) -> Result<()> {
        schema::initialize_schema(self.connection())
    }

    /// True while a transaction is open and holds uncommitted writes.
    pub fn has_pending_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// Opens a transaction unless one is already open.
    pub fn begin_if_needed(&self) -> Result<()> {
        if self.conn.is_autocommit() {
            self.conn
                .execute_batch("BEGIN")
                .context("Failed to begin transaction")?;
        }
        Ok(())
    }

    /// Commits the open transaction, if any.
    pub fn commit(&self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn
                .execute_batch("COMMIT")
                .context("Failed to commit transaction")?;
        }
        Ok(())
    }

    /// Rolls back the open transaction, if any.
    pub fn rollback(&self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn
                .execute_batch("ROLLBACK")
                .context("Failed to roll back transaction")?;
        }
        Ok(())
    }
}

//! Countdown-related database schema: table creation and migrations.

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub(super) fn create_countdown_tables(conn: &Connection) -> Result<()> {
    // Dates are ISO-8601 calendar dates ("YYYY-MM-DD"), never timestamps.
    // repeat_interval: 0 = never, 1 = weekly, 2 = monthly, 3 = yearly.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS countdowns (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            colour INTEGER NOT NULL DEFAULT 0,
            icon INTEGER NOT NULL DEFAULT 0,
            repeat_interval INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create countdowns table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_countdowns_date ON countdowns(date)",
        [],
    )
    .context("Failed to create countdown date index")?;

    Ok(())
}

pub(super) fn run_countdown_migrations(conn: &Connection) -> Result<()> {
    // Early databases predate icons and the repeat rule.
    migrations::ensure_column(
        conn,
        "countdowns",
        "icon",
        "ALTER TABLE countdowns ADD COLUMN icon INTEGER NOT NULL DEFAULT 0",
    )?;

    migrations::ensure_column(
        conn,
        "countdowns",
        "repeat_interval",
        "ALTER TABLE countdowns ADD COLUMN repeat_interval INTEGER NOT NULL DEFAULT 0",
    )?;

    Ok(())
}

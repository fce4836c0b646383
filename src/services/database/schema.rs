use anyhow::{Context, Result};
use rusqlite::Connection;

use super::schema_countdown;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_app_state_table(conn)?;
    insert_default_app_state(conn)?;
    schema_countdown::create_countdown_tables(conn)?;
    schema_countdown::run_countdown_migrations(conn)?;
    Ok(())
}

fn create_app_state_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            defaults_seeded INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create app_state table")?;

    Ok(())
}

fn insert_default_app_state(conn: &Connection) -> Result<()> {
    conn.execute("INSERT OR IGNORE INTO app_state (id) VALUES (1)", [])
        .context("Failed to insert default app state")?;

    Ok(())
}

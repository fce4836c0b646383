// Database service module
// SQLite database connection and schema management

mod connection;
pub mod migrations;
mod schema;
mod schema_countdown;

pub use connection::Database;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_new_database_in_memory() {
        let result = Database::new(":memory:");
        assert!(result.is_ok(), "Should create in-memory database");
    }

    #[test]
    fn test_new_database_with_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_str().unwrap();

        let result = Database::new(db_path_str);
        assert!(result.is_ok(), "Should create file-based database");
        assert!(Path::new(db_path_str).exists(), "Database file should exist");
    }

    #[test]
    fn test_initialize_schema_is_idempotent() {
        let db = Database::new(":memory:").unwrap();
        assert!(db.initialize_schema().is_ok());
        assert!(db.initialize_schema().is_ok(), "Second run should be a no-op");
    }

    #[test]
    fn test_countdowns_table_exists() {
        let db = Database::open_initialized(":memory:").unwrap();

        let count: i64 = db
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='countdowns'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1, "countdowns table should exist");
    }

    #[test]
    fn test_default_app_state_inserted() {
        let db = Database::open_initialized(":memory:").unwrap();

        let seeded: i64 = db
            .connection()
            .query_row("SELECT defaults_seeded FROM app_state WHERE id = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(seeded, 0, "Fresh databases are not seeded yet");
    }

    #[test]
    fn test_migration_adds_missing_columns() {
        let db = Database::new(":memory:").unwrap();
        db.connection()
            .execute(
                "CREATE TABLE countdowns (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    date TEXT NOT NULL,
                    colour INTEGER NOT NULL DEFAULT 0
                )",
                [],
            )
            .unwrap();
        db.connection()
            .execute(
                "INSERT INTO countdowns (name, date, colour) VALUES ('Old', '2015-07-12', 3)",
                [],
            )
            .unwrap();
        assert!(!migrations::column_exists(db.connection(), "countdowns", "icon").unwrap());

        db.initialize_schema().unwrap();

        assert!(migrations::column_exists(db.connection(), "countdowns", "icon").unwrap());
        assert!(
            migrations::column_exists(db.connection(), "countdowns", "repeat_interval").unwrap()
        );
        let (icon, repeat): (i64, i64) = db
            .connection()
            .query_row(
                "SELECT icon, repeat_interval FROM countdowns WHERE name = 'Old'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!((icon, repeat), (0, 0));
    }

    #[test]
    fn test_transaction_helpers() {
        let db = Database::open_initialized(":memory:").unwrap();
        assert!(!db.has_pending_transaction());

        db.begin_if_needed().unwrap();
        db.begin_if_needed().unwrap();
        assert!(db.has_pending_transaction());
        db.connection()
            .execute(
                "INSERT INTO countdowns (name, date) VALUES ('Dropped', '2025-01-01')",
                [],
            )
            .unwrap();
        db.rollback().unwrap();
        assert!(!db.has_pending_transaction());

        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM countdowns", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "Rolled back insert should be gone");

        // Nothing open: both are no-ops.
        db.commit().unwrap();
        db.rollback().unwrap();
    }
}

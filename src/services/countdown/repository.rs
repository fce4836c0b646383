//! Database repository for countdowns.
//!
//! This module provides CRUD operations for countdowns stored in SQLite.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::countdown::{Countdown, CountdownId, NewCountdown, RepeatInterval};

const SELECT_COLUMNS: &str = "SELECT id, name, date, colour, icon, repeat_interval FROM countdowns";

/// Repository for countdown database operations
pub struct CountdownRepository<'a> {
    conn: &'a Connection,
}

impl<'a> CountdownRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // ========== Countdown CRUD Operations ==========

    /// Get all countdowns, in storage order
    pub fn get_all(&self) -> Result<Vec<Countdown>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;

        let countdowns = stmt
            .query_map([], row_to_countdown)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to fetch countdowns")?;

        Ok(countdowns)
    }

    /// Get a single countdown by ID
    pub fn get(&self, id: CountdownId) -> Result<Option<Countdown>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?"))?;

        stmt.query_row([id.0], row_to_countdown)
            .optional()
            .context("Failed to fetch countdown")
    }

    /// Insert a new countdown and return it with its assigned ID
    pub fn insert(&self, new: &NewCountdown) -> Result<Countdown> {
        self.conn
            .execute(
                "INSERT INTO countdowns (name, date, colour, icon, repeat_interval)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    new.name,
                    new.date,
                    new.colour,
                    new.icon,
                    new.repeat_interval.code(),
                ],
            )
            .context("Failed to insert countdown")?;

        let id = CountdownId(self.conn.last_insert_rowid());
        Ok(Countdown::from_new(id, new.clone()))
    }

    /// Update an existing countdown. Returns false if no row matched.
    pub fn update(&self, countdown: &Countdown) -> Result<bool> {
        let rows = self
            .conn
            .execute(
                "UPDATE countdowns
                 SET name = ?1, date = ?2, colour = ?3, icon = ?4, repeat_interval = ?5,
                     updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?6",
                params![
                    countdown.name,
                    countdown.date,
                    countdown.colour,
                    countdown.icon,
                    countdown.repeat_interval.code(),
                    countdown.id.0,
                ],
            )
            .context("Failed to update countdown")?;

        Ok(rows > 0)
    }

    /// Delete a countdown. Returns false if no row matched.
    pub fn delete(&self, id: CountdownId) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM countdowns WHERE id = ?", [id.0])
            .context("Failed to delete countdown")?;

        Ok(rows > 0)
    }

    pub fn count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM countdowns", [], |row| row.get(0))
            .context("Failed to count countdowns")
    }

    // ========== First-run State ==========

    pub fn defaults_seeded(&self) -> Result<bool> {
        let seeded: Option<i64> = self
            .conn
            .query_row(
                "SELECT defaults_seeded FROM app_state WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read app state")?;

        Ok(seeded.unwrap_or(0) != 0)
    }

    pub fn mark_defaults_seeded(&self) -> Result<()> {
        self.conn
            .execute(
                "UPDATE app_state SET defaults_seeded = 1, updated_at = CURRENT_TIMESTAMP
                 WHERE id = 1",
                [],
            )
            .context("Failed to update app state")?;
        Ok(())
    }
}

fn row_to_countdown(row: &Row) -> rusqlite::Result<Countdown> {
    let repeat_code: i64 = row.get(5)?;
    Ok(Countdown {
        id: CountdownId(row.get(0)?),
        name: row.get(1)?,
        date: row.get(2)?,
        colour: row.get(3)?,
        icon: row.get(4)?,
        repeat_interval: RepeatInterval::from_code(repeat_code),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database::Database;
    use chrono::NaiveDate;

    fn setup_test_db() -> Database {
        Database::open_initialized(":memory:").unwrap()
    }

    fn new_countdown(name: &str, y: i32, m: u32, d: u32) -> NewCountdown {
        NewCountdown {
            name: name.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            colour: 4,
            icon: 2,
            repeat_interval: RepeatInterval::Monthly,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_test_db();
        let repo = CountdownRepository::new(db.connection());

        let inserted = repo.insert(&new_countdown("Launch", 2025, 9, 1)).unwrap();
        let loaded = repo.get(inserted.id).unwrap().unwrap();

        assert_eq!(loaded, inserted);
        assert_eq!(loaded.repeat_interval, RepeatInterval::Monthly);
        assert_eq!(loaded.colour, 4);
        assert_eq!(loaded.icon, 2);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let db = setup_test_db();
        let repo = CountdownRepository::new(db.connection());
        assert!(repo.get(CountdownId(42)).unwrap().is_none());
    }

    #[test]
    fn test_dates_are_stored_as_iso_text() {
        let db = setup_test_db();
        let repo = CountdownRepository::new(db.connection());
        let inserted = repo.insert(&new_countdown("Stored", 2015, 7, 12)).unwrap();

        let raw: String = db
            .connection()
            .query_row("SELECT date FROM countdowns WHERE id = ?", [inserted.id.0], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(raw, "2015-07-12");
    }

    #[test]
    fn test_update_and_delete() {
        let db = setup_test_db();
        let repo = CountdownRepository::new(db.connection());

        let mut countdown = repo.insert(&new_countdown("Draft", 2025, 1, 1)).unwrap();
        countdown.name = "Final".to_string();
        countdown.repeat_interval = RepeatInterval::Yearly;
        assert!(repo.update(&countdown).unwrap());
        assert_eq!(repo.get(countdown.id).unwrap().unwrap().name, "Final");

        assert!(repo.delete(countdown.id).unwrap());
        assert!(!repo.delete(countdown.id).unwrap(), "Second delete matches nothing");
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_update_missing_row_reports_false() {
        let db = setup_test_db();
        let repo = CountdownRepository::new(db.connection());
        let ghost = Countdown::from_new(CountdownId(99), new_countdown("Ghost", 2025, 1, 1));
        assert!(!repo.update(&ghost).unwrap());
    }

    #[test]
    fn test_corrupt_repeat_code_decodes_as_never() {
        let db = setup_test_db();
        db.connection()
            .execute(
                "INSERT INTO countdowns (name, date, repeat_interval) VALUES ('Bad', '2025-05-04', 17)",
                [],
            )
            .unwrap();

        let repo = CountdownRepository::new(db.connection());
        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].repeat_interval, RepeatInterval::Never);
    }

    #[test]
    fn test_seed_flag() {
        let db = setup_test_db();
        let repo = CountdownRepository::new(db.connection());
        assert!(!repo.defaults_seeded().unwrap());
        repo.mark_defaults_seeded().unwrap();
        assert!(repo.defaults_seeded().unwrap());
    }
}

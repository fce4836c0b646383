// Test fixtures - reusable test data
// Provides consistent test data across all test files
#![allow(dead_code)]

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use sleeps::models::countdown::{Countdown, NewCountdown, RepeatInterval};
use sleeps::services::countdown::{CountdownRepository, SqliteCountdownStore};
use sleeps::services::database::Database;

/// Sample dates for testing
pub mod dates {
    use super::*;

    pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// Midday on `date`, far from any DST switch at midnight.
    pub fn noon(date: NaiveDate) -> DateTime<Local> {
        Local
            .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
            .earliest()
            .unwrap()
    }

    /// Returns Jul 12, 2015 (the reference date used by the repeat tests)
    pub fn jul_12_2015() -> NaiveDate {
        ymd(2015, 7, 12)
    }

    /// Returns Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> NaiveDate {
        ymd(2024, 2, 29)
    }
}

/// Opens a fresh database file inside `dir`.
pub fn open_store(dir: &tempfile::TempDir) -> SqliteCountdownStore {
    let path = dir.path().join("sleeps.db");
    let db = Database::open_initialized(path.to_str().unwrap()).expect("open database");
    SqliteCountdownStore::new(db)
}

/// Writes a countdown straight to the database, bypassing the list.
pub fn insert(
    store: &SqliteCountdownStore,
    name: &str,
    date: NaiveDate,
    repeat_interval: RepeatInterval,
) -> Countdown {
    CountdownRepository::new(store.database().connection())
        .insert(&NewCountdown {
            name: name.to_string(),
            date,
            colour: 0,
            icon: 0,
            repeat_interval,
        })
        .expect("insert countdown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_fixture_dates_are_valid() {
        assert_eq!(dates::jul_12_2015().year(), 2015);
        assert_eq!(dates::leap_day_2024().day(), 29);
        assert_eq!(dates::noon(dates::jul_12_2015()).date_naive(), dates::jul_12_2015());
    }
}

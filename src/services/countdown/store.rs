//! Storage seam between the countdown list and its persistence layer.

use anyhow::{anyhow, Result};

use crate::models::countdown::{Countdown, CountdownId, NewCountdown};
use crate::services::database::Database;

use super::repository::CountdownRepository;

/// Durable home of countdown records.
///
/// Mutations are staged until [`CountdownStore::save`] commits them or
/// [`CountdownStore::discard`] drops them.
#[cfg_attr(test, mockall::automock)]
pub trait CountdownStore {
    /// Insert a record and return it with its assigned id.
    fn create_record(&mut self, new: &NewCountdown) -> Result<Countdown>;

    /// Current snapshot of every record, in no particular order.
    fn fetch_all(&self) -> Result<Vec<Countdown>>;

    fn update(&mut self, countdown: &Countdown) -> Result<()>;

    fn delete(&mut self, id: CountdownId) -> Result<()>;

    fn save(&mut self) -> Result<()>;

    fn discard(&mut self) -> Result<()>;
}

/// [`CountdownStore`] backed by the SQLite database.
///
/// The first mutation opens a transaction; `save` commits it.
pub struct SqliteCountdownStore {
    db: Database,
}

impl SqliteCountdownStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.db.has_pending_transaction()
    }

    fn repo(&self) -> CountdownRepository<'_> {
        CountdownRepository::new(self.db.connection())
    }
}

impl CountdownStore for SqliteCountdownStore {
    fn create_record(&mut self, new: &NewCountdown) -> Result<Countdown> {
        self.db.begin_if_needed()?;
        self.repo().insert(new)
    }

    fn fetch_all(&self) -> Result<Vec<Countdown>> {
        self.repo().get_all()
    }

    fn update(&mut self, countdown: &Countdown) -> Result<()> {
        self.db.begin_if_needed()?;
        if !self.repo().update(countdown)? {
            return Err(anyhow!("countdown {:?} does not exist", countdown.id));
        }
        Ok(())
    }

    fn delete(&mut self, id: CountdownId) -> Result<()> {
        self.db.begin_if_needed()?;
        if !self.repo().delete(id)? {
            log::warn!("Countdown {:?} was already gone from storage", id);
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.db.commit()
    }

    fn discard(&mut self) -> Result<()> {
        self.db.rollback()
    }
}

//! The countdown list: an in-memory, display-ordered mirror of the store,
//! plus the daily rollover that advances or removes lapsed countdowns.

use chrono::{DateTime, Local};

use crate::models::colour::Colour;
use crate::models::countdown::{sort_for_display, Countdown, CountdownId, NewCountdown, RepeatInterval};
use crate::models::settings::RolloverPolicy;

use super::error::{CountdownError, CountdownResult};
use super::refresh::MidnightRefresh;
use super::store::CountdownStore;

/// Whether a multi-step mutation is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Modifying,
}

/// What the presentation layer shows for one countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownRow {
    pub id: CountdownId,
    pub name: String,
    pub days_remaining: i64,
    pub colour: Colour,
    pub icon: i64,
    pub repeat_label: &'static str,
}

impl CountdownRow {
    pub fn from_countdown(countdown: &Countdown, now: DateTime<Local>) -> Self {
        Self {
            id: countdown.id,
            name: countdown.name.clone(),
            days_remaining: countdown.days_from_now(now),
            colour: countdown.colour(),
            icon: countdown.icon,
            repeat_label: countdown.repeat_label(),
        }
    }
}

/// Ask the presentation layer to open the editor for a countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub id: CountdownId,
    pub index: usize,
    /// The record is provisional and goes away if the edit is abandoned.
    pub delete_on_cancel: bool,
}

/// How an edit session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Saved(Countdown),
    Cancelled,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    Published(Vec<CountdownRow>),
    RowsInserted(Vec<usize>),
    RowsDeleted(Vec<usize>),
    EditRequested(EditRequest),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolloverSummary {
    pub advanced: Vec<CountdownId>,
    pub removed: Vec<CountdownId>,
}

impl RolloverSummary {
    pub fn changed(&self) -> bool {
        !self.advanced.is_empty() || !self.removed.is_empty()
    }
}

/// Borrowed view handed to a mutation. Holding it keeps the list mutably
/// borrowed, so a second mutation cannot start until this one finishes.
struct Mutation<'a, S: CountdownStore> {
    store: &'a mut S,
    countdowns: &'a mut Vec<Countdown>,
    events: &'a mut Vec<ListEvent>,
    changed: bool,
}

impl<S: CountdownStore> Mutation<'_, S> {
    fn remove(&mut self, index: usize) -> CountdownResult<Countdown> {
        let len = self.countdowns.len();
        let id = self
            .countdowns
            .get(index)
            .map(|countdown| countdown.id)
            .ok_or(CountdownError::IndexOutOfRange { index, len })?;

        self.store.delete(id)?;
        let removed = self.countdowns.remove(index);
        self.events.push(ListEvent::RowsDeleted(vec![index]));
        self.changed = true;
        Ok(removed)
    }

    fn save(&mut self) -> CountdownResult<()> {
        self.store.save().map_err(CountdownError::Save)
    }

    /// Replace the list with a fresh, sorted snapshot from the store.
    fn reload(&mut self) -> CountdownResult<()> {
        let mut fetched = self.store.fetch_all().map_err(CountdownError::Fetch)?;
        sort_for_display(&mut fetched);
        *self.countdowns = fetched;
        self.changed = true;
        Ok(())
    }
}

/// Owns the displayed countdowns and keeps them in step with the store.
pub struct CountdownList<S: CountdownStore> {
    store: Option<S>,
    countdowns: Vec<Countdown>,
    state: ListState,
    events: Vec<ListEvent>,
    editing: Option<EditRequest>,
    deferred_deletes: Vec<CountdownId>,
    policy: RolloverPolicy,
    refresh: Option<MidnightRefresh>,
    clock: Box<dyn Fn() -> DateTime<Local>>,
}

impl<S: CountdownStore> CountdownList<S> {
    pub fn new(store: S) -> Self {
        Self::with_optional_store(Some(store))
    }

    /// A list with no storage behind it. Every storage-backed operation
    /// reports `StorageUnavailable` and leaves the list untouched.
    pub fn detached() -> Self {
        Self::with_optional_store(None)
    }

    fn with_optional_store(store: Option<S>) -> Self {
        Self {
            store,
            countdowns: Vec::new(),
            state: ListState::Idle,
            events: Vec::new(),
            editing: None,
            deferred_deletes: Vec::new(),
            policy: RolloverPolicy::default(),
            refresh: None,
            clock: Box::new(Local::now),
        }
    }

    pub fn with_policy(mut self, policy: RolloverPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_midnight_refresh(mut self, refresh: MidnightRefresh) -> Self {
        self.refresh = Some(refresh);
        self
    }

    /// Replace the wall clock, mainly for tests.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn countdowns(&self) -> &[Countdown] {
        &self.countdowns
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    pub fn editing(&self) -> Option<&EditRequest> {
        self.editing.as_ref()
    }

    pub fn has_deferred_delete(&self) -> bool {
        !self.deferred_deletes.is_empty()
    }

    pub fn is_refresh_armed(&self) -> bool {
        self.refresh.as_ref().is_some_and(MidnightRefresh::is_armed)
    }

    pub fn rows(&self, now: DateTime<Local>) -> Vec<CountdownRow> {
        self.countdowns
            .iter()
            .map(|countdown| CountdownRow::from_countdown(countdown, now))
            .collect()
    }

    /// Drain everything emitted for the presentation layer since the last call.
    pub fn take_events(&mut self) -> Vec<ListEvent> {
        std::mem::take(&mut self.events)
    }

    fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    fn publish(&mut self, now: DateTime<Local>) {
        let rows = self.rows(now);
        self.events.push(ListEvent::Published(rows));
    }

    /// Run `op` as one mutation: the list is `Modifying` for its duration and
    /// the result is published once it ends, whether it succeeded or not.
    fn modify<R>(
        &mut self,
        now: DateTime<Local>,
        op: impl FnOnce(&mut Mutation<'_, S>) -> CountdownResult<R>,
    ) -> CountdownResult<R> {
        let Some(store) = self.store.as_mut() else {
            log::error!("No storage context available, countdown change abandoned");
            return Err(CountdownError::StorageUnavailable);
        };

        self.state = ListState::Modifying;
        let mut mutation = Mutation {
            store,
            countdowns: &mut self.countdowns,
            events: &mut self.events,
            changed: false,
        };
        let result = op(&mut mutation);
        let changed = mutation.changed;
        self.state = ListState::Idle;

        if changed {
            self.publish(now);
        }
        result
    }

    pub fn reload(&mut self) -> CountdownResult<()> {
        let now = self.now();
        self.reload_at(now)
    }

    /// Fetch, sort and publish. On fetch failure the current list is kept.
    pub fn reload_at(&mut self, now: DateTime<Local>) -> CountdownResult<()> {
        let Some(store) = self.store.as_ref() else {
            log::error!("No storage context available, cannot load countdowns");
            return Err(CountdownError::StorageUnavailable);
        };

        match store.fetch_all() {
            Ok(mut fetched) => {
                sort_for_display(&mut fetched);
                log::debug!("Loaded {} countdowns", fetched.len());
                self.countdowns = fetched;
                self.publish(now);
                Ok(())
            }
            Err(err) => {
                log::warn!(
                    "Failed to fetch countdowns, keeping {} cached: {err:#}",
                    self.countdowns.len()
                );
                Err(CountdownError::Fetch(err))
            }
        }
    }

    /// Insert a blank countdown dated today at the top of the list and ask
    /// for it to be edited. The record is provisional until the edit is saved.
    pub fn create_new(&mut self) -> CountdownResult<EditRequest> {
        let now = self.now();
        let blank = NewCountdown::blank(now.date_naive());

        let created = self.modify(now, |m| {
            let created = m.store.create_record(&blank)?;
            m.countdowns.insert(0, created.clone());
            m.events.push(ListEvent::RowsInserted(vec![0]));
            m.changed = true;
            m.save()?;
            Ok(created)
        })?;

        log::info!("Created countdown {:?}", created.id);
        let request = EditRequest {
            id: created.id,
            index: 0,
            delete_on_cancel: true,
        };
        self.start_edit(request.clone());
        Ok(request)
    }

    /// Ask for an existing countdown to be edited.
    pub fn begin_edit(&mut self, index: usize) -> CountdownResult<EditRequest> {
        let countdown = self
            .countdowns
            .get(index)
            .ok_or(CountdownError::IndexOutOfRange {
                index,
                len: self.countdowns.len(),
            })?;

        let request = EditRequest {
            id: countdown.id,
            index,
            delete_on_cancel: false,
        };
        self.start_edit(request.clone());
        Ok(request)
    }

    fn start_edit(&mut self, request: EditRequest) {
        if let Some(previous) = self.editing.replace(request.clone()) {
            log::warn!("Edit of {:?} superseded before it finished", previous.id);
            if previous.delete_on_cancel {
                self.defer_delete(previous.id);
            }
        }
        self.events.push(ListEvent::EditRequested(request));
    }

    fn defer_delete(&mut self, id: CountdownId) {
        if !self.deferred_deletes.contains(&id) {
            self.deferred_deletes.push(id);
        }
    }

    /// Close the current edit session.
    ///
    /// A saved edit is written straight away. Deleting, or cancelling a
    /// provisional record, only queues the record; the queue is emptied on
    /// the next [`CountdownList::appear`].
    pub fn finish_edit(&mut self, outcome: EditOutcome) -> CountdownResult<()> {
        let session = self.editing.take().ok_or(CountdownError::NoEditInProgress)?;

        match outcome {
            EditOutcome::Saved(mut edited) => {
                edited.id = session.id;
                let now = self.now();
                self.modify(now, |m| {
                    let index = m
                        .countdowns
                        .iter()
                        .position(|countdown| countdown.id == edited.id)
                        .ok_or(CountdownError::UnknownCountdown(edited.id))?;
                    m.store.update(&edited)?;
                    m.countdowns[index] = edited;
                    sort_for_display(&mut m.countdowns[..]);
                    m.changed = true;
                    m.save()
                })
            }
            EditOutcome::Cancelled if session.delete_on_cancel => {
                log::debug!("Provisional countdown {:?} abandoned", session.id);
                self.defer_delete(session.id);
                Ok(())
            }
            EditOutcome::Cancelled => Ok(()),
            EditOutcome::Deleted => {
                self.defer_delete(session.id);
                Ok(())
            }
        }
    }

    /// Remove the countdown at `index` from both the list and the store.
    pub fn delete(&mut self, index: usize) -> CountdownResult<Countdown> {
        let now = self.now();
        let removed = self.modify(now, |m| {
            let removed = m.remove(index)?;
            m.save()?;
            Ok(removed)
        })?;

        if self.editing.as_ref().is_some_and(|edit| edit.id == removed.id) {
            self.editing = None;
        }
        log::info!("Deleted countdown {:?}", removed.id);
        Ok(removed)
    }

    pub fn rollover_pass(&mut self) -> CountdownResult<RolloverSummary> {
        let now = self.now();
        self.rollover_pass_at(now)
    }

    /// Advance repeating countdowns whose date has passed and remove the
    /// non-repeating ones, then reload from the store.
    pub fn rollover_pass_at(&mut self, now: DateTime<Local>) -> CountdownResult<RolloverSummary> {
        let policy = self.policy;

        self.modify(now, |m| {
            let mut summary = RolloverSummary::default();
            let mut expired = Vec::new();

            for (index, countdown) in m.countdowns.iter_mut().enumerate() {
                if !countdown.has_passed(now) {
                    continue;
                }
                if countdown.repeat_interval == RepeatInterval::Never {
                    expired.push(index);
                    continue;
                }

                let mut next = countdown.clone();
                advance(&mut next, now, policy);
                m.store.update(&next)?;
                log::debug!(
                    "Countdown {:?} rolled over from {} to {}",
                    next.id,
                    countdown.date,
                    next.date
                );
                summary.advanced.push(next.id);
                *countdown = next;
            }

            for &index in &expired {
                let id = m.countdowns[index].id;
                m.store.delete(id)?;
                summary.removed.push(id);
            }
            for &index in expired.iter().rev() {
                m.countdowns.remove(index);
            }
            if !expired.is_empty() {
                m.events.push(ListEvent::RowsDeleted(expired));
            }

            if summary.changed() {
                log::info!(
                    "Rollover advanced {} and removed {} countdowns",
                    summary.advanced.len(),
                    summary.removed.len()
                );
                m.changed = true;
                m.save()?;
            }

            m.reload()?;
            Ok(summary)
        })
    }

    /// The list became visible: run any deferred deletes, otherwise refresh
    /// and roll over, then arm the midnight refresh.
    pub fn appear(&mut self) -> CountdownResult<()> {
        let now = self.now();

        let result = if self.deferred_deletes.is_empty() {
            self.reload_at(now)
                .and_then(|()| self.rollover_pass_at(now))
                .map(|_| ())
        } else {
            self.run_deferred_deletes(now)
        };

        self.schedule_midnight_refresh(now);
        result
    }

    /// Remove every record whose edit ended in a delete, as one mutation.
    /// On failure the pending ids are kept for the next attempt.
    fn run_deferred_deletes(&mut self, now: DateTime<Local>) -> CountdownResult<()> {
        let pending = std::mem::take(&mut self.deferred_deletes);
        let result = self.modify(now, |m| {
            let mut removed = Vec::new();
            for &id in &pending {
                match m.countdowns.iter().position(|countdown| countdown.id == id) {
                    Some(index) => removed.push(m.remove(index)?.id),
                    None => log::warn!("Deferred delete of {:?} found nothing to remove", id),
                }
            }
            if !removed.is_empty() {
                m.save()?;
            }
            Ok(removed)
        });

        match result {
            Ok(removed) => {
                if self
                    .editing
                    .as_ref()
                    .is_some_and(|edit| removed.contains(&edit.id))
                {
                    self.editing = None;
                }
                log::info!("Deleted {} countdowns after editing", removed.len());
                Ok(())
            }
            Err(err) => {
                self.deferred_deletes = pending;
                Err(err)
            }
        }
    }

    /// The list is no longer visible.
    pub fn disappear(&mut self) {
        self.cancel_midnight_refresh();
    }

    pub fn schedule_midnight_refresh(&mut self, now: DateTime<Local>) {
        match self.refresh.as_mut() {
            Some(refresh) => refresh.schedule(now),
            None => log::debug!("No midnight refresh attached"),
        }
    }

    pub fn cancel_midnight_refresh(&mut self) -> bool {
        self.refresh.as_mut().is_some_and(MidnightRefresh::cancel)
    }

    /// Handle the midnight timer: reload, roll over for the new day and re-arm.
    pub fn on_midnight_tick(&mut self) -> CountdownResult<RolloverSummary> {
        let now = self.now();
        log::info!("Midnight refresh at {}", now);
        let summary = self
            .reload_at(now)
            .and_then(|()| self.rollover_pass_at(now));
        self.schedule_midnight_refresh(now);
        summary
    }

    /// Try the save that failed again.
    pub fn retry_save(&mut self) -> CountdownResult<()> {
        let store = self.store.as_mut().ok_or(CountdownError::StorageUnavailable)?;
        store.save().map_err(CountdownError::Save)
    }

    /// Give up on unsaved changes and reload what the store still has.
    pub fn discard_changes(&mut self) -> CountdownResult<()> {
        let store = self.store.as_mut().ok_or(CountdownError::StorageUnavailable)?;
        store.discard()?;
        self.reload()
    }
}

fn advance(countdown: &mut Countdown, now: DateTime<Local>, policy: RolloverPolicy) {
    match policy {
        RolloverPolicy::SingleStep => {
            countdown.advance_date_for_repeat();
        }
        RolloverPolicy::CatchUp => {
            while countdown.has_passed(now) && countdown.advance_date_for_repeat() {}
        }
    }
}

//! One-shot timer that wakes the countdown list just after local midnight.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::utils::date::until_next_midnight;

/// Delivered on the refresh channel when the timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidnightTick {
    pub fired_at: DateTime<Local>,
}

/// Owned handle for the midnight refresh task. At most one task is armed;
/// arming again aborts the previous one, and dropping the handle cancels it.
pub struct MidnightRefresh {
    runtime: Handle,
    ticks: UnboundedSender<MidnightTick>,
    grace: Duration,
    task: Option<JoinHandle<()>>,
}

impl MidnightRefresh {
    /// `grace` is added after midnight so a slightly early wake-up never lands
    /// on the previous day.
    pub fn new(runtime: Handle, grace: Duration) -> (Self, UnboundedReceiver<MidnightTick>) {
        let (ticks, receiver) = mpsc::unbounded_channel();
        let refresh = Self {
            runtime,
            ticks,
            grace,
            task: None,
        };
        (refresh, receiver)
    }

    /// Arm for the next local midnight after `now`.
    pub fn schedule(&mut self, now: DateTime<Local>) {
        let wait = until_next_midnight(now, self.grace);
        log::info!("Midnight refresh armed, firing in {}s", wait.as_secs());
        self.schedule_after(wait);
    }

    pub fn schedule_after(&mut self, wait: Duration) {
        self.cancel();
        let ticks = self.ticks.clone();
        self.task = Some(self.runtime.spawn(async move {
            tokio::time::sleep(wait).await;
            let tick = MidnightTick {
                fired_at: Local::now(),
            };
            if ticks.send(tick).is_err() {
                log::debug!("Midnight tick dropped: receiver closed");
            }
        }));
    }

    /// Disarm. Returns true if a task was armed.
    pub fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for MidnightRefresh {
    fn drop(&mut self) {
        self.cancel();
    }
}

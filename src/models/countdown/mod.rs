// Countdown model
// A named target date with a colour, icon and repeat rule.

use std::cmp::Ordering;

use chrono::{DateTime, Days, Local, Months, NaiveDate};

use crate::models::colour::Colour;

/// Storage-assigned identifier for a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountdownId(pub i64);

/// How a countdown's date moves once it has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i16)]
pub enum RepeatInterval {
    #[default]
    Never = 0,
    Weekly = 1,
    Monthly = 2,
    Yearly = 3,
}

impl RepeatInterval {
    pub const ALL: [RepeatInterval; 4] = [
        RepeatInterval::Never,
        RepeatInterval::Weekly,
        RepeatInterval::Monthly,
        RepeatInterval::Yearly,
    ];

    /// Decode a stored code. Unknown codes are treated as `Never`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => RepeatInterval::Never,
            1 => RepeatInterval::Weekly,
            2 => RepeatInterval::Monthly,
            3 => RepeatInterval::Yearly,
            other => {
                log::warn!("Unknown repeat interval code {}, treating as Never", other);
                RepeatInterval::Never
            }
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatInterval::Never => "Never Repeats",
            RepeatInterval::Weekly => "Repeats Weekly",
            RepeatInterval::Monthly => "Repeats Monthly",
            RepeatInterval::Yearly => "Repeats Yearly",
        }
    }

    /// `date` moved forward by one interval. `None` for `Never` or when the
    /// result would fall outside chrono's date range.
    ///
    /// Month and year steps clamp to the end of a shorter target month, so
    /// Jan 31 + 1 month is the last day of February.
    pub fn next_after(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            RepeatInterval::Never => None,
            RepeatInterval::Weekly => date.checked_add_days(Days::new(7)),
            RepeatInterval::Monthly => date.checked_add_months(Months::new(1)),
            RepeatInterval::Yearly => date.checked_add_months(Months::new(12)),
        }
    }
}

/// Field values for a record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCountdown {
    pub name: String,
    pub date: NaiveDate,
    pub colour: i64,
    pub icon: i64,
    pub repeat_interval: RepeatInterval,
}

impl NewCountdown {
    /// The placeholder record inserted when the user taps "new".
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            date: today,
            colour: 0,
            icon: 0,
            repeat_interval: RepeatInterval::Never,
        }
    }
}

/// Core persisted information for each countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    pub id: CountdownId,
    pub name: String,
    pub date: NaiveDate,
    /// Raw palette index as stored; see [`Countdown::colour`].
    pub colour: i64,
    pub icon: i64,
    pub repeat_interval: RepeatInterval,
}

impl Countdown {
    pub fn from_new(id: CountdownId, new: NewCountdown) -> Self {
        Self {
            id,
            name: new.name,
            date: new.date,
            colour: new.colour,
            icon: new.icon,
            repeat_interval: new.repeat_interval,
        }
    }

    /// Whole days from `now` until the countdown's date.
    ///
    /// Today is 0, tomorrow is 1, yesterday is -1. Counting is done on local
    /// calendar days, so the time of day of `now` never matters.
    pub fn days_from_now(&self, now: DateTime<Local>) -> i64 {
        (self.date - now.date_naive()).num_days()
    }

    pub fn has_passed(&self, now: DateTime<Local>) -> bool {
        self.days_from_now(now) < 0
    }

    pub fn colour(&self) -> Colour {
        Colour::from_index(self.colour)
    }

    pub fn repeat_label(&self) -> &'static str {
        self.repeat_interval.label()
    }

    /// Move the date forward by one repeat interval.
    /// Returns false (and leaves the date alone) for non-repeating countdowns.
    pub fn advance_date_for_repeat(&mut self) -> bool {
        match self.repeat_interval.next_after(self.date) {
            Some(next) => {
                self.date = next;
                true
            }
            None => false,
        }
    }

    /// Display order: earliest date first, then name.
    pub fn display_order(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.name.cmp(&other.name))
    }

    pub fn is_before(&self, other: &Self) -> bool {
        self.display_order(other) == Ordering::Less
    }
}

pub fn sort_for_display(countdowns: &mut [Countdown]) {
    countdowns.sort_by(Countdown::display_order);
}

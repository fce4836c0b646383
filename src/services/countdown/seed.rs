//! Default countdowns created on first launch.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rand::Rng;

use crate::models::colour::Colour;
use crate::models::countdown::{Countdown, NewCountdown, RepeatInterval};

use super::repository::CountdownRepository;
use super::store::{CountdownStore, SqliteCountdownStore};

const DEFAULT_ANNIVERSARIES: [(&str, u32, u32); 3] = [
    ("Pi Day", 3, 14),
    ("Star Wars Day", 5, 4),
    ("Talk Like A Pirate Day", 9, 19),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedCountdown {
    pub name: &'static str,
    pub date: NaiveDate,
}

/// The default anniversaries, each in this year unless `today` is already on
/// or past it, in which case next year.
pub fn default_seed_countdowns(today: NaiveDate) -> Vec<SeedCountdown> {
    DEFAULT_ANNIVERSARIES
        .iter()
        .filter_map(|&(name, month, day)| {
            next_anniversary(today, month, day).map(|date| SeedCountdown { name, date })
        })
        .collect()
}

fn next_anniversary(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if today < this_year {
        Some(this_year)
    } else {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    }
}

/// Create the default countdowns in `store` and save them.
pub fn seed_defaults<S, R>(store: &mut S, today: NaiveDate, rng: &mut R) -> Result<Vec<Countdown>>
where
    S: CountdownStore + ?Sized,
    R: Rng + ?Sized,
{
    let mut created = Vec::new();
    for seed in default_seed_countdowns(today) {
        let new = NewCountdown {
            name: seed.name.to_string(),
            date: seed.date,
            colour: Colour::random(rng).index(),
            icon: 0,
            repeat_interval: RepeatInterval::Yearly,
        };
        created.push(store.create_record(&new)?);
    }
    store.save()?;
    Ok(created)
}

/// Seed the database once. Returns how many countdowns were created.
pub fn seed_defaults_if_needed<R>(
    store: &mut SqliteCountdownStore,
    today: NaiveDate,
    rng: &mut R,
) -> Result<usize>
where
    R: Rng + ?Sized,
{
    {
        let repo = CountdownRepository::new(store.database().connection());
        if repo.defaults_seeded()? {
            return Ok(0);
        }
        store.database().begin_if_needed()?;
        repo.mark_defaults_seeded()?;
    }

    match seed_defaults(store, today, rng) {
        Ok(created) => {
            log::info!("Seeded {} default countdowns", created.len());
            Ok(created.len())
        }
        Err(err) => {
            if let Err(rollback_err) = store.discard() {
                log::warn!("Failed to roll back seeding: {rollback_err:#}");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database::Database;
    use rand::{rngs::StdRng, SeedableRng};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(today: NaiveDate) -> Vec<NaiveDate> {
        default_seed_countdowns(today)
            .into_iter()
            .map(|seed| seed.date)
            .collect()
    }

    #[test]
    fn all_passed_moves_to_next_year() {
        assert_eq!(
            dates(ymd(2015, 9, 20)),
            vec![ymd(2016, 3, 14), ymd(2016, 5, 4), ymd(2016, 9, 19)]
        );
    }

    #[test]
    fn only_pi_day_passed_in_april() {
        assert_eq!(
            dates(ymd(2015, 4, 1)),
            vec![ymd(2016, 3, 14), ymd(2015, 5, 4), ymd(2015, 9, 19)]
        );
    }

    #[test]
    fn none_passed_early_in_year() {
        assert_eq!(
            dates(ymd(2015, 3, 1)),
            vec![ymd(2015, 3, 14), ymd(2015, 5, 4), ymd(2015, 9, 19)]
        );
    }

    #[test]
    fn anniversary_day_itself_counts_as_passed() {
        assert_eq!(
            dates(ymd(2015, 9, 19)),
            vec![ymd(2016, 3, 14), ymd(2016, 5, 4), ymd(2016, 9, 19)]
        );
        assert_eq!(dates(ymd(2015, 5, 3))[1], ymd(2015, 5, 4));
    }

    #[test]
    fn seed_names() {
        let names: Vec<_> = default_seed_countdowns(ymd(2015, 1, 1))
            .into_iter()
            .map(|seed| seed.name)
            .collect();
        assert_eq!(names, vec!["Pi Day", "Star Wars Day", "Talk Like A Pirate Day"]);
    }

    #[test]
    fn seeding_runs_once() {
        let mut store = SqliteCountdownStore::new(Database::open_initialized(":memory:").unwrap());
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(seed_defaults_if_needed(&mut store, ymd(2015, 9, 20), &mut rng).unwrap(), 3);
        assert_eq!(seed_defaults_if_needed(&mut store, ymd(2015, 9, 20), &mut rng).unwrap(), 0);
        assert!(!store.has_unsaved_changes());

        let all = store.fetch_all().unwrap();
        assert_eq!(all.len(), 3);
        for countdown in &all {
            assert_eq!(countdown.repeat_interval, RepeatInterval::Yearly);
            assert!((0..9).contains(&countdown.colour));
            assert_eq!(countdown.date.year(), 2016);
        }
    }
}

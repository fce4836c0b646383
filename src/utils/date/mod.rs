// Date utility functions

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};

pub fn is_same_day(date1: DateTime<Local>, date2: DateTime<Local>) -> bool {
    date1.date_naive() == date2.date_naive()
}

/// First instant of `date` in the local time zone.
///
/// Where midnight does not exist (a DST gap), the earliest valid instant
/// after it is used.
pub fn start_of_day(date: NaiveDate) -> DateTime<Local> {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(earliest, _) => earliest,
        chrono::LocalResult::None => {
            // Step forward an hour at a time until we leave the gap.
            let mut probe = midnight;
            loop {
                probe += Duration::hours(1);
                if let Some(dt) = Local.from_local_datetime(&probe).earliest() {
                    break dt;
                }
            }
        }
    }
}

/// First instant of the local day after `now`.
pub fn start_of_tomorrow(now: DateTime<Local>) -> DateTime<Local> {
    let tomorrow = now
        .date_naive()
        .succ_opt()
        .unwrap_or(NaiveDate::MAX);
    start_of_day(tomorrow)
}

/// How long to wait from `now` until the next local midnight plus `grace`.
pub fn until_next_midnight(now: DateTime<Local>, grace: std::time::Duration) -> std::time::Duration {
    let fire_at = start_of_tomorrow(now);
    let wait = (fire_at - now)
        .to_std()
        .unwrap_or(std::time::Duration::ZERO);
    wait + grace
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, m, d, h, min, s)
            .earliest()
            .unwrap()
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        assert!(is_same_day(local(2025, 3, 14, 1, 0, 0), local(2025, 3, 14, 23, 0, 0)));
        assert!(!is_same_day(local(2025, 3, 14, 12, 0, 0), local(2025, 3, 15, 12, 0, 0)));
    }

    #[test]
    fn start_of_day_is_local_midnight() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 12).unwrap();
        let start = start_of_day(date);
        assert_eq!(start.date_naive(), date);
        assert_eq!(start.time(), chrono::NaiveTime::MIN);
    }

    #[test]
    fn start_of_tomorrow_crosses_year_end() {
        let tomorrow = start_of_tomorrow(local(2025, 12, 31, 15, 30, 0));
        assert_eq!(tomorrow.date_naive(), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn wait_until_midnight_includes_grace() {
        let now = local(2025, 7, 12, 23, 59, 0);
        let wait = until_next_midnight(now, std::time::Duration::from_secs(1));
        assert_eq!(wait, std::time::Duration::from_secs(61));
    }
}

//! Business-day walk from a start date to the day enough work is done.

use crate::error::{EbsError, Result};
use crate::time::{self, NormalizedDate, Period};

use super::Calendar;

/// Day ceiling for the walk, roughly 274 years.
///
/// A walk that never catches up (no work days left, or a non-positive work
/// rate) visits every day up to the ceiling, and each visit runs
/// [`Calendar::is_work_day`]. With a daily rule of `h` repetitions that is up
/// to `max_days * h` date additions, so keep rule horizons well below the
/// ceiling when the ceiling is raised.
pub const DEFAULT_MAX_DAYS: u64 = 100_000;

/// Walks a calendar one day at a time accumulating worked seconds.
#[derive(Debug, Clone, Copy)]
pub struct CompletionWalker<'a> {
    calendar: &'a Calendar,
    seconds_per_workday: i64,
    max_days: u64,
}

impl<'a> CompletionWalker<'a> {
    pub fn new(calendar: &'a Calendar, seconds_per_workday: i64) -> Self {
        Self {
            calendar,
            seconds_per_workday,
            max_days: DEFAULT_MAX_DAYS,
        }
    }

    /// Override the day ceiling.
    pub fn with_max_days(mut self, max_days: u64) -> Self {
        self.max_days = max_days;
        self
    }

    /// The date on which `seconds_needed` of work is done, starting at `start`.
    ///
    /// The start day counts as the first day of work. A non-positive
    /// requirement is met on `start` itself without consulting the calendar.
    /// A non-positive work rate is not rejected up front; it simply never
    /// catches up and runs to the ceiling.
    ///
    /// # Errors
    ///
    /// [`EbsError::IncompleteTask`] when the ceiling is reached first, or
    /// [`EbsError::OutOfRange`] when the walk leaves the representable range.
    pub fn completion_date(&self, start: &NormalizedDate, seconds_needed: i64) -> Result<NormalizedDate> {
        if seconds_needed <= 0 {
            return Ok(*start);
        }

        let one_day = Period::days(1);
        let mut current = *start;
        let mut seconds_worked: i64 = 0;
        let mut days_elapsed: u64 = 0;

        loop {
            if self.calendar.is_work_day(&current) {
                seconds_worked = seconds_worked.saturating_add(self.seconds_per_workday);
            }
            if seconds_worked >= seconds_needed {
                tracing::trace!(%start, %current, days_elapsed, "completion date found");
                return Ok(current);
            }

            days_elapsed += 1;
            if days_elapsed >= self.max_days {
                tracing::debug!(%start, seconds_needed, seconds_worked, "walk hit day ceiling");
                return Err(EbsError::IncompleteTask {
                    days: self.max_days,
                });
            }
            current = time::add_in(&current, &one_day, self.calendar.range())?;
        }
    }
}

/// Completion date with the default day ceiling.
pub fn compute_completion_date(
    start: &NormalizedDate,
    calendar: &Calendar,
    seconds_per_workday: i64,
    seconds_needed: i64,
) -> Result<NormalizedDate> {
    CompletionWalker::new(calendar, seconds_per_workday).completion_date(start, seconds_needed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::RepeatingEvent;
    use crate::time::{format, parse, TimeRange};

    fn date(s: &str) -> NormalizedDate {
        parse(s).unwrap()
    }

    fn daily_with_sundays_off() -> Calendar {
        let mut calendar = Calendar::new();
        calendar
            .add_inclusion(RepeatingEvent::daily(date("2016-09-08T12:12:12"), 10))
            .unwrap();
        calendar
            .add_exclusion(RepeatingEvent::weekly(date("2016-09-11T12:12:12"), 10))
            .unwrap();
        calendar
    }

    #[test]
    fn four_work_days_skip_the_sunday() {
        let calendar = daily_with_sundays_off();
        let start = date("2016-09-08T12:12:12");
        let done = compute_completion_date(&start, &calendar, 100, 400).unwrap();
        assert_eq!(format(&done), "2016-09-12T12:12:12");
    }

    #[test]
    fn partial_day_rounds_up_to_whole_day() {
        let calendar = daily_with_sundays_off();
        let start = date("2016-09-08T12:12:12");
        let done = compute_completion_date(&start, &calendar, 100, 101).unwrap();
        assert_eq!(format(&done), "2016-09-09T12:12:12");
    }

    #[test]
    fn no_work_needed_returns_start() {
        let calendar = Calendar::new();
        let start = date("2016-09-08T12:12:12");
        assert_eq!(compute_completion_date(&start, &calendar, 0, 0).unwrap(), start);
        assert_eq!(compute_completion_date(&start, &calendar, 100, -5).unwrap(), start);
    }

    #[test]
    fn empty_inclusions_is_incomplete() {
        let calendar = Calendar::new();
        let start = date("2016-09-08T12:12:12");
        let result = CompletionWalker::new(&calendar, 100)
            .with_max_days(500)
            .completion_date(&start, 1);
        assert!(matches!(result, Err(EbsError::IncompleteTask { days: 500 })));
    }

    #[test]
    fn zero_rate_runs_to_ceiling() {
        let calendar = daily_with_sundays_off();
        let start = date("2016-09-08T12:12:12");
        let result = CompletionWalker::new(&calendar, 0)
            .with_max_days(50)
            .completion_date(&start, 1);
        assert!(matches!(result, Err(EbsError::IncompleteTask { days: 50 })));
    }

    #[test]
    fn running_out_of_inclusions_is_incomplete() {
        let calendar = daily_with_sundays_off();
        let start = date("2016-09-08T12:12:12");
        let result = compute_completion_date(&start, &calendar, 100, 10_000);
        assert!(matches!(result, Err(EbsError::IncompleteTask { days: DEFAULT_MAX_DAYS })));
    }

    #[test]
    fn walking_past_range_is_out_of_range() {
        let range = TimeRange::TIME_T_32;
        let start = time::parse_in("2038-01-10T00:00:00", &range).unwrap();
        let mut calendar = Calendar::new().with_range(range);
        calendar
            .add_inclusion(RepeatingEvent::daily(start, 3))
            .unwrap();
        let result = compute_completion_date(&start, &calendar, 100, 1_000);
        assert!(matches!(result, Err(EbsError::OutOfRange { .. })));
    }
}

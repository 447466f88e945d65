use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::time::{self, NormalizedDate, Period, TimeRange};

/// A repeating event: `start`, `start + period`, ... for `repetitions` terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatingEvent {
    pub start: NormalizedDate,
    pub period: Period,
    pub repetitions: u64,
}

impl RepeatingEvent {
    pub fn new(start: NormalizedDate, period: Period, repetitions: u64) -> Self {
        Self {
            start,
            period,
            repetitions,
        }
    }

    /// Every day from `start`, for `repetitions` days.
    pub fn daily(start: NormalizedDate, repetitions: u64) -> Self {
        Self::new(start, Period::days(1), repetitions)
    }

    /// Every seventh day from `start`, for `repetitions` weeks.
    pub fn weekly(start: NormalizedDate, repetitions: u64) -> Self {
        Self::new(start, Period::weeks(1), repetitions)
    }

    /// Whether any occurrence falls on the same calendar day as `date`.
    pub fn contains(&self, date: &NormalizedDate) -> bool {
        self.contains_in(date, &TimeRange::default())
    }

    /// Like [`contains`](Self::contains), normalizing occurrences in `range`.
    ///
    /// Occurrences are advanced incrementally so month-end carries
    /// accumulate the same way repeated `add` calls do. The scan stops at the
    /// first occurrence past `date`, when an occurrence leaves the range, or
    /// after `repetitions` terms, whichever comes first.
    pub fn contains_in(&self, date: &NormalizedDate, range: &TimeRange) -> bool {
        if self.period.is_zero() {
            // Every term is `start`.
            return self.repetitions > 0 && time::same_date(date, &self.start);
        }
        let mut occurrence = self.start;
        for _ in 0..self.repetitions {
            if time::same_date(date, &occurrence) {
                return true;
            }
            if time::compare(&occurrence, date) == Ordering::Greater {
                return false;
            }
            occurrence = match time::add_in(&occurrence, &self.period, range) {
                Ok(next) => next,
                Err(_) => return false,
            };
        }
        false
    }
}

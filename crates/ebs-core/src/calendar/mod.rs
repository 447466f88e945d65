//! Work calendar: repeating inclusion and exclusion rules.
//!
//! A day is a work day when at least one inclusion event covers it and no
//! exclusion event does. Exclusions only ever remove days; a day no inclusion
//! covers stays a non-work day whatever the exclusions say.

pub mod event;
pub mod walker;

pub use event::RepeatingEvent;
pub use walker::{compute_completion_date, CompletionWalker, DEFAULT_MAX_DAYS};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{EbsError, Result};
use crate::time::{self, NormalizedDate, TimeRange};

/// Default capacity of each rule list.
pub const DEFAULT_MAX_RULES: usize = 1023;

/// Inclusion and exclusion rules, evaluated read-only once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    inclusions: Vec<RepeatingEvent>,
    exclusions: Vec<RepeatingEvent>,
    #[serde(skip, default = "default_max_rules")]
    max_inclusions: usize,
    #[serde(skip, default = "default_max_rules")]
    max_exclusions: usize,
    #[serde(skip)]
    range: TimeRange,
}

fn default_max_rules() -> usize {
    DEFAULT_MAX_RULES
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new()
    }
}

impl Calendar {
    /// An empty calendar with the default rule capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_RULES, DEFAULT_MAX_RULES)
    }

    /// An empty calendar holding at most the given number of rules.
    pub fn with_capacity(max_inclusions: usize, max_exclusions: usize) -> Self {
        Self {
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            max_inclusions,
            max_exclusions,
            range: TimeRange::default(),
        }
    }

    /// Normalize occurrences within `range` instead of the default.
    pub fn with_range(mut self, range: TimeRange) -> Self {
        self.range = range;
        self
    }

    /// Weekdays starting at `today`, with the default capacity and range.
    ///
    /// # Errors
    ///
    /// As [`add_weekday_rules`](Self::add_weekday_rules).
    pub fn weekdays(today: NormalizedDate, horizon_days: u64, weekend: &[Weekday]) -> Result<Self> {
        let mut calendar = Self::new();
        calendar.add_weekday_rules(today, horizon_days, weekend)?;
        Ok(calendar)
    }

    /// Add a daily inclusion from `today` for `horizon_days`, plus a weekly
    /// exclusion for each day in `weekend` anchored on its first occurrence
    /// on or after `today`.
    ///
    /// # Errors
    ///
    /// Returns [`EbsError::OutOfRange`] if a weekend anchor cannot be
    /// represented, or [`EbsError::CapacityExceeded`] if the rules do not fit.
    pub fn add_weekday_rules(
        &mut self,
        today: NormalizedDate,
        horizon_days: u64,
        weekend: &[Weekday],
    ) -> Result<()> {
        self.add_inclusion(RepeatingEvent::daily(today, horizon_days))?;
        for day in weekend {
            let anchor = time::next_weekday(&today, *day)?;
            self.add_exclusion(RepeatingEvent::weekly(anchor, horizon_days))?;
        }
        tracing::debug!(
            %today,
            horizon_days,
            exclusions = self.exclusions.len(),
            "added weekday rules"
        );
        Ok(())
    }

    /// Add a rule marking days as normally worked.
    pub fn add_inclusion(&mut self, event: RepeatingEvent) -> Result<()> {
        if self.inclusions.len() >= self.max_inclusions {
            return Err(EbsError::CapacityExceeded {
                collection: "calendar inclusions",
                capacity: self.max_inclusions,
            });
        }
        self.inclusions.push(event);
        Ok(())
    }

    /// Add a rule removing days from the worked set.
    pub fn add_exclusion(&mut self, event: RepeatingEvent) -> Result<()> {
        if self.exclusions.len() >= self.max_exclusions {
            return Err(EbsError::CapacityExceeded {
                collection: "calendar exclusions",
                capacity: self.max_exclusions,
            });
        }
        self.exclusions.push(event);
        Ok(())
    }

    pub fn inclusions(&self) -> &[RepeatingEvent] {
        &self.inclusions
    }

    pub fn exclusions(&self) -> &[RepeatingEvent] {
        &self.exclusions
    }

    pub fn range(&self) -> &TimeRange {
        &self.range
    }

    /// Whether `date` is a work day under inclusion-minus-exclusion.
    pub fn is_work_day(&self, date: &NormalizedDate) -> bool {
        let included = self
            .inclusions
            .iter()
            .any(|event| event.contains_in(date, &self.range));
        if !included {
            return false;
        }
        !self
            .exclusions
            .iter()
            .any(|event| event.contains_in(date, &self.range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{parse, Period};

    fn date(s: &str) -> NormalizedDate {
        parse(s).unwrap()
    }

    #[test]
    fn empty_calendar_has_no_work_days() {
        let calendar = Calendar::new();
        assert!(!calendar.is_work_day(&date("2016-09-08T00:00:00")));
    }

    #[test]
    fn exclusion_alone_never_adds_work_days() {
        let mut calendar = Calendar::new();
        calendar
            .add_exclusion(RepeatingEvent::daily(date("2016-09-01T00:00:00"), 30))
            .unwrap();
        assert!(!calendar.is_work_day(&date("2016-09-08T00:00:00")));
    }

    #[test]
    fn exclusion_overrides_inclusion() {
        let mut calendar = Calendar::new();
        calendar
            .add_inclusion(RepeatingEvent::daily(date("2016-09-08T12:12:12"), 10))
            .unwrap();
        calendar
            .add_exclusion(RepeatingEvent::weekly(date("2016-09-11T12:12:12"), 10))
            .unwrap();

        assert!(calendar.is_work_day(&date("2016-09-10T12:12:12")));
        assert!(!calendar.is_work_day(&date("2016-09-11T12:12:12")));
        assert!(calendar.is_work_day(&date("2016-09-12T12:12:12")));
    }

    #[test]
    fn any_inclusion_is_enough() {
        let mut calendar = Calendar::new();
        calendar
            .add_inclusion(RepeatingEvent::new(date("2016-09-05T00:00:00"), Period::weeks(1), 4))
            .unwrap();
        calendar
            .add_inclusion(RepeatingEvent::new(date("2016-09-07T00:00:00"), Period::weeks(1), 4))
            .unwrap();
        assert!(calendar.is_work_day(&date("2016-09-12T09:00:00")));
        assert!(calendar.is_work_day(&date("2016-09-14T09:00:00")));
        assert!(!calendar.is_work_day(&date("2016-09-13T09:00:00")));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut calendar = Calendar::with_capacity(1, 0);
        let event = RepeatingEvent::daily(date("2016-09-08T00:00:00"), 1);
        calendar.add_inclusion(event.clone()).unwrap();
        assert!(matches!(
            calendar.add_inclusion(event.clone()),
            Err(EbsError::CapacityExceeded { capacity: 1, .. })
        ));
        assert!(matches!(
            calendar.add_exclusion(event),
            Err(EbsError::CapacityExceeded { capacity: 0, .. })
        ));
        assert_eq!(calendar.inclusions().len(), 1);
    }

    #[test]
    fn weekdays_calendar_skips_weekend() {
        // 2016-09-08 is a Thursday.
        let today = date("2016-09-08T09:00:00");
        let calendar = Calendar::weekdays(today, 365, &[Weekday::Sat, Weekday::Sun]).unwrap();

        assert!(calendar.is_work_day(&date("2016-09-08T09:00:00")));
        assert!(calendar.is_work_day(&date("2016-09-09T09:00:00")));
        assert!(!calendar.is_work_day(&date("2016-09-10T09:00:00")));
        assert!(!calendar.is_work_day(&date("2016-09-11T09:00:00")));
        assert!(calendar.is_work_day(&date("2016-09-12T09:00:00")));
        assert!(!calendar.is_work_day(&date("2016-09-24T09:00:00")));
        assert!(!calendar.is_work_day(&date("2016-09-07T09:00:00")));
    }
}

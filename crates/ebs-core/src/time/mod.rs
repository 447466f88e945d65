//! Normalized calendar time.
//!
//! Every date the engine handles is a [`NormalizedDate`]: a wall-clock
//! instant whose fields have already been carried into range, the way
//! `mktime` normalizes a broken-down time. Arithmetic goes through
//! [`add`] with a date-shaped [`Period`], so that "+1 month" on January 31st
//! carries into March exactly as the host calendar would.

mod period;
mod range;

pub use period::Period;
pub use range::{TimeRange, TimeRangeKind};

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EbsError, Result};

const SECONDS_PER_DAY: i64 = 86_400;

/// A calendar instant whose fields are consistent with the calendar.
///
/// Only constructible through normalization ([`parse`], [`add`],
/// [`NormalizedDate::from_naive`]), so the weekday can always be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedDate(NaiveDateTime);

impl NormalizedDate {
    /// Wrap an already-valid chrono value, checking it against `range`.
    pub fn from_naive_in(value: NaiveDateTime, range: &TimeRange) -> Result<Self> {
        if !range.contains(&value) {
            return Err(EbsError::out_of_range(format!(
                "{} is outside {}",
                value.format("%Y-%m-%dT%H:%M:%S"),
                range
            )));
        }
        Ok(Self(value))
    }

    /// Wrap an already-valid chrono value using the default range.
    pub fn from_naive(value: NaiveDateTime) -> Result<Self> {
        Self::from_naive_in(value, &TimeRange::default())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of the year, 1-12.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of the month, 1-31.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for NormalizedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(self))
    }
}

impl FromStr for NormalizedDate {
    type Err = EbsError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

impl Serialize for NormalizedDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(self))
    }
}

impl<'de> Deserialize<'de> for NormalizedDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Raw broken-down fields before normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Fields {
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
}

impl Fields {
    fn of(date: &NormalizedDate) -> Self {
        Self {
            year: i64::from(date.year()),
            month: i64::from(date.month()),
            day: i64::from(date.day()),
            hour: i64::from(date.hour()),
            minute: i64::from(date.minute()),
            second: i64::from(date.second()),
        }
    }

    /// Carry every field into range: months into years, then days counted
    /// from the first of the normalized month, then the time of day.
    fn normalize(self, range: &TimeRange) -> Result<NormalizedDate> {
        let overflow = || EbsError::out_of_range("date arithmetic overflowed");

        let month_index = self.month.checked_sub(1).ok_or_else(overflow)?;
        let year = self
            .year
            .checked_add(month_index.div_euclid(12))
            .ok_or_else(overflow)?;
        let month = month_index.rem_euclid(12) + 1;
        let year = i32::try_from(year).map_err(|_| overflow())?;

        let first = NaiveDate::from_ymd_opt(year, month as u32, 1)
            .ok_or_else(|| EbsError::out_of_range(format!("year {year} is not representable")))?;

        let seconds = self
            .hour
            .checked_mul(3_600)
            .and_then(|h| self.minute.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(self.second))
            .ok_or_else(overflow)?;
        let days = self
            .day
            .checked_sub(1)
            .and_then(|d| d.checked_add(seconds.div_euclid(SECONDS_PER_DAY)))
            .ok_or_else(overflow)?;
        let time_of_day = seconds.rem_euclid(SECONDS_PER_DAY) as u32;

        let date = shift_days(first, days).ok_or_else(overflow)?;
        let time = chrono::NaiveTime::from_num_seconds_from_midnight_opt(time_of_day, 0)
            .ok_or_else(overflow)?;

        NormalizedDate::from_naive_in(date.and_time(time), range)
    }
}

fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Parse `YYYY-MM-DDTHH:MM:SS` into a normalized date in the default range.
///
/// # Errors
///
/// [`EbsError::BadFormat`] when the text does not match field for field,
/// [`EbsError::OutOfRange`] when the normalized instant is not representable.
pub fn parse(input: &str) -> Result<NormalizedDate> {
    parse_in(input, &TimeRange::default())
}

/// Parse with an explicit representable range.
pub fn parse_in(input: &str, range: &TimeRange) -> Result<NormalizedDate> {
    scan(input)?.normalize(range)
}

/// Field scanner: a signed year of any width, then five 1-2 digit fields
/// separated by `-`, `-`, `T`, `:`, `:`.
///
/// The whole shape is checked before the year is converted, so a year too
/// wide for `i64` is out of range rather than malformed.
fn scan(input: &str) -> Result<Fields> {
    let bad_format = || EbsError::BadFormat {
        input: input.to_string(),
    };

    // A leading sign belongs to the year, not the separator.
    let sign_len = usize::from(input.starts_with(['+', '-']));
    let split = input[sign_len..].find('-').ok_or_else(bad_format)? + sign_len;
    let (year, rest) = (&input[..split], &input[split + 1..]);
    if !is_signed_digits(year) {
        return Err(bad_format());
    }

    let (month, rest) = rest.split_once('-').ok_or_else(bad_format)?;
    let (day, rest) = rest.split_once('T').ok_or_else(bad_format)?;
    let (hour, rest) = rest.split_once(':').ok_or_else(bad_format)?;
    let (minute, second) = rest.split_once(':').ok_or_else(bad_format)?;
    let field = |text: &str| short_field(text).ok_or_else(bad_format);
    let (month, day, hour, minute, second) =
        (field(month)?, field(day)?, field(hour)?, field(minute)?, field(second)?);

    let year = year
        .parse()
        .map_err(|_| EbsError::out_of_range(format!("year {year} does not fit in 64 bits")))?;

    Ok(Fields {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

fn is_signed_digits(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn short_field(text: &str) -> Option<i64> {
    if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Format as `YYYY-MM-DDTHH:MM:SS`, zero-padded.
pub fn format(date: &NormalizedDate) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        date.year(),
        date.month(),
        date.day(),
        date.hour(),
        date.minute(),
        date.second()
    )
}

/// Field-wise addition followed by normalization, in the default range.
pub fn add(date: &NormalizedDate, delta: &Period) -> Result<NormalizedDate> {
    add_in(date, delta, &TimeRange::default())
}

/// Field-wise addition followed by normalization, in an explicit range.
pub fn add_in(date: &NormalizedDate, delta: &Period, range: &TimeRange) -> Result<NormalizedDate> {
    let base = Fields::of(date);
    let sum = |a: i64, b: i64| {
        a.checked_add(b)
            .ok_or_else(|| EbsError::out_of_range("date arithmetic overflowed"))
    };
    Fields {
        year: sum(base.year, delta.years)?,
        month: sum(base.month, delta.months)?,
        day: sum(base.day, delta.days)?,
        hour: sum(base.hour, delta.hours)?,
        minute: sum(base.minute, delta.minutes)?,
        second: sum(base.second, delta.seconds)?,
    }
    .normalize(range)
}

/// Coarse-to-fine comparison over year, month, day, hour, minute, second.
pub fn compare(a: &NormalizedDate, b: &NormalizedDate) -> Ordering {
    (a.year(), a.month(), a.day(), a.hour(), a.minute(), a.second()).cmp(&(
        b.year(),
        b.month(),
        b.day(),
        b.hour(),
        b.minute(),
        b.second(),
    ))
}

/// True when both instants fall on the same calendar day.
pub fn same_date(a: &NormalizedDate, b: &NormalizedDate) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// The first date on or after `from` that falls on `target`.
pub fn next_weekday(from: &NormalizedDate, target: Weekday) -> Result<NormalizedDate> {
    let mut current = *from;
    for _ in 0..7 {
        if current.weekday() == target {
            return Ok(current);
        }
        current = add(&current, &Period::days(1))?;
    }
    Err(EbsError::out_of_range(format!(
        "no {target} within a week of {from}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NormalizedDate {
        parse(s).unwrap()
    }

    #[test]
    fn parse_reads_every_field() {
        let d = date("2016-09-08T12:12:12");
        assert_eq!(d.year(), 2016);
        assert_eq!(d.month(), 9);
        assert_eq!(d.day(), 8);
        assert_eq!(d.hour(), 12);
        assert_eq!(d.minute(), 12);
        assert_eq!(d.second(), 12);
        assert_eq!(d.weekday(), Weekday::Thu);
    }

    #[test]
    fn parse_accepts_single_digit_fields() {
        let d = date("1800-02-3T13:01:31");
        assert_eq!((d.year(), d.month(), d.day()), (1800, 2, 3));
        assert_eq!((d.hour(), d.minute(), d.second()), (13, 1, 31));
    }

    #[test]
    fn parse_rejects_date_without_time() {
        assert!(matches!(
            parse("1800-01-03"),
            Err(EbsError::BadFormat { .. })
        ));
    }

    #[test]
    fn parse_rejects_garbage() {
        for input in ["", "abc", "2016-09-08 12:12:12", "2016-009-08T12:12:12", "2016-09-08T12:12:1x"] {
            assert!(
                matches!(parse(input), Err(EbsError::BadFormat { .. })),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn parse_year_wider_than_i64_is_out_of_range() {
        assert!(matches!(
            parse("99999999999999999999-01-01T00:00:00"),
            Err(EbsError::OutOfRange { .. })
        ));
        // Shape is checked first: a malformed tail still reads as bad format.
        assert!(matches!(
            parse("99999999999999999999-01-01T00:00"),
            Err(EbsError::BadFormat { .. })
        ));
    }

    #[test]
    fn parse_normalizes_overflowing_fields() {
        assert_eq!(format(&date("2016-01-32T00:00:00")), "2016-02-01T00:00:00");
        assert_eq!(format(&date("2016-12-31T23:59:60")), "2017-01-01T00:00:00");
        assert_eq!(format(&date("2015-02-29T00:00:00")), "2015-03-01T00:00:00");
    }

    #[test]
    fn parse_outside_32_bit_range_is_out_of_range() {
        let result = parse_in("1800-01-03T00:00:00", &TimeRange::TIME_T_32);
        assert!(matches!(result, Err(EbsError::OutOfRange { .. })));
        assert!(parse_in("2038-01-19T03:14:07", &TimeRange::TIME_T_32).is_ok());
        assert!(parse_in("2038-01-19T03:14:08", &TimeRange::TIME_T_32).is_err());
    }

    #[test]
    fn format_pads_fields() {
        assert_eq!(format(&date("987-1-2T3:4:5")), "0987-01-02T03:04:05");
    }

    #[test]
    fn add_carries_days_into_months() {
        let d = add(&date("2016-01-31T10:00:00"), &Period::days(1)).unwrap();
        assert_eq!(format(&d), "2016-02-01T10:00:00");
    }

    #[test]
    fn add_month_overflows_short_month_like_mktime() {
        let d = add(&date("2016-01-31T00:00:00"), &Period::months(1)).unwrap();
        assert_eq!(format(&d), "2016-03-02T00:00:00");
    }

    #[test]
    fn add_negative_fields_borrow() {
        let d = add(&date("2016-03-01T00:00:00"), &Period::days(-1)).unwrap();
        assert_eq!(format(&d), "2016-02-29T00:00:00");
        let d = add(&date("2016-01-01T00:00:00"), &Period::seconds(-1)).unwrap();
        assert_eq!(format(&d), "2015-12-31T23:59:59");
    }

    #[test]
    fn add_past_range_is_out_of_range() {
        let edge = parse_in("2038-01-19T00:00:00", &TimeRange::TIME_T_32).unwrap();
        let result = add_in(&edge, &Period::days(1), &TimeRange::TIME_T_32);
        assert!(matches!(result, Err(EbsError::OutOfRange { .. })));
    }

    #[test]
    fn add_huge_period_does_not_panic() {
        let huge = Period {
            years: i64::MAX,
            ..Period::default()
        };
        assert!(add(&date("2016-01-01T00:00:00"), &huge).is_err());
    }

    #[test]
    fn compare_is_coarse_to_fine() {
        let a = date("2016-09-08T23:59:59");
        let b = date("2016-09-09T00:00:00");
        assert_eq!(compare(&a, &b), Ordering::Less);
        assert_eq!(compare(&b, &a), Ordering::Greater);
        assert_eq!(compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn same_date_ignores_time_of_day() {
        assert!(same_date(
            &date("2016-09-08T00:00:00"),
            &date("2016-09-08T23:59:59")
        ));
        assert!(!same_date(
            &date("2016-09-08T23:59:59"),
            &date("2016-09-09T00:00:00")
        ));
    }

    #[test]
    fn next_weekday_is_non_strict() {
        let thursday = date("2016-09-08T12:00:00");
        assert_eq!(next_weekday(&thursday, Weekday::Thu).unwrap(), thursday);
        let sunday = next_weekday(&thursday, Weekday::Sun).unwrap();
        assert_eq!(format(&sunday), "2016-09-11T12:00:00");
        let wednesday = next_weekday(&thursday, Weekday::Wed).unwrap();
        assert_eq!(format(&wednesday), "2016-09-14T12:00:00");
    }

    #[test]
    fn serde_uses_fixed_width_text() {
        let d = date("2016-09-08T12:12:12");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2016-09-08T12:12:12\"");
        let back: NormalizedDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}

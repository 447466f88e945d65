use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The span of instants the underlying epoch can represent.
///
/// Bounds are seconds relative to 1970-01-01T00:00:00 wall-clock time,
/// inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub min_timestamp: i64,
    pub max_timestamp: i64,
}

impl TimeRange {
    /// A signed 32-bit `time_t`: 1901-12-13T20:45:52 through 2038-01-19T03:14:07.
    pub const TIME_T_32: TimeRange = TimeRange {
        min_timestamp: i32::MIN as i64,
        max_timestamp: i32::MAX as i64,
    };

    /// Years 0000 through 9999, the widest span the fixed-width format prints.
    pub const WIDE: TimeRange = TimeRange {
        min_timestamp: -62_167_219_200,
        max_timestamp: 253_402_300_799,
    };

    pub fn contains(&self, value: &NaiveDateTime) -> bool {
        let ts = value.and_utc().timestamp();
        self.min_timestamp <= ts && ts <= self.max_timestamp
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::WIDE
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edge = |ts: i64| {
            chrono::DateTime::from_timestamp(ts, 0)
                .map(|d| d.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string())
                .unwrap_or_else(|| ts.to_string())
        };
        write!(
            f,
            "[{}, {}]",
            edge(self.min_timestamp),
            edge(self.max_timestamp)
        )
    }
}

/// Named ranges selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRangeKind {
    #[serde(rename = "time_t_32")]
    TimeT32,
    #[default]
    Wide,
}

impl TimeRangeKind {
    pub fn range(self) -> TimeRange {
        match self {
            TimeRangeKind::TimeT32 => TimeRange::TIME_T_32,
            TimeRangeKind::Wide => TimeRange::WIDE,
        }
    }
}

use serde::{Deserialize, Serialize};

/// A date-shaped delta: each field is added to the matching field of a
/// [`NormalizedDate`](super::NormalizedDate) before normalization.
///
/// `Period::months(1)` is therefore not a fixed number of seconds; it is
/// whatever "same day next month" normalizes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Period {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Period {
    pub fn months(months: i64) -> Self {
        Self {
            months,
            ..Self::default()
        }
    }

    pub fn days(days: i64) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    pub fn weeks(weeks: i64) -> Self {
        Self::days(weeks.saturating_mul(7))
    }

    pub fn seconds(seconds: i64) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    /// True when every field is zero; repeating such a period never advances.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

//! Work items: estimates, actuals, and the velocity history they imply.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EbsError};

/// Whether a work item is still outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum TaskStatus {
    #[default]
    Active,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 2] = [TaskStatus::Active, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "ACTIVE",
            TaskStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = EbsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: "status".to_string(),
                    message: format!("unknown task status '{s}'"),
                }
                .into()
            })
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = EbsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One estimated unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub name: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub estimated_seconds: i64,
    /// Time actually spent; unset for items nobody has worked on.
    #[serde(default)]
    pub actual_seconds: Option<i64>,
}

impl WorkItem {
    /// An outstanding item with no recorded time.
    pub fn outstanding(name: impl Into<String>, estimated_seconds: i64) -> Self {
        Self {
            name: name.into(),
            status: TaskStatus::Active,
            estimated_seconds,
            actual_seconds: None,
        }
    }

    /// A finished item with its recorded time.
    pub fn completed(name: impl Into<String>, estimated_seconds: i64, actual_seconds: i64) -> Self {
        Self {
            name: name.into(),
            status: TaskStatus::Done,
            estimated_seconds,
            actual_seconds: Some(actual_seconds),
        }
    }

    pub fn is_outstanding(&self) -> bool {
        self.status == TaskStatus::Active
    }

    /// `estimated / actual` for finished items, `None` while outstanding or
    /// when no actual was recorded.
    pub fn velocity(&self) -> Option<f64> {
        if self.is_outstanding() {
            return None;
        }
        let actual = self.actual_seconds?;
        Some(self.estimated_seconds as f64 / actual as f64)
    }
}

/// Velocities of finished items usable as divisors.
///
/// Undefined ratios (`0 / 0`), infinite ones (work done in zero recorded
/// time) and zero or negative ones (zero or negative estimates) are dropped.
pub fn velocity_samples(items: &[WorkItem]) -> Vec<f64> {
    items
        .iter()
        .filter_map(WorkItem::velocity)
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect()
}

/// Estimates of outstanding items, in seconds.
pub fn outstanding_estimates(items: &[WorkItem]) -> Vec<f64> {
    items
        .iter()
        .filter(|item| item.is_outstanding())
        .map(|item| item.estimated_seconds as f64)
        .collect()
}

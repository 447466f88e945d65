//! Seams to the world outside the engine: the host clock, where work items
//! come from, and how they are filtered by name.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{EbsError, Result};
use crate::time::NormalizedDate;
use crate::work::{TaskStatus, WorkItem};

/// Source of "now" as local wall-clock time.
pub trait Clock {
    fn now(&self) -> Result<NormalizedDate>;
}

/// Reads the host clock and converts to local time, truncating to seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<NormalizedDate> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| EbsError::TimeUnavailable)?;
        let secs = i64::try_from(since_epoch.as_secs()).map_err(|_| EbsError::TimeUnavailable)?;
        let local = Local
            .timestamp_opt(secs, 0)
            .single()
            .ok_or(EbsError::TimeUnavailable)?;
        NormalizedDate::from_naive(local.naive_local())
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(NormalizedDate);

impl FixedClock {
    pub fn new(now: NormalizedDate) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Result<NormalizedDate> {
        Ok(self.0)
    }
}

/// Decides which outstanding items a forecast covers.
pub trait NameFilter {
    fn matches(&self, name: &str) -> bool;
}

/// Accepts every name.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl NameFilter for AcceptAll {
    fn matches(&self, _name: &str) -> bool {
        true
    }
}

/// Accepts names containing a fixed substring; an empty needle accepts all.
#[derive(Debug, Clone, Default)]
pub struct Contains(pub String);

impl NameFilter for Contains {
    fn matches(&self, name: &str) -> bool {
        name.contains(self.0.as_str())
    }
}

impl<F: Fn(&str) -> bool> NameFilter for F {
    fn matches(&self, name: &str) -> bool {
        self(name)
    }
}

/// Finished items always feed velocity; outstanding ones only when the
/// filter accepts their name.
pub fn select(items: Vec<WorkItem>, filter: &dyn NameFilter) -> Vec<WorkItem> {
    items
        .into_iter()
        .filter(|item| !item.is_outstanding() || filter.matches(&item.name))
        .collect()
}

/// Anything that can hand over the current list of work items.
pub trait WorkItemSource {
    fn load(&self) -> Result<Vec<WorkItem>>;
}

/// One row of the work sheet; times are recorded in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SheetRow {
    name: String,
    #[serde(default)]
    status: TaskStatus,
    estimated_minutes: i64,
    #[serde(default)]
    actual_minutes: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Sheet {
    #[serde(default, rename = "task")]
    tasks: Vec<SheetRow>,
}

/// Read-only TOML work sheet: a list of `[[task]]` tables.
#[derive(Debug, Clone)]
pub struct TomlWorkSheet {
    path: PathBuf,
    max_items: usize,
}

impl TomlWorkSheet {
    pub const FILE_NAME: &'static str = "tasks.toml";
    pub const DEFAULT_MAX_ITEMS: usize = 1024;

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_items: Self::DEFAULT_MAX_ITEMS,
        }
    }

    /// The sheet inside an ebs directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn failure(&self, message: String) -> EbsError {
        EbsError::WorkSheet {
            path: self.path.clone(),
            message,
        }
    }

    /// Parse sheet text, converting minutes to seconds.
    pub fn parse(&self, content: &str) -> Result<Vec<WorkItem>> {
        let sheet: Sheet = toml::from_str(content).map_err(|e| self.failure(e.to_string()))?;
        if sheet.tasks.len() > self.max_items {
            return Err(EbsError::CapacityExceeded {
                collection: "work sheet tasks",
                capacity: self.max_items,
            });
        }
        Ok(sheet
            .tasks
            .into_iter()
            .map(|row| WorkItem {
                name: row.name,
                status: row.status,
                estimated_seconds: row.estimated_minutes.saturating_mul(60),
                actual_seconds: row.actual_minutes.map(|m| m.saturating_mul(60)),
            })
            .collect())
    }
}

impl WorkItemSource for TomlWorkSheet {
    fn load(&self) -> Result<Vec<WorkItem>> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| self.failure(e.to_string()))?;
        let items = self.parse(&content)?;
        tracing::debug!(path = %self.path.display(), count = items.len(), "loaded work sheet");
        Ok(items)
    }
}

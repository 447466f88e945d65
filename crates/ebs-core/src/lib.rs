//! # ebs Core Library
//!
//! This library provides the calendar and forecast engine behind `ebs`, an
//! evidence-based scheduling tool. Given estimates for outstanding work, the
//! estimated and actual times of finished work, and a work calendar, it
//! predicts when the outstanding work will be done.
//!
//! ## Architecture
//!
//! - **Normalized Time**: `mktime`-style carry normalization over
//!   broken-down calendar fields, with a configurable representable range
//! - **Calendar**: repeating inclusion and exclusion events deciding which
//!   days are work days
//! - **Completion Walker**: day-by-day walk turning work-seconds into a date
//! - **Forecast**: Monte Carlo resampling of historical velocity
//!
//! ## Key Components
//!
//! - [`NormalizedDate`]: calendar instant produced by normalization
//! - [`Calendar`]: inclusion-minus-exclusion work day rules
//! - [`Forecaster`]: runs a simulation and walks the bounds into dates
//! - [`Config`]: TOML configuration

pub mod calendar;
pub mod collab;
pub mod config;
pub mod error;
pub mod forecast;
pub mod time;
pub mod work;

pub use calendar::{compute_completion_date, Calendar, CompletionWalker, RepeatingEvent};
pub use collab::{Clock, FixedClock, NameFilter, SystemClock, TomlWorkSheet, WorkItemSource};
pub use config::Config;
pub use error::{ConfigError, EbsError, Result};
pub use forecast::{Forecast, ForecastBounds, ForecastSettings, Forecaster, SimulationSample};
pub use time::{NormalizedDate, Period, TimeRange};
pub use work::{TaskStatus, WorkItem};

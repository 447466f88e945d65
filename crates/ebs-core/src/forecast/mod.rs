//! Evidence-based completion forecasting.
//!
//! Historical velocity (estimate / actual of finished work) is resampled to
//! build a distribution of how long the outstanding estimates will really
//! take. The mean and a sigma band around it are then walked through the work
//! calendar to give low, mean and high completion dates.

pub mod simulation;
pub mod stats;

pub use simulation::{simulate, SimulationSample};
pub use stats::{mean, variance, ForecastBounds};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::calendar::{Calendar, CompletionWalker, DEFAULT_MAX_DAYS};
use crate::collab::Clock;
use crate::error::Result;
use crate::time::NormalizedDate;
use crate::work::{outstanding_estimates, velocity_samples, WorkItem};

/// Tuning for a forecast run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSettings {
    /// Number of Monte Carlo trials
    pub sample_count: usize,
    /// Standard deviations between the mean and each bound
    pub sigma_level: f64,
    /// Work-seconds credited for each work day
    pub seconds_per_workday: i64,
    /// Day ceiling for each completion walk
    pub max_days: u64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            sample_count: 100,
            sigma_level: 2.0,
            seconds_per_workday: 8 * 60 * 60,
            max_days: DEFAULT_MAX_DAYS,
        }
    }
}

/// Low, mean and high completion dates with the work totals behind them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub today: NormalizedDate,
    pub low: NormalizedDate,
    pub mean: NormalizedDate,
    pub high: NormalizedDate,
    pub bounds: ForecastBounds,
    pub velocity_count: usize,
    pub outstanding_count: usize,
    pub sample_count: usize,
}

/// Runs forecasts against a calendar.
pub struct Forecaster {
    settings: ForecastSettings,
}

impl Forecaster {
    /// Create a forecaster with default settings.
    pub fn new() -> Self {
        Self {
            settings: ForecastSettings::default(),
        }
    }

    /// Create a forecaster with custom settings.
    pub fn with_settings(settings: ForecastSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// Forecast completion of the outstanding `items` starting at `today`.
    ///
    /// # Errors
    ///
    /// [`EbsError::OutOfRange`](crate::EbsError::OutOfRange) if the simulated
    /// work cannot be expressed in seconds, otherwise the first walker
    /// failure; a forecast with only some dates is never returned.
    pub fn forecast<R: Rng + ?Sized>(
        &self,
        items: &[WorkItem],
        calendar: &Calendar,
        today: NormalizedDate,
        rng: &mut R,
    ) -> Result<Forecast> {
        let velocities = velocity_samples(items);
        let estimates = outstanding_estimates(items);

        let samples = simulate(&velocities, &estimates, self.settings.sample_count, rng);
        let bounds = ForecastBounds::from_samples(&samples, self.settings.sigma_level)?;
        tracing::debug!(
            velocities = velocities.len(),
            outstanding = estimates.len(),
            samples = samples.len(),
            low = bounds.low_seconds,
            mean = bounds.mean_seconds,
            high = bounds.high_seconds,
            "simulated remaining work"
        );

        let walker = CompletionWalker::new(calendar, self.settings.seconds_per_workday)
            .with_max_days(self.settings.max_days);

        Ok(Forecast {
            today,
            low: walker.completion_date(&today, bounds.low_seconds)?,
            mean: walker.completion_date(&today, bounds.mean_seconds)?,
            high: walker.completion_date(&today, bounds.high_seconds)?,
            bounds,
            velocity_count: velocities.len(),
            outstanding_count: estimates.len(),
            sample_count: samples.len(),
        })
    }

    /// Forecast starting at the clock's current time.
    ///
    /// # Errors
    ///
    /// [`EbsError::TimeUnavailable`](crate::EbsError::TimeUnavailable) if the
    /// clock cannot be read, otherwise as [`forecast`](Self::forecast).
    pub fn forecast_now<R: Rng + ?Sized>(
        &self,
        items: &[WorkItem],
        calendar: &Calendar,
        clock: &dyn Clock,
        rng: &mut R,
    ) -> Result<Forecast> {
        let today = clock.now()?;
        self.forecast(items, calendar, today, rng)
    }
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new()
    }
}

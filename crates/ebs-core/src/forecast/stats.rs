use serde::{Deserialize, Serialize};

use super::simulation::SimulationSample;
use crate::error::{EbsError, Result};

/// Arithmetic mean; 0 for no samples.
pub fn mean(samples: &[SimulationSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(SimulationSample::seconds).sum::<f64>() / samples.len() as f64
}

/// Bessel-corrected sample variance; 0 for fewer than two samples.
pub fn variance(samples: &[SimulationSample]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let m = mean(samples);
    let sum_of_squares: f64 = samples
        .iter()
        .map(|s| {
            let d = s.seconds() - m;
            d * d
        })
        .sum();
    sum_of_squares / (samples.len() - 1) as f64
}

/// Work-seconds at `mean - kσ`, `mean`, `mean + kσ`, rounded to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastBounds {
    pub low_seconds: i64,
    pub mean_seconds: i64,
    pub high_seconds: i64,
}

impl ForecastBounds {
    /// # Errors
    ///
    /// [`EbsError::OutOfRange`] when the mean or spread is not finite or a
    /// bound does not fit in whole seconds.
    pub fn from_samples(samples: &[SimulationSample], sigma_level: f64) -> Result<Self> {
        let m = mean(samples);
        let spread = sigma_level * variance(samples).sqrt();
        if !m.is_finite() || !spread.is_finite() {
            return Err(EbsError::out_of_range(format!(
                "simulated work is not finite (mean {m}, spread {spread})"
            )));
        }
        Ok(Self {
            low_seconds: whole_seconds(m - spread)?,
            mean_seconds: whole_seconds(m)?,
            high_seconds: whole_seconds(m + spread)?,
        })
    }
}

fn whole_seconds(value: f64) -> Result<i64> {
    let rounded = value.round();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Err(EbsError::out_of_range(format!(
            "{rounded} seconds of work does not fit"
        )));
    }
    Ok(rounded as i64)
}

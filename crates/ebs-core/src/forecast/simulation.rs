//! Monte Carlo resampling of historical velocity.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Total work-seconds for all outstanding items in one simulated future.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SimulationSample(pub f64);

impl SimulationSample {
    pub fn seconds(&self) -> f64 {
        self.0
    }
}

/// Run `sample_count` trials.
///
/// Each trial draws one velocity per outstanding estimate, uniformly and with
/// replacement, and sums `estimate / velocity`. With no velocity history the
/// estimates are taken at face value.
pub fn simulate<R: Rng + ?Sized>(
    velocities: &[f64],
    estimates: &[f64],
    sample_count: usize,
    rng: &mut R,
) -> Vec<SimulationSample> {
    (0..sample_count)
        .map(|_| {
            let total = estimates
                .iter()
                .map(|estimate| estimate / draw_velocity(velocities, rng))
                .sum();
            SimulationSample(total)
        })
        .collect()
}

fn draw_velocity<R: Rng + ?Sized>(velocities: &[f64], rng: &mut R) -> f64 {
    if velocities.is_empty() {
        return 1.0;
    }
    velocities[rng.gen_range(0..velocities.len())]
}

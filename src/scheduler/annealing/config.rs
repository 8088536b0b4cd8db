//! Annealing configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the simulated-annealing optimizer.
///
/// Cooling is geometric: `T_{k+1} = cooling_rate × T_k`, applied once per
/// iteration whether or not the move was accepted.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_roster::scheduler::AnnealingConfig;
///
/// let config = AnnealingConfig::default()
///     .with_initial_temperature(5.0)
///     .with_iterations(2_000)
///     .with_time_limit(Duration::from_millis(500))
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Starting temperature. Higher values accept more worsening moves.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1].
    pub cooling_rate: f64,

    /// Iteration budget.
    pub iterations: usize,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,

    /// Optional wall-clock budget.
    pub time_limit: Option<Duration>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 10.0,
            cooling_rate: 0.995,
            iterations: 10_000,
            seed: None,
            time_limit: None,
        }
    }
}

impl AnnealingConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return Err(format!(
                "cooling_rate must be in (0, 1], got {}",
                self.cooling_rate
            ));
        }
        Ok(())
    }
}

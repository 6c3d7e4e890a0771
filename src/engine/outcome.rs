use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;

/// One drawn execution result, before it is folded into any statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub duration_seconds: f64,
    pub success: bool,
}

/// Source of execution results. The simulator draws them from a RNG; a
/// non-demo implementation would run the workflow's steps against real
/// systems and report what actually happened.
#[async_trait]
pub trait OutcomeProvider: Send + Sync {
    async fn run(&self, step_count: usize) -> Outcome;
}

/// The dashboard's pseudo-random outcomes: per-step duration drawn
/// uniformly from the configured range, success with fixed probability,
/// independent of all prior state.
pub struct SimulatedOutcomes {
    rng: Mutex<StdRng>,
    success_probability: f64,
    step_seconds_min: f64,
    step_seconds_max: f64,
}

impl SimulatedOutcomes {
    pub fn new(config: &Config) -> Self {
        Self::with_rng(StdRng::from_os_rng(), config)
    }

    /// Deterministic variant for tests: the same seed yields the same
    /// outcome sequence.
    pub fn seeded(seed: u64, config: &Config) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), config)
    }

    fn with_rng(rng: StdRng, config: &Config) -> Self {
        SimulatedOutcomes {
            rng: Mutex::new(rng),
            success_probability: config.success_probability,
            step_seconds_min: config.step_seconds_min,
            step_seconds_max: config.step_seconds_max,
        }
    }
}

#[async_trait]
impl OutcomeProvider for SimulatedOutcomes {
    async fn run(&self, step_count: usize) -> Outcome {
        let mut rng = self.rng.lock().unwrap();
        let per_step = rng.random_range(self.step_seconds_min..self.step_seconds_max);
        let success = rng.random_bool(self.success_probability);
        Outcome {
            duration_seconds: step_count as f64 * per_step,
            success,
        }
    }
}

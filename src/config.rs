use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::models::workflow::WorkflowStatus;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const DEFAULT_LOG_LIMIT: usize = 50;

/// Whether paused and draft workflows may be executed. The dashboard's
/// original behavior never blocked them; here the choice is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    /// Only `active` workflows run; anything else is rejected.
    #[default]
    ActiveOnly,
    /// Any workflow may be run by hand, regardless of status.
    AllowManual,
}

impl ExecutionPolicy {
    pub fn permits(self, status: WorkflowStatus) -> bool {
        match self {
            ExecutionPolicy::ActiveOnly => status == WorkflowStatus::Active,
            ExecutionPolicy::AllowManual => true,
        }
    }
}

impl FromStr for ExecutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active-only" => Ok(ExecutionPolicy::ActiveOnly),
            "allow-manual" => Ok(ExecutionPolicy::AllowManual),
            other => Err(format!("unknown execution policy: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Per-workflow execution history cap.
    pub history_limit: usize,
    /// Global execution log cap.
    pub log_limit: usize,
    pub success_probability: f64,
    pub step_seconds_min: f64,
    pub step_seconds_max: f64,
    /// Step count assumed for the duration draw when a workflow has no steps.
    pub default_step_count: usize,
    /// Cosmetic delay between runs of a batch execution.
    pub batch_stagger: Duration,
    pub execution_timeout: Duration,
    pub execution_policy: ExecutionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_limit: DEFAULT_LOG_LIMIT,
            success_probability: 0.9,
            step_seconds_min: 0.3,
            step_seconds_max: 0.8,
            default_step_count: 3,
            batch_stagger: Duration::from_millis(100),
            execution_timeout: Duration::from_secs(30),
            execution_policy: ExecutionPolicy::ActiveOnly,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok(); // Load .env file

        let defaults = Config::default();
        Config {
            history_limit: env_or("FLOWDECK_HISTORY_LIMIT", defaults.history_limit),
            log_limit: env_or("FLOWDECK_LOG_LIMIT", defaults.log_limit),
            success_probability: env_or(
                "FLOWDECK_SUCCESS_PROBABILITY",
                defaults.success_probability,
            ),
            step_seconds_min: env_or("FLOWDECK_STEP_SECONDS_MIN", defaults.step_seconds_min),
            step_seconds_max: env_or("FLOWDECK_STEP_SECONDS_MAX", defaults.step_seconds_max),
            default_step_count: env_or("FLOWDECK_DEFAULT_STEP_COUNT", defaults.default_step_count),
            batch_stagger: Duration::from_millis(env_or("FLOWDECK_BATCH_STAGGER_MS", 100)),
            execution_timeout: Duration::from_secs(env_or("FLOWDECK_EXECUTION_TIMEOUT_SECS", 30)),
            execution_policy: env_or(
                "FLOWDECK_EXECUTION_POLICY",
                defaults.execution_policy,
            ),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

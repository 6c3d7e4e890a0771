use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::error::WorkflowError;
use crate::models::workflow::{Workflow, WorkflowStatus};
use crate::registry::WorkflowRegistry;
use crate::utils::{round_to_hundredth, round_to_tenth};

/// Fleet-wide rollup, recomputed from the registry on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetStats {
    pub total: usize,
    pub active: usize,
    pub paused: usize,
    pub draft: usize,
    pub total_executions: u64,
    pub total_success: u64,
    /// Percentage over all executions, one decimal; 0 when nothing ran.
    pub avg_success_rate: f64,
    pub total_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Efficiency {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl Efficiency {
    pub fn from_success_rate(success_rate: u8) -> Self {
        if success_rate > 95 {
            Efficiency::Excellent
        } else if success_rate > 85 {
            Efficiency::Good
        } else if success_rate > 70 {
            Efficiency::Average
        } else {
            Efficiency::NeedsImprovement
        }
    }
}

impl fmt::Display for Efficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Efficiency::Excellent => write!(f, "Excellent"),
            Efficiency::Good => write!(f, "Good"),
            Efficiency::Average => write!(f, "Average"),
            Efficiency::NeedsImprovement => write!(f, "Needs Improvement"),
        }
    }
}

/// Per-workflow derived view.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStats {
    pub workflow: Workflow,
    pub total_steps: usize,
    /// Two decimals; 0 when the workflow has no steps.
    pub avg_time_per_step: f64,
    pub efficiency: Efficiency,
}

/// Aggregate runtime broken into clock components. `seconds` keeps one
/// decimal, so 3725 total seconds displays as "1h 2m 5.0s".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalSystemTime {
    pub total_seconds: f64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: f64,
}

impl fmt::Display for TotalSystemTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours > 0 {
            write!(f, "{}h {}m {:.1}s", self.hours, self.minutes, self.seconds)
        } else if self.minutes > 0 {
            write!(f, "{}m {:.1}s", self.minutes, self.seconds)
        } else {
            write!(f, "{:.1}s", self.seconds)
        }
    }
}

pub fn fleet_stats(registry: &WorkflowRegistry) -> FleetStats {
    let workflows = registry.list();

    let total = workflows.len();
    let active = count_status(&workflows, WorkflowStatus::Active);
    let paused = count_status(&workflows, WorkflowStatus::Paused);
    let draft = count_status(&workflows, WorkflowStatus::Draft);
    let total_executions: u64 = workflows.iter().map(|w| w.executions).sum();
    let total_success: u64 = workflows.iter().map(|w| w.success_count).sum();
    let avg_success_rate = if total_executions > 0 {
        round_to_tenth(total_success as f64 / total_executions as f64 * 100.0)
    } else {
        0.0
    };
    let total_time = round_to_tenth(workflows.iter().map(|w| w.total_time).sum());

    FleetStats {
        total,
        active,
        paused,
        draft,
        total_executions,
        total_success,
        avg_success_rate,
        total_time,
    }
}

pub fn workflow_stats(
    registry: &WorkflowRegistry,
    id: Uuid,
) -> Result<WorkflowStats, WorkflowError> {
    let workflow = registry.get(id)?;

    let total_steps = workflow.steps.len();
    let avg_time_per_step = if total_steps > 0 {
        round_to_hundredth(workflow.avg_time / total_steps as f64)
    } else {
        0.0
    };
    let efficiency = Efficiency::from_success_rate(workflow.success_rate);

    Ok(WorkflowStats {
        workflow,
        total_steps,
        avg_time_per_step,
        efficiency,
    })
}

pub fn total_system_time(registry: &WorkflowRegistry) -> TotalSystemTime {
    let total_seconds: f64 = registry.list().iter().map(|w| w.total_time).sum();

    TotalSystemTime {
        total_seconds,
        hours: (total_seconds / 3600.0) as u64,
        minutes: ((total_seconds % 3600.0) / 60.0) as u64,
        seconds: round_to_tenth(total_seconds % 60.0),
    }
}

fn count_status(workflows: &[Workflow], status: WorkflowStatus) -> usize {
    workflows.iter().filter(|w| w.status == status).count()
}

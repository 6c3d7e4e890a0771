use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::execution::ExecutionRecord;
use crate::models::step::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Active,
    Paused,
    Draft,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStatus::Active => write!(f, "active"),
            WorkflowStatus::Paused => write!(f, "paused"),
            WorkflowStatus::Draft => write!(f, "draft"),
        }
    }
}

/// One automation definition plus its aggregate execution statistics.
///
/// Invariant: `success_count + failed_count == executions`, and `avg_time`
/// stays within rounding tolerance of `total_time / executions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub trigger: String,
    pub status: WorkflowStatus,
    pub steps: Vec<Step>,
    pub executions: u64,
    pub success_count: u64,
    pub failed_count: u64,
    /// Derived percentage, 0 when the workflow has never run.
    pub success_rate: u8,
    pub avg_time: f64,
    pub total_time: f64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_run: Option<OffsetDateTime>,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Most-recent-first, bounded by the registry's history limit.
    pub history: Vec<ExecutionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkflow {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub trigger: String,
    #[serde(default)]
    pub status: Option<WorkflowStatus>,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkflow {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub trigger: Option<String>,
    pub status: Option<WorkflowStatus>,
}

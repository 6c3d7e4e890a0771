use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Immutable record of one execution attempt, kept in the owning
/// workflow's bounded history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Seconds, one decimal.
    pub duration_seconds: f64,
    pub success: bool,
    pub step_count: usize,
    pub detail: String,
}

/// Cross-workflow entry in the global execution log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub workflow_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub duration_seconds: f64,
    pub success: bool,
    pub step_count: usize,
}

/// What `engine::execute` hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub duration_seconds: f64,
    pub message: String,
}

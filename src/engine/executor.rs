use time::OffsetDateTime;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::engine::outcome::Outcome;
use crate::error::WorkflowError;
use crate::models::execution::{ExecutionOutcome, ExecutionRecord, LogEntry};
use crate::state::AppState;
use crate::utils::round_to_tenth;

/// Runs one simulated execution of the workflow and folds the result into
/// its statistics, the global execution log, and (best effort) the archive.
///
/// The outcome draw is wrapped in the configured timeout; an overrun is
/// recorded as a failed execution whose duration is the timeout budget.
pub async fn execute(
    state: &AppState,
    workflow_id: Uuid,
) -> Result<ExecutionOutcome, WorkflowError> {
    let workflow = state.registry.get(workflow_id)?;
    if !state.config.execution_policy.permits(workflow.status) {
        return Err(WorkflowError::NotRunnable {
            id: workflow_id,
            status: workflow.status,
        });
    }

    let step_count = workflow.steps.len();
    let simulated_steps = if step_count == 0 {
        state.config.default_step_count
    } else {
        step_count
    };

    let started_at = OffsetDateTime::now_utc();
    let outcome = match timeout(
        state.config.execution_timeout,
        state.outcomes.run(simulated_steps),
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(
                workflow_id = %workflow_id,
                timeout = ?state.config.execution_timeout,
                "execution overran its budget, recording a failure"
            );
            Outcome {
                duration_seconds: state.config.execution_timeout.as_secs_f64(),
                success: false,
            }
        }
    };

    let duration = round_to_tenth(outcome.duration_seconds);
    let record = ExecutionRecord {
        id: Uuid::new_v4(),
        timestamp: started_at,
        duration_seconds: duration,
        success: outcome.success,
        step_count,
        detail: format!("Executed {step_count} steps in {duration:.1}s"),
    };

    let updated = state.registry.record_execution(workflow_id, record.clone())?;
    state.execution_log.append(LogEntry {
        id: Uuid::new_v4(),
        workflow_id,
        workflow_name: updated.name.clone(),
        timestamp: record.timestamp,
        duration_seconds: duration,
        success: outcome.success,
        step_count,
    });
    state.persist(&updated).await;

    debug!(
        workflow_id = %workflow_id,
        success = outcome.success,
        duration,
        "workflow execution recorded"
    );

    Ok(ExecutionOutcome {
        success: outcome.success,
        duration_seconds: duration,
        message: if outcome.success {
            "Workflow executed successfully".to_string()
        } else {
            "Workflow execution failed".to_string()
        },
    })
}

/// Fires `times` independent executions, staggered by the configured
/// batching delay. The delay is cosmetic; runs are logically sequential.
pub async fn execute_multiple(
    state: &AppState,
    workflow_id: Uuid,
    times: usize,
) -> Result<Vec<ExecutionOutcome>, WorkflowError> {
    let mut outcomes = Vec::with_capacity(times);
    for i in 0..times {
        if i > 0 {
            sleep(state.config.batch_stagger).await;
        }
        outcomes.push(execute(state, workflow_id).await?);
    }
    Ok(outcomes)
}

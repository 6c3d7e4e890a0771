use thiserror::Error;
use uuid::Uuid;

use crate::models::workflow::WorkflowStatus;

/// Failures of registry and simulator operations. All of these are
/// recoverable; nothing in this crate is fatal.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("workflow {0} not found")]
    NotFound(Uuid),

    #[error("step {step_id} not found on workflow {workflow_id}")]
    StepNotFound { workflow_id: Uuid, step_id: Uuid },

    #[error("invalid workflow: {0}")]
    Validation(String),

    #[error("workflow {id} is {status} and the execution policy only permits active workflows")]
    NotRunnable { id: Uuid, status: WorkflowStatus },
}

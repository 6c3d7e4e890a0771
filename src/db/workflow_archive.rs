use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::workflow::Workflow;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive unavailable: {0}")]
    Unavailable(String),

    #[error("failed to serialize workflow record")]
    Serialization(#[from] serde_json::Error),
}

/// Optional durability sink for workflow records, scoped by user.
///
/// The simulator works entirely in memory; implementations of this trait
/// are best-effort. Callers treat every failure as recoverable and keep
/// going without the archive.
#[async_trait]
pub trait WorkflowArchive: Send + Sync {
    async fn save(&self, user_id: Uuid, workflow: &Workflow) -> Result<(), ArchiveError>;

    async fn load_all(&self, user_id: Uuid) -> Result<Vec<Workflow>, ArchiveError>;

    async fn delete(&self, user_id: Uuid, workflow_id: Uuid) -> Result<(), ArchiveError>;
}

/// The "no persistence configured" archive: accepts everything, stores
/// nothing.
pub struct NullArchive;

#[async_trait]
impl WorkflowArchive for NullArchive {
    async fn save(&self, _user_id: Uuid, _workflow: &Workflow) -> Result<(), ArchiveError> {
        Ok(())
    }

    async fn load_all(&self, _user_id: Uuid) -> Result<Vec<Workflow>, ArchiveError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _user_id: Uuid, _workflow_id: Uuid) -> Result<(), ArchiveError> {
        Ok(())
    }
}

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::db::workflow_archive::{ArchiveError, WorkflowArchive};
use crate::models::workflow::Workflow;

/// Document-store style archive held in memory: one JSON document per
/// workflow, keyed by owner. Doubles as the failure-injection archive for
/// tests via `fail_writes`.
#[derive(Default)]
pub struct InMemoryArchive {
    documents: Mutex<HashMap<Uuid, HashMap<Uuid, Value>>>,
    pub fail_writes: bool,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        InMemoryArchive {
            documents: Mutex::new(HashMap::new()),
            fail_writes: true,
        }
    }

    pub fn document_count(&self, user_id: Uuid) -> usize {
        self.documents
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl WorkflowArchive for InMemoryArchive {
    async fn save(&self, user_id: Uuid, workflow: &Workflow) -> Result<(), ArchiveError> {
        if self.fail_writes {
            return Err(ArchiveError::Unavailable(
                "simulated archive outage".to_string(),
            ));
        }

        let document = serde_json::to_value(workflow)?;
        let mut documents = self.documents.lock().unwrap();
        documents
            .entry(user_id)
            .or_default()
            .insert(workflow.id, document);
        Ok(())
    }

    async fn load_all(&self, user_id: Uuid) -> Result<Vec<Workflow>, ArchiveError> {
        let documents = self.documents.lock().unwrap();
        let mut workflows = match documents.get(&user_id) {
            Some(docs) => docs
                .values()
                .map(|doc| serde_json::from_value::<Workflow>(doc.clone()))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        // The map has no order of its own; hand records back oldest first.
        workflows.sort_by_key(|w| w.created_at);
        Ok(workflows)
    }

    async fn delete(&self, user_id: Uuid, workflow_id: Uuid) -> Result<(), ArchiveError> {
        if self.fail_writes {
            return Err(ArchiveError::Unavailable(
                "simulated archive outage".to_string(),
            ));
        }

        let mut documents = self.documents.lock().unwrap();
        if let Some(docs) = documents.get_mut(&user_id) {
            docs.remove(&workflow_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::workflow::CreateWorkflow;
    use crate::registry::WorkflowRegistry;

    fn workflow(name: &str) -> Workflow {
        let registry = WorkflowRegistry::new();
        registry
            .create(CreateWorkflow {
                name: name.to_string(),
                description: None,
                category: "it".to_string(),
                trigger: "Manual".to_string(),
                status: None,
                created_by: None,
            })
            .expect("created")
    }

    #[tokio::test]
    async fn save_load_delete_round() {
        let archive = InMemoryArchive::new();
        let user_id = Uuid::new_v4();
        let first = workflow("First");
        let second = workflow("Second");

        archive.save(user_id, &first).await.expect("saved");
        archive.save(user_id, &second).await.expect("saved");
        assert_eq!(archive.document_count(user_id), 2);

        let loaded = archive.load_all(user_id).await.expect("loaded");
        assert_eq!(loaded.len(), 2);
        assert!(loaded.iter().any(|w| w.id == first.id));

        archive.delete(user_id, first.id).await.expect("deleted");
        assert_eq!(archive.document_count(user_id), 1);
    }

    #[tokio::test]
    async fn records_are_scoped_by_user() {
        let archive = InMemoryArchive::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        archive.save(alice, &workflow("Hers")).await.expect("saved");
        assert!(archive.load_all(bob).await.expect("loaded").is_empty());
    }

    #[tokio::test]
    async fn failing_archive_rejects_writes() {
        let archive = InMemoryArchive::failing();
        let err = archive
            .save(Uuid::new_v4(), &workflow("Doomed"))
            .await
            .expect_err("write must fail");
        assert!(matches!(err, ArchiveError::Unavailable(_)));
    }

    #[tokio::test]
    async fn null_archive_discards_everything() {
        use crate::db::workflow_archive::NullArchive;

        let archive = NullArchive;
        let user_id = Uuid::new_v4();
        archive.save(user_id, &workflow("Gone")).await.expect("ok");
        assert!(archive.load_all(user_id).await.expect("ok").is_empty());
    }
}

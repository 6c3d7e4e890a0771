use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::db::{NullArchive, WorkflowArchive};
use crate::engine::outcome::{OutcomeProvider, SimulatedOutcomes};
use crate::error::WorkflowError;
use crate::execution_log::ExecutionLog;
use crate::models::workflow::{CreateWorkflow, Workflow};
use crate::registry::WorkflowRegistry;
use crate::seed;

/// Everything the simulator needs, constructed once at process start and
/// passed by reference to consumers. Cheap to clone; all fields are shared.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<WorkflowRegistry>,
    pub execution_log: Arc<ExecutionLog>,
    pub outcomes: Arc<dyn OutcomeProvider>,
    pub archive: Arc<dyn WorkflowArchive>,
    pub config: Arc<Config>,
    /// Scopes archive reads and writes; `None` disables archiving.
    pub current_user: Option<Uuid>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let registry = WorkflowRegistry::with_history_limit(config.history_limit);
        let execution_log = ExecutionLog::with_limit(config.log_limit);
        let outcomes = SimulatedOutcomes::new(&config);

        AppState {
            registry: Arc::new(registry),
            execution_log: Arc::new(execution_log),
            outcomes: Arc::new(outcomes),
            archive: Arc::new(NullArchive),
            config: Arc::new(config),
            current_user: None,
        }
    }

    /// State whose registry starts with the fixed dashboard sample fleet.
    pub fn seeded(config: Config) -> Self {
        let state = Self::new(config);
        state.registry.absorb(seed::sample_workflows());
        state
    }

    pub fn with_outcomes(mut self, outcomes: Arc<dyn OutcomeProvider>) -> Self {
        self.outcomes = outcomes;
        self
    }

    pub fn with_archive(mut self, archive: Arc<dyn WorkflowArchive>) -> Self {
        self.archive = archive;
        self
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.current_user = Some(user_id);
        self
    }

    /// Pulls the current user's archived workflows into the registry.
    /// Archive trouble degrades to in-memory-only operation.
    pub async fn hydrate(&self) {
        let Some(user_id) = self.current_user else {
            return;
        };
        match self.archive.load_all(user_id).await {
            Ok(stored) => {
                let count = stored.len();
                self.registry.absorb(stored);
                debug!(%user_id, count, "hydrated workflows from archive");
            }
            Err(err) => {
                warn!(
                    %user_id,
                    ?err,
                    "failed to load archived workflows, continuing in memory only"
                );
            }
        }
    }

    /// Creates a workflow and archives it best-effort.
    pub async fn create_workflow(&self, payload: CreateWorkflow) -> Result<Workflow, WorkflowError> {
        let workflow = self.registry.create(payload)?;
        self.persist(&workflow).await;
        Ok(workflow)
    }

    /// Removes a workflow and drops its archived document best-effort.
    pub async fn delete_workflow(&self, id: Uuid) -> Result<Workflow, WorkflowError> {
        let removed = self.registry.remove(id)?;
        if let Some(user_id) = self.current_user {
            if let Err(err) = self.archive.delete(user_id, id).await {
                warn!(workflow_id = %id, %user_id, ?err, "failed to delete archived workflow");
            }
        }
        Ok(removed)
    }

    pub(crate) async fn persist(&self, workflow: &Workflow) {
        let Some(user_id) = self.current_user else {
            return;
        };
        if let Err(err) = self.archive.save(user_id, workflow).await {
            warn!(
                workflow_id = %workflow.id,
                %user_id,
                ?err,
                "failed to archive workflow, continuing in memory"
            );
        }
    }
}

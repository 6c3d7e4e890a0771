use std::sync::Mutex;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::error::WorkflowError;
use crate::models::execution::ExecutionRecord;
use crate::models::step::{CreateStep, Step, StepStatus, UpdateStep};
use crate::models::workflow::{CreateWorkflow, UpdateWorkflow, Workflow, WorkflowStatus};
use crate::seed;
use crate::utils::round_to_tenth;

/// The authoritative in-memory collection of workflows, in insertion order.
///
/// Every public operation acquires the lock once and completes its full
/// read-modify-write inside it, so each call is atomic even under
/// concurrent callers.
pub struct WorkflowRegistry {
    workflows: Mutex<Vec<Workflow>>,
    history_limit: usize,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        WorkflowRegistry {
            workflows: Mutex::new(Vec::new()),
            history_limit,
        }
    }

    /// A registry preloaded with the fixed dashboard sample data.
    pub fn seeded() -> Self {
        let registry = Self::new();
        registry.absorb(seed::sample_workflows());
        registry
    }

    pub fn create(&self, payload: CreateWorkflow) -> Result<Workflow, WorkflowError> {
        if payload.name.trim().is_empty() {
            return Err(WorkflowError::Validation(
                "workflow name must not be empty".to_string(),
            ));
        }

        let workflow = Workflow {
            id: Uuid::new_v4(),
            name: payload.name,
            description: payload.description,
            category: payload.category,
            trigger: payload.trigger,
            status: payload.status.unwrap_or(WorkflowStatus::Draft),
            steps: Vec::new(),
            executions: 0,
            success_count: 0,
            failed_count: 0,
            success_rate: 0,
            avg_time: 0.0,
            total_time: 0.0,
            last_run: None,
            created_by: payload
                .created_by
                .unwrap_or_else(|| "Current User".to_string()),
            created_at: OffsetDateTime::now_utc(),
            history: Vec::new(),
        };

        let mut workflows = self.workflows.lock().unwrap();
        workflows.push(workflow.clone());
        Ok(workflow)
    }

    pub fn get(&self, id: Uuid) -> Result<Workflow, WorkflowError> {
        let workflows = self.workflows.lock().unwrap();
        workflows
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or(WorkflowError::NotFound(id))
    }

    pub fn list(&self) -> Vec<Workflow> {
        self.workflows.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.workflows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.lock().unwrap().is_empty()
    }

    pub fn update(&self, id: Uuid, patch: UpdateWorkflow) -> Result<Workflow, WorkflowError> {
        let mut workflows = self.workflows.lock().unwrap();
        let workflow = find_mut(&mut workflows, id)?;

        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(WorkflowError::Validation(
                    "workflow name must not be empty".to_string(),
                ));
            }
            workflow.name = name;
        }
        if let Some(description) = patch.description {
            workflow.description = Some(description);
        }
        if let Some(category) = patch.category {
            workflow.category = category;
        }
        if let Some(trigger) = patch.trigger {
            workflow.trigger = trigger;
        }
        if let Some(status) = patch.status {
            workflow.status = status;
        }

        Ok(workflow.clone())
    }

    /// Deletes the workflow and returns the removed record.
    pub fn remove(&self, id: Uuid) -> Result<Workflow, WorkflowError> {
        let mut workflows = self.workflows.lock().unwrap();
        let position = workflows
            .iter()
            .position(|w| w.id == id)
            .ok_or(WorkflowError::NotFound(id))?;
        Ok(workflows.remove(position))
    }

    /// Clones a workflow under a new id with every counter reset and all
    /// steps re-id'd. The original record is left untouched.
    pub fn duplicate(&self, id: Uuid) -> Result<Workflow, WorkflowError> {
        let mut workflows = self.workflows.lock().unwrap();
        let original = workflows
            .iter()
            .find(|w| w.id == id)
            .ok_or(WorkflowError::NotFound(id))?;

        let copy = Workflow {
            id: Uuid::new_v4(),
            name: format!("{} (Copy)", original.name),
            description: original.description.clone(),
            category: original.category.clone(),
            trigger: original.trigger.clone(),
            status: WorkflowStatus::Draft,
            steps: original
                .steps
                .iter()
                .map(|step| Step {
                    id: Uuid::new_v4(),
                    ..step.clone()
                })
                .collect(),
            executions: 0,
            success_count: 0,
            failed_count: 0,
            success_rate: 0,
            avg_time: 0.0,
            total_time: 0.0,
            last_run: None,
            created_by: original.created_by.clone(),
            created_at: OffsetDateTime::now_utc(),
            history: Vec::new(),
        };

        workflows.push(copy.clone());
        Ok(copy)
    }

    pub fn pause(&self, id: Uuid) -> Result<Workflow, WorkflowError> {
        self.set_status(id, WorkflowStatus::Paused)
    }

    pub fn activate(&self, id: Uuid) -> Result<Workflow, WorkflowError> {
        self.set_status(id, WorkflowStatus::Active)
    }

    fn set_status(&self, id: Uuid, status: WorkflowStatus) -> Result<Workflow, WorkflowError> {
        let mut workflows = self.workflows.lock().unwrap();
        let workflow = find_mut(&mut workflows, id)?;
        workflow.status = status;
        Ok(workflow.clone())
    }

    pub fn add_step(&self, id: Uuid, payload: CreateStep) -> Result<Step, WorkflowError> {
        let mut workflows = self.workflows.lock().unwrap();
        let workflow = find_mut(&mut workflows, id)?;

        let step = Step {
            id: Uuid::new_v4(),
            name: payload.name,
            kind: payload.kind,
            status: StepStatus::Pending,
            duration: 0.0,
        };
        workflow.steps.push(step.clone());
        Ok(step)
    }

    pub fn update_step(
        &self,
        id: Uuid,
        step_id: Uuid,
        patch: UpdateStep,
    ) -> Result<Step, WorkflowError> {
        let mut workflows = self.workflows.lock().unwrap();
        let workflow = find_mut(&mut workflows, id)?;
        let step = workflow
            .steps
            .iter_mut()
            .find(|s| s.id == step_id)
            .ok_or(WorkflowError::StepNotFound {
                workflow_id: id,
                step_id,
            })?;

        if let Some(name) = patch.name {
            step.name = name;
        }
        if let Some(kind) = patch.kind {
            step.kind = kind;
        }
        if let Some(status) = patch.status {
            step.status = status;
        }
        if let Some(duration) = patch.duration {
            step.duration = duration;
        }

        Ok(step.clone())
    }

    pub fn remove_step(&self, id: Uuid, step_id: Uuid) -> Result<(), WorkflowError> {
        let mut workflows = self.workflows.lock().unwrap();
        let workflow = find_mut(&mut workflows, id)?;

        let before = workflow.steps.len();
        workflow.steps.retain(|s| s.id != step_id);
        if workflow.steps.len() == before {
            return Err(WorkflowError::StepNotFound {
                workflow_id: id,
                step_id,
            });
        }
        Ok(())
    }

    /// Folds one execution into the workflow's statistics. All side effects
    /// happen under a single lock acquisition:
    /// counters, success rate, the incremental running average, cumulative
    /// time, `last_run`, and the bounded history.
    pub fn record_execution(
        &self,
        id: Uuid,
        record: ExecutionRecord,
    ) -> Result<Workflow, WorkflowError> {
        let mut workflows = self.workflows.lock().unwrap();
        let workflow = find_mut(&mut workflows, id)?;

        let previous_executions = workflow.executions;
        workflow.executions += 1;
        if record.success {
            workflow.success_count += 1;
        } else {
            workflow.failed_count += 1;
        }
        workflow.success_rate = ((workflow.success_count as f64 / workflow.executions as f64)
            * 100.0)
            .round() as u8;
        workflow.avg_time = round_to_tenth(
            (workflow.avg_time * previous_executions as f64 + record.duration_seconds)
                / workflow.executions as f64,
        );
        workflow.total_time += record.duration_seconds;
        workflow.last_run = Some(record.timestamp);
        workflow.history.insert(0, record);
        workflow.history.truncate(self.history_limit);

        Ok(workflow.clone())
    }

    /// Inserts workflows loaded from the archive, skipping ids already
    /// present.
    pub fn absorb(&self, incoming: Vec<Workflow>) {
        let mut workflows = self.workflows.lock().unwrap();
        for workflow in incoming {
            if !workflows.iter().any(|w| w.id == workflow.id) {
                workflows.push(workflow);
            }
        }
    }
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn find_mut(workflows: &mut [Workflow], id: Uuid) -> Result<&mut Workflow, WorkflowError> {
    workflows
        .iter_mut()
        .find(|w| w.id == id)
        .ok_or(WorkflowError::NotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> CreateWorkflow {
        CreateWorkflow {
            name: name.to_string(),
            description: Some("test workflow".to_string()),
            category: "it".to_string(),
            trigger: "Manual".to_string(),
            status: None,
            created_by: None,
        }
    }

    fn record(success: bool, duration: f64) -> ExecutionRecord {
        ExecutionRecord {
            id: Uuid::new_v4(),
            timestamp: OffsetDateTime::now_utc(),
            duration_seconds: duration,
            success,
            step_count: 0,
            detail: format!("Executed 0 steps in {duration:.1}s"),
        }
    }

    #[test]
    fn create_defaults_to_draft_with_zeroed_counters() {
        let registry = WorkflowRegistry::new();
        let workflow = registry.create(payload("Lead Scoring")).expect("created");

        assert_eq!(workflow.status, WorkflowStatus::Draft);
        assert_eq!(workflow.executions, 0);
        assert_eq!(workflow.success_rate, 0);
        assert_eq!(workflow.avg_time, 0.0);
        assert!(workflow.last_run.is_none());
        assert!(workflow.history.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn create_rejects_blank_names() {
        let registry = WorkflowRegistry::new();
        let err = registry.create(payload("   ")).expect_err("blank name");
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn create_honors_an_explicit_status() {
        let registry = WorkflowRegistry::new();
        let mut data = payload("Data Sync");
        data.status = Some(WorkflowStatus::Active);
        let workflow = registry.create(data).expect("created");
        assert_eq!(workflow.status, WorkflowStatus::Active);
    }

    #[test]
    fn update_patches_only_provided_fields() {
        let registry = WorkflowRegistry::new();
        let workflow = registry.create(payload("Old Name")).expect("created");

        let updated = registry
            .update(
                workflow.id,
                UpdateWorkflow {
                    name: Some("New Name".to_string()),
                    status: Some(WorkflowStatus::Active),
                    ..Default::default()
                },
            )
            .expect("updated");

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.status, WorkflowStatus::Active);
        assert_eq!(updated.category, "it");
        assert_eq!(updated.trigger, "Manual");
    }

    #[test]
    fn operations_on_unknown_ids_surface_not_found() {
        let registry = WorkflowRegistry::new();
        let id = Uuid::new_v4();

        assert!(matches!(registry.get(id), Err(WorkflowError::NotFound(_))));
        assert!(matches!(
            registry.remove(id),
            Err(WorkflowError::NotFound(_))
        ));
        assert!(matches!(
            registry.duplicate(id),
            Err(WorkflowError::NotFound(_))
        ));
        assert!(matches!(
            registry.record_execution(id, record(true, 1.0)),
            Err(WorkflowError::NotFound(_))
        ));
    }

    #[test]
    fn remove_deletes_the_matching_entry() {
        let registry = WorkflowRegistry::new();
        let keep = registry.create(payload("Keep")).expect("created");
        let drop = registry.create(payload("Drop")).expect("created");

        registry.remove(drop.id).expect("removed");
        let remaining = registry.list();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
    }

    #[test]
    fn duplicate_resets_counters_and_reids_steps() {
        let registry = WorkflowRegistry::seeded();
        let original = registry
            .list()
            .into_iter()
            .find(|w| w.name == "Customer Onboarding")
            .expect("seeded workflow");

        let copy = registry.duplicate(original.id).expect("duplicated");

        assert_eq!(copy.name, "Customer Onboarding (Copy)");
        assert_eq!(copy.status, WorkflowStatus::Draft);
        assert_eq!(copy.executions, 0);
        assert_eq!(copy.success_count, 0);
        assert_eq!(copy.failed_count, 0);
        assert_eq!(copy.success_rate, 0);
        assert_eq!(copy.avg_time, 0.0);
        assert_eq!(copy.total_time, 0.0);
        assert!(copy.last_run.is_none());
        assert!(copy.history.is_empty());

        assert_eq!(copy.steps.len(), original.steps.len());
        for (copied, source) in copy.steps.iter().zip(&original.steps) {
            assert_ne!(copied.id, source.id);
            assert_eq!(copied.name, source.name);
        }

        // The source record is unchanged.
        let source = registry.get(original.id).expect("original still there");
        assert_eq!(source.executions, original.executions);
        assert_eq!(source.success_count, original.success_count);
        assert_eq!(source.name, "Customer Onboarding");
    }

    #[test]
    fn pause_and_activate_flip_status() {
        let registry = WorkflowRegistry::new();
        let workflow = registry.create(payload("Toggle")).expect("created");

        assert_eq!(
            registry.pause(workflow.id).expect("paused").status,
            WorkflowStatus::Paused
        );
        assert_eq!(
            registry.activate(workflow.id).expect("activated").status,
            WorkflowStatus::Active
        );
    }

    #[test]
    fn step_crud_round() {
        let registry = WorkflowRegistry::new();
        let workflow = registry.create(payload("Stepped")).expect("created");

        let step = registry
            .add_step(
                workflow.id,
                CreateStep {
                    name: "Send Welcome Email".to_string(),
                    kind: "email".to_string(),
                },
            )
            .expect("step added");
        assert_eq!(step.status, StepStatus::Pending);
        assert_eq!(step.duration, 0.0);

        let updated = registry
            .update_step(
                workflow.id,
                step.id,
                UpdateStep {
                    status: Some(StepStatus::Success),
                    duration: Some(1.2),
                    ..Default::default()
                },
            )
            .expect("step updated");
        assert_eq!(updated.status, StepStatus::Success);
        assert_eq!(updated.duration, 1.2);

        registry.remove_step(workflow.id, step.id).expect("removed");
        assert!(registry
            .get(workflow.id)
            .expect("workflow")
            .steps
            .is_empty());

        let missing = registry.remove_step(workflow.id, step.id);
        assert!(matches!(missing, Err(WorkflowError::StepNotFound { .. })));
    }

    #[test]
    fn record_execution_keeps_counter_invariants() {
        let registry = WorkflowRegistry::new();
        let workflow = registry.create(payload("Counted")).expect("created");

        // Durations whose running means stay exact at one decimal.
        let durations = [1.2, 0.8, 1.0, 1.4];
        let mut folded = workflow.clone();
        for (i, duration) in durations.iter().cycle().take(20).enumerate() {
            folded = registry
                .record_execution(workflow.id, record(i % 5 != 0, *duration))
                .expect("recorded");
        }

        assert_eq!(folded.executions, 20);
        assert_eq!(folded.success_count + folded.failed_count, 20);
        assert_eq!(folded.success_count, 16);
        assert_eq!(
            folded.success_rate,
            ((folded.success_count as f64 / 20.0) * 100.0).round() as u8
        );
        assert!((folded.avg_time - folded.total_time / 20.0).abs() <= 0.05);
        assert_eq!(folded.avg_time, 1.1);
        assert!(folded.last_run.is_some());
    }

    #[test]
    fn history_is_bounded_and_newest_first() {
        let registry = WorkflowRegistry::new();
        let workflow = registry.create(payload("Busy")).expect("created");

        for i in 0..25 {
            registry
                .record_execution(workflow.id, record(true, i as f64))
                .expect("recorded");
        }

        let history = registry.get(workflow.id).expect("workflow").history;
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].duration_seconds, 24.0);
        assert_eq!(history[9].duration_seconds, 15.0);
    }

    #[test]
    fn absorb_skips_already_known_ids() {
        let registry = WorkflowRegistry::new();
        let workflow = registry.create(payload("Known")).expect("created");

        registry.absorb(vec![workflow.clone(), workflow.clone()]);
        assert_eq!(registry.len(), 1);
    }
}

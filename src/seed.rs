use time::macros::datetime;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::step::{Step, StepStatus};
use crate::models::workflow::{Workflow, WorkflowStatus};

fn step(name: &str, kind: &str, status: StepStatus, duration: f64) -> Step {
    Step {
        id: Uuid::new_v4(),
        name: name.to_string(),
        kind: kind.to_string(),
        status,
        duration,
    }
}

#[allow(clippy::too_many_arguments)]
fn workflow(
    name: &str,
    description: &str,
    category: &str,
    trigger: &str,
    status: WorkflowStatus,
    steps: Vec<Step>,
    executions: u64,
    success_count: u64,
    avg_time: f64,
    total_time: f64,
    last_run: Option<OffsetDateTime>,
    created_by: &str,
    created_at: OffsetDateTime,
) -> Workflow {
    let success_rate = if executions == 0 {
        0
    } else {
        ((success_count as f64 / executions as f64) * 100.0).round() as u8
    };
    Workflow {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: Some(description.to_string()),
        category: category.to_string(),
        trigger: trigger.to_string(),
        status,
        steps,
        executions,
        success_count,
        failed_count: executions - success_count,
        success_rate,
        avg_time,
        total_time,
        last_run,
        created_by: created_by.to_string(),
        created_at,
        history: Vec::new(),
    }
}

/// The fixed sample fleet the dashboard starts with.
pub fn sample_workflows() -> Vec<Workflow> {
    vec![
        workflow(
            "Customer Onboarding",
            "Automated customer welcome and setup process",
            "customer",
            "New Customer Signup",
            WorkflowStatus::Active,
            vec![
                step("Send Welcome Email", "email", StepStatus::Success, 1.2),
                step("Create CRM Record", "crm", StepStatus::Success, 0.8),
                step("Notify Sales Team", "slack", StepStatus::Success, 0.5),
                step("Schedule Follow-up", "calendar", StepStatus::Pending, 0.0),
            ],
            245,
            240,
            2.5,
            612.5,
            Some(datetime!(2024-01-20 10:30 UTC)),
            "Admin",
            datetime!(2024-01-01 08:00 UTC),
        ),
        workflow(
            "Invoice Processing",
            "Automatic invoice handling and approval",
            "finance",
            "New Invoice Received",
            WorkflowStatus::Active,
            vec![
                step("Extract Invoice Data", "ai", StepStatus::Success, 1.5),
                step("Validate with PO", "database", StepStatus::Success, 0.9),
                step("Route for Approval", "email", StepStatus::Success, 0.3),
            ],
            567,
            539,
            2.7,
            1530.9,
            Some(datetime!(2024-01-20 09:15 UTC)),
            "Admin",
            datetime!(2024-01-01 09:00 UTC),
        ),
        workflow(
            "Email Marketing Campaign",
            "Scheduled email campaigns for leads",
            "marketing",
            "Schedule",
            WorkflowStatus::Paused,
            vec![
                step("Segment Audience", "database", StepStatus::Success, 1.8),
                step("Personalize Content", "ai", StepStatus::Success, 2.1),
                step("Send Emails", "email", StepStatus::Success, 3.4),
            ],
            189,
            189,
            7.3,
            1379.7,
            Some(datetime!(2024-01-19 14:00 UTC)),
            "Marketing",
            datetime!(2024-01-02 10:00 UTC),
        ),
        workflow(
            "Data Sync",
            "Sync data between systems",
            "it",
            "Manual",
            WorkflowStatus::Draft,
            vec![
                step("Extract from Source", "api", StepStatus::Pending, 0.0),
                step("Transform Data", "script", StepStatus::Pending, 0.0),
            ],
            0,
            0,
            0.0,
            0.0,
            None,
            "IT",
            datetime!(2024-01-20 11:00 UTC),
        ),
    ]
}

use crate::flow::field::{FieldDescriptor, FieldKind};
use crate::flow::registry::{FlowDescriptor, StepDescriptor};

/// Approval-workflow creation: definition, approver levels, confirmation.
pub fn workflow_creation() -> FlowDescriptor {
    FlowDescriptor::new(
        "workflow_creation",
        "Approval workflow creation",
        "/workflows",
        vec![
            StepDescriptor::new(
                1,
                "definition",
                "Workflow definition",
                "Workflow Definition",
                vec![
                    FieldDescriptor::new("workflow_name", "Workflow name", FieldKind::Text),
                    FieldDescriptor::new(
                        "trigger_operation",
                        "Trigger operation",
                        FieldKind::Choice(vec![
                            "Customer Onboarding",
                            "Ledger Posting",
                            "Product Change",
                            "Admin Change",
                        ]),
                    ),
                ],
            ),
            StepDescriptor::new(
                2,
                "approvers",
                "Approver levels",
                "Approver Levels",
                vec![
                    FieldDescriptor::new("approval_levels", "Approval levels", FieldKind::Number)
                        .with_help("Number of sign-offs required, 1 or more"),
                    FieldDescriptor::new(
                        "first_approver_role",
                        "First approver role",
                        FieldKind::Choice(vec!["Supervisor", "Auditor", "Administrator"]),
                    ),
                    FieldDescriptor::new(
                        "final_approver_role",
                        "Final approver role",
                        FieldKind::Choice(vec!["Supervisor", "Auditor", "Administrator"]),
                    )
                    .with_optional(),
                ],
            ),
            StepDescriptor::confirmation(3),
        ],
    )
}

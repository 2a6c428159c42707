use crate::flow::field::{FieldDescriptor, FieldKind};
use crate::flow::registry::{FlowDescriptor, StepDescriptor};

/// Back-office admin creation: profile, role assignment, confirmation.
pub fn admin_creation() -> FlowDescriptor {
    FlowDescriptor::new(
        "admin_creation",
        "Admin creation",
        "/admins",
        vec![
            StepDescriptor::new(
                1,
                "profile",
                "Admin profile",
                "Admin Profile",
                vec![
                    FieldDescriptor::new("first_name", "First name", FieldKind::Text),
                    FieldDescriptor::new("last_name", "Last name", FieldKind::Text),
                    FieldDescriptor::new("email", "Email", FieldKind::Email),
                    FieldDescriptor::new("phone_number", "Phone number", FieldKind::Text)
                        .with_optional(),
                ],
            ),
            StepDescriptor::new(
                2,
                "role",
                "Role assignment",
                "Role Assignment",
                vec![
                    FieldDescriptor::new(
                        "role",
                        "Role",
                        FieldKind::Choice(vec![
                            "Teller",
                            "Supervisor",
                            "Auditor",
                            "Administrator",
                        ]),
                    ),
                    FieldDescriptor::new("team", "Team", FieldKind::Text).with_optional(),
                ],
            ),
            StepDescriptor::confirmation(3),
        ],
    )
}

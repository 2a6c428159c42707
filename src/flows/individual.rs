use crate::flow::field::{FieldDescriptor, FieldKind};
use crate::flow::registry::{FlowDescriptor, StepDescriptor};
use crate::flow::validator::CrossFieldRule;

const ID_DOCUMENT_MAX_LEN: u64 = 5 * 1024 * 1024;

/// Individual customer onboarding: personal details, contact, identification
/// with a document upload, optional preferences, confirmation.
pub fn individual_onboarding() -> FlowDescriptor {
    FlowDescriptor::new(
        "individual_onboarding",
        "Individual customer onboarding",
        "/customers/individual",
        vec![
            StepDescriptor::new(
                1,
                "personal",
                "Personal details",
                "Personal Details",
                vec![
                    FieldDescriptor::new("first_name", "First name", FieldKind::Text),
                    FieldDescriptor::new("last_name", "Last name", FieldKind::Text),
                    FieldDescriptor::new("date_of_birth", "Date of birth", FieldKind::Date),
                    FieldDescriptor::new("occupation", "Occupation", FieldKind::Text)
                        .with_optional(),
                ],
            ),
            StepDescriptor::new(
                2,
                "contact",
                "Contact information",
                "Contact Information",
                vec![
                    FieldDescriptor::new("email", "Email", FieldKind::Email),
                    FieldDescriptor::new("phone_number", "Phone number", FieldKind::Text),
                    FieldDescriptor::new(
                        "residential_address",
                        "Residential address",
                        FieldKind::Text,
                    ),
                ],
            ),
            StepDescriptor::new(
                3,
                "identification",
                "Identification",
                "Identification",
                vec![
                    FieldDescriptor::new(
                        "id_type",
                        "ID type",
                        FieldKind::Choice(vec!["Passport", "National ID", "Driving License"]),
                    ),
                    FieldDescriptor::new("id_number", "ID number", FieldKind::Text)
                        .with_help("As printed on the identification document"),
                    FieldDescriptor::new(
                        "id_document",
                        "ID document",
                        FieldKind::Attachment {
                            max_len: ID_DOCUMENT_MAX_LEN,
                            allowed_types: vec!["image/png", "image/jpeg", "application/pdf"],
                        },
                    ),
                    FieldDescriptor::new("issue_date", "Issue date", FieldKind::Date)
                        .with_optional(),
                    FieldDescriptor::new("expiry_date", "Expiry date", FieldKind::Date)
                        .with_optional(),
                ],
            )
            .with_rule(CrossFieldRule::DateOrder {
                start: "issue_date",
                end: "expiry_date",
            }),
            StepDescriptor::new(
                4,
                "preferences",
                "Account preferences",
                "Preferences",
                vec![
                    FieldDescriptor::new("preferred_branch", "Preferred branch", FieldKind::Text)
                        .with_optional(),
                    FieldDescriptor::new(
                        "statement_frequency",
                        "Statement frequency",
                        FieldKind::Choice(vec!["Monthly", "Quarterly", "Annually"]),
                    )
                    .with_optional(),
                ],
            )
            .with_skippable(),
            StepDescriptor::confirmation(5),
        ],
    )
}

use crate::flow::field::{FieldDescriptor, FieldKind};
use crate::flow::registry::{FlowDescriptor, StepDescriptor};

const DOCUMENT_MAX_LEN: u64 = 10 * 1024 * 1024;

/// Business customer onboarding: profile, directors, registration documents,
/// optional settlement preferences, confirmation.
pub fn business_onboarding() -> FlowDescriptor {
    FlowDescriptor::new(
        "business_onboarding",
        "Business customer onboarding",
        "/customers/business",
        vec![
            StepDescriptor::new(
                1,
                "profile",
                "Business profile",
                "Business Profile",
                vec![
                    FieldDescriptor::new("business_name", "Business name", FieldKind::Text),
                    FieldDescriptor::new(
                        "registration_number",
                        "Registration number",
                        FieldKind::Text,
                    ),
                    FieldDescriptor::new("business_address", "Business address", FieldKind::Text),
                    FieldDescriptor::new(
                        "incorporation_date",
                        "Incorporation date",
                        FieldKind::Date,
                    ),
                    FieldDescriptor::new(
                        "business_type",
                        "Business type",
                        FieldKind::Choice(vec![
                            "Sole Proprietorship",
                            "Partnership",
                            "Limited Liability",
                            "Corporation",
                        ]),
                    ),
                ],
            ),
            StepDescriptor::new(
                2,
                "directors",
                "Directors",
                "Directors",
                vec![
                    FieldDescriptor::new("director_name", "Director name", FieldKind::Text),
                    FieldDescriptor::new("director_email", "Director email", FieldKind::Email),
                    FieldDescriptor::new(
                        "director_id_number",
                        "Director ID number",
                        FieldKind::Text,
                    ),
                ],
            ),
            StepDescriptor::new(
                3,
                "documents",
                "Registration documents",
                "Business Documents",
                vec![
                    FieldDescriptor::new(
                        "certificate_of_incorporation",
                        "Certificate of incorporation",
                        FieldKind::Attachment {
                            max_len: DOCUMENT_MAX_LEN,
                            allowed_types: vec!["image/png", "image/jpeg", "application/pdf"],
                        },
                    ),
                    FieldDescriptor::new(
                        "tax_clearance",
                        "Tax clearance",
                        FieldKind::Attachment {
                            max_len: DOCUMENT_MAX_LEN,
                            allowed_types: vec!["application/pdf"],
                        },
                    )
                    .with_optional(),
                ],
            ),
            StepDescriptor::new(
                4,
                "settlement",
                "Settlement preferences",
                "Settlement Preferences",
                vec![
                    FieldDescriptor::new(
                        "settlement_account",
                        "Settlement account",
                        FieldKind::Text,
                    )
                    .with_optional(),
                    FieldDescriptor::new(
                        "settlement_currency",
                        "Settlement currency",
                        FieldKind::Choice(vec!["USD", "EUR", "GBP", "NGN"]),
                    )
                    .with_optional(),
                ],
            )
            .with_skippable(),
            StepDescriptor::confirmation(5),
        ],
    )
}

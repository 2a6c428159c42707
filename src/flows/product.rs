use crate::flow::field::{FieldDescriptor, FieldKind};
use crate::flow::registry::{FlowDescriptor, StepDescriptor};

/// Banking product creation: definition, limits and charges, confirmation.
pub fn product_creation() -> FlowDescriptor {
    FlowDescriptor::new(
        "product_creation",
        "Product creation",
        "/products",
        vec![
            StepDescriptor::new(
                1,
                "definition",
                "Product definition",
                "Product Definition",
                vec![
                    FieldDescriptor::new("product_name", "Product name", FieldKind::Text),
                    FieldDescriptor::new("product_code", "Product code", FieldKind::Text)
                        .with_help("Short unique code used in statements"),
                    FieldDescriptor::new(
                        "product_type",
                        "Product type",
                        FieldKind::Choice(vec!["Savings", "Current", "Fixed Deposit", "Loan"]),
                    ),
                    FieldDescriptor::new(
                        "currency",
                        "Currency",
                        FieldKind::Choice(vec!["USD", "EUR", "GBP", "NGN"]),
                    ),
                ],
            ),
            StepDescriptor::new(
                2,
                "limits",
                "Limits and charges",
                "Limits And Charges",
                vec![
                    FieldDescriptor::new("minimum_balance", "Minimum balance", FieldKind::Number),
                    FieldDescriptor::new(
                        "maximum_daily_withdrawal",
                        "Maximum daily withdrawal",
                        FieldKind::Number,
                    )
                    .with_optional(),
                    FieldDescriptor::new("maintenance_fee", "Maintenance fee", FieldKind::Number)
                        .with_optional(),
                ],
            ),
            StepDescriptor::confirmation(3),
        ],
    )
}

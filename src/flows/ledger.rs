use crate::flow::field::{FieldDescriptor, FieldKind};
use crate::flow::registry::{FlowDescriptor, StepDescriptor};

/// Financial-accounting ledger creation: details, classification, confirmation.
pub fn ledger_creation() -> FlowDescriptor {
    FlowDescriptor::new(
        "ledger_creation",
        "Ledger creation",
        "/ledgers",
        vec![
            StepDescriptor::new(
                1,
                "details",
                "Ledger details",
                "Ledger Details",
                vec![
                    FieldDescriptor::new("ledger_name", "Ledger name", FieldKind::Text),
                    FieldDescriptor::new("ledger_code", "Ledger code", FieldKind::Text),
                    FieldDescriptor::new(
                        "currency",
                        "Currency",
                        FieldKind::Choice(vec!["USD", "EUR", "GBP", "NGN"]),
                    ),
                ],
            ),
            StepDescriptor::new(
                2,
                "classification",
                "Accounting classification",
                "Accounting Classification",
                vec![
                    FieldDescriptor::new(
                        "ledger_category",
                        "Ledger category",
                        FieldKind::Choice(vec![
                            "Asset",
                            "Liability",
                            "Income",
                            "Expense",
                            "Equity",
                        ]),
                    ),
                    FieldDescriptor::new("parent_ledger", "Parent ledger", FieldKind::Text)
                        .with_optional(),
                    FieldDescriptor::new("opening_date", "Opening date", FieldKind::Date)
                        .with_optional(),
                ],
            ),
            StepDescriptor::confirmation(3),
        ],
    )
}

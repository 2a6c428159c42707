//! Concrete flow registries. Each instantiates the generic step/validator/
//! navigation pattern with its own schema and section layout.

mod admin;
mod business;
mod individual;
mod ledger;
mod product;
mod workflow;

pub use admin::admin_creation;
pub use business::business_onboarding;
pub use individual::individual_onboarding;
pub use ledger::ledger_creation;
pub use product::product_creation;
pub use workflow::workflow_creation;

use crate::flow::registry::FlowDescriptor;

/// Every flow the back office offers, in menu order.
pub fn all() -> Vec<FlowDescriptor> {
    vec![
        individual_onboarding(),
        business_onboarding(),
        admin_creation(),
        product_creation(),
        ledger_creation(),
        workflow_creation(),
    ]
}

/// Looks a flow up by its stable storage key.
pub fn find(key: &str) -> Option<FlowDescriptor> {
    all().into_iter().find(|flow| flow.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_flow_ends_in_a_confirmation_step() {
        for flow in all() {
            let terminal = flow.step(flow.terminal_index());
            assert!(
                terminal.is_confirmation(),
                "flow `{}` must end with a confirmation step",
                flow.key
            );
        }
    }

    #[test]
    fn required_fields_are_disjoint_across_steps() {
        for flow in all() {
            let mut seen = std::collections::HashSet::new();
            for step in flow.steps() {
                for field in step.fields.iter().filter(|field| field.required) {
                    assert!(
                        seen.insert(field.key),
                        "flow `{}` declares required field `{}` twice",
                        flow.key,
                        field.key
                    );
                }
            }
        }
    }

    #[test]
    fn find_resolves_known_keys() {
        assert!(find("business_onboarding").is_some());
        assert!(find("nonexistent").is_none());
    }
}

use crate::flow::field::FieldDescriptor;
use crate::flow::validator::CrossFieldRule;

/// Immutable definition of one wizard step.
///
/// Indices are 1-based and contiguous within a flow; the terminal index is
/// always the confirmation step, which carries no fields of its own.
#[derive(Debug, Clone)]
pub struct StepDescriptor {
    pub index: usize,
    pub key: &'static str,
    pub title: &'static str,
    /// Display grouping used by summaries and remote-error surfacing.
    pub section: &'static str,
    pub fields: Vec<FieldDescriptor>,
    pub rules: Vec<CrossFieldRule>,
    pub skippable: bool,
}

impl StepDescriptor {
    pub fn new(
        index: usize,
        key: &'static str,
        title: &'static str,
        section: &'static str,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            index,
            key,
            title,
            section,
            fields,
            rules: Vec::new(),
            skippable: false,
        }
    }

    pub fn with_skippable(mut self) -> Self {
        self.skippable = true;
        self
    }

    pub fn with_rule(mut self, rule: CrossFieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Confirmation step closing a flow.
    pub fn confirmation(index: usize) -> Self {
        Self::new(index, "confirm", "Confirm and submit", "Confirmation", Vec::new())
    }

    pub fn is_confirmation(&self) -> bool {
        self.fields.is_empty() && self.key == "confirm"
    }
}

/// Ordered registry of the steps making up one flow.
#[derive(Debug, Clone)]
pub struct FlowDescriptor {
    /// Stable key used for draft storage and resume state.
    pub key: &'static str,
    pub name: &'static str,
    /// Gateway path receiving the final submission payload.
    pub submit_path: &'static str,
    steps: Vec<StepDescriptor>,
}

impl FlowDescriptor {
    /// Builds a flow registry.
    ///
    /// Panics when indices are not contiguous from 1 or the terminal step is
    /// not a confirmation step: flow definitions are compile-time constants,
    /// so a malformed registry is a programming error.
    pub fn new(
        key: &'static str,
        name: &'static str,
        submit_path: &'static str,
        steps: Vec<StepDescriptor>,
    ) -> Self {
        assert!(!steps.is_empty(), "flow `{key}` has no steps");
        for (position, step) in steps.iter().enumerate() {
            assert_eq!(
                step.index,
                position + 1,
                "flow `{key}` step `{}` has non-contiguous index",
                step.key
            );
        }
        let terminal = steps.last().expect("non-empty steps");
        assert!(
            terminal.is_confirmation(),
            "flow `{key}` must end with a confirmation step"
        );
        Self {
            key,
            name,
            submit_path,
            steps,
        }
    }

    /// Resolves a step by 1-based index. An undefined index is a programming
    /// error and panics.
    pub fn step(&self, index: usize) -> &StepDescriptor {
        self.get(index)
            .unwrap_or_else(|| panic!("flow `{}` has no step {index}", self.key))
    }

    pub fn get(&self, index: usize) -> Option<&StepDescriptor> {
        index.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn terminal_index(&self) -> usize {
        self.steps.len()
    }

    /// Section owning a field key, when any step's schema declares it.
    pub fn section_for_field(&self, field_key: &str) -> Option<&'static str> {
        self.step_owning_field(field_key)
            .map(|index| self.step(index).section)
    }

    /// Index of the first step whose schema declares the field key.
    pub fn step_owning_field(&self, field_key: &str) -> Option<usize> {
        self.steps
            .iter()
            .find(|step| step.fields.iter().any(|field| field.key == field_key))
            .map(|step| step.index)
    }

    /// Every required field key across the flow, in step order.
    pub fn required_field_keys(&self) -> Vec<&'static str> {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .filter(|field| field.required)
            .map(|field| field.key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::field::{FieldDescriptor, FieldKind};

    fn two_step_flow() -> FlowDescriptor {
        FlowDescriptor::new(
            "sample",
            "Sample",
            "/sample",
            vec![
                StepDescriptor::new(
                    1,
                    "details",
                    "Details",
                    "General Information",
                    vec![FieldDescriptor::new("full_name", "Full name", FieldKind::Text)],
                ),
                StepDescriptor::confirmation(2),
            ],
        )
    }

    #[test]
    fn resolves_steps_and_sections() {
        let flow = two_step_flow();
        assert_eq!(flow.terminal_index(), 2);
        assert_eq!(flow.step(1).key, "details");
        assert_eq!(flow.section_for_field("full_name"), Some("General Information"));
        assert_eq!(flow.step_owning_field("full_name"), Some(1));
        assert_eq!(flow.section_for_field("unknown"), None);
    }

    #[test]
    #[should_panic(expected = "non-contiguous")]
    fn rejects_non_contiguous_indices() {
        let _ = FlowDescriptor::new(
            "broken",
            "Broken",
            "/broken",
            vec![
                StepDescriptor::new(1, "a", "A", "General Information", Vec::new()),
                StepDescriptor::confirmation(3),
            ],
        );
    }

    #[test]
    #[should_panic(expected = "no step 9")]
    fn undefined_index_is_a_programming_error() {
        let flow = two_step_flow();
        let _ = flow.step(9);
    }
}

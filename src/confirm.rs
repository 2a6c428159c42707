//! Submission confirmation: aggregated draft summary, the final gateway
//! call, and mapping of remote failures back to the step that owns them.

use serde_json::{Map, Value};

use crate::errors::FlowError;
use crate::flow::draft::Draft;
use crate::flow::field::{to_pascal_case, FieldValue};
use crate::flow::registry::FlowDescriptor;
use crate::gateway::{
    first_failing_step, normalize, GatewayClient, RemoteErrorBody, RemoteFieldError, SubmitResult,
};
use crate::storage::BlobStore;

/// One rendered field on the confirmation screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub label: String,
    pub value: String,
}

/// Fields of one originating step, grouped for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub section: &'static str,
    pub entries: Vec<SummaryEntry>,
}

/// Read-only view of every non-empty draft field, grouped by the step that
/// collected it. The confirmation step itself contributes nothing.
pub fn build_summary(flow: &FlowDescriptor, draft: &Draft) -> Vec<SummarySection> {
    let mut sections = Vec::new();
    for step in flow.steps() {
        if step.is_confirmation() {
            continue;
        }
        let entries: Vec<SummaryEntry> = step
            .fields
            .iter()
            .filter_map(|field| {
                draft
                    .get(field.key)
                    .filter(|value| !value.is_empty())
                    .map(|value| SummaryEntry {
                        label: field.label.to_string(),
                        value: value.display(),
                    })
            })
            .collect();
        if !entries.is_empty() {
            sections.push(SummarySection {
                section: step.section,
                entries,
            });
        }
    }
    sections
}

/// Terminal result of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The gateway accepted the draft; the flow is over and the caller
    /// clears the persisted draft.
    Accepted,
    /// 401: offer re-authentication, never field remediation.
    AuthRequired,
    /// 403: generic denial.
    Denied,
    /// Remote validation failure. `resume_step` is the step owning the first
    /// failing field, for the "make changes" action.
    Rejected {
        errors: Vec<RemoteFieldError>,
        resume_step: Option<usize>,
    },
}

/// Performs the final remote call for a flow and maps its failure shapes.
pub struct SubmissionConfirmer<'a> {
    flow: &'a FlowDescriptor,
    gateway: &'a GatewayClient,
    blobs: &'a BlobStore,
}

impl<'a> SubmissionConfirmer<'a> {
    pub fn new(flow: &'a FlowDescriptor, gateway: &'a GatewayClient, blobs: &'a BlobStore) -> Self {
        Self {
            flow,
            gateway,
            blobs,
        }
    }

    pub fn summary(&self, draft: &Draft) -> Vec<SummarySection> {
        build_summary(self.flow, draft)
    }

    /// Builds the full submission payload: PascalCase field names as the
    /// gateway expects, attachments expanded to their data-URL transport
    /// form from the blob store.
    pub fn payload(&self, draft: &Draft) -> Result<Value, FlowError> {
        let mut map = Map::new();
        for (key, value) in draft.iter() {
            let wire_value = match value {
                FieldValue::Text(text) | FieldValue::Choice(text) => Value::String(text.clone()),
                FieldValue::Number(num) => serde_json::json!(num),
                FieldValue::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
                FieldValue::Attachment(reference) => {
                    Value::String(self.blobs.data_url(reference)?)
                }
            };
            map.insert(to_pascal_case(key), wire_value);
        }
        Ok(Value::Object(map))
    }

    /// Submits the entire draft and classifies the outcome.
    pub async fn submit(&self, draft: &Draft) -> Result<SubmissionOutcome, FlowError> {
        let payload = self.payload(draft)?;
        match self.gateway.submit(self.flow.submit_path, &payload).await? {
            SubmitResult::Accepted(_) => {
                tracing::info!("flow `{}` submission accepted", self.flow.key);
                Ok(SubmissionOutcome::Accepted)
            }
            SubmitResult::AuthRequired => Ok(SubmissionOutcome::AuthRequired),
            SubmitResult::Denied => Ok(SubmissionOutcome::Denied),
            SubmitResult::Rejected { status, errors } => {
                tracing::info!("flow `{}` submission rejected ({})", self.flow.key, status);
                Ok(self.resolve_rejection(errors))
            }
            SubmitResult::TransportFailed(reason) => {
                // No response at all: generic single-message path.
                Ok(self.resolve_rejection(RemoteErrorBody::Message(format!(
                    "The gateway could not be reached: {}",
                    reason
                ))))
            }
        }
    }

    /// Normalizes a decoded error body against this flow and resolves the
    /// step to return to. Pure mapping, usable without a live gateway.
    pub fn resolve_rejection(&self, body: RemoteErrorBody) -> SubmissionOutcome {
        let errors = normalize(&body, self.flow);
        let resume_step = first_failing_step(&errors, self.flow);
        SubmissionOutcome::Rejected {
            errors,
            resume_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::field::{FieldDescriptor, FieldKind};
    use crate::flow::registry::StepDescriptor;

    fn flow() -> FlowDescriptor {
        FlowDescriptor::new(
            "sample",
            "Sample",
            "/sample",
            vec![
                StepDescriptor::new(
                    1,
                    "details",
                    "Details",
                    "Personal Details",
                    vec![
                        FieldDescriptor::new("first_name", "First name", FieldKind::Text),
                        FieldDescriptor::new("nickname", "Nickname", FieldKind::Text)
                            .with_optional(),
                    ],
                ),
                StepDescriptor::confirmation(2),
            ],
        )
    }

    #[test]
    fn summary_groups_non_empty_fields_by_section() {
        let mut draft = Draft::new();
        draft.insert("first_name", FieldValue::Text("Ada".into()));
        draft.insert("nickname", FieldValue::Text("  ".into()));
        let sections = build_summary(&flow(), &draft);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section, "Personal Details");
        assert_eq!(sections[0].entries.len(), 1);
        assert_eq!(sections[0].entries[0].label, "First name");
        assert_eq!(sections[0].entries[0].value, "Ada");
    }
}

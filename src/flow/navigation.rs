use std::collections::BTreeMap;

use crate::errors::FlowError;
use crate::flow::draft::Draft;
use crate::flow::registry::{FlowDescriptor, StepDescriptor};
use crate::flow::validator::{validate_step, FieldViolation};
use crate::storage::DraftStore;

const STEP_PARAM: &str = "step";

/// Query-string state carrying the step cursor and flow-mode flags, so a
/// restart resumes the same position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeQuery {
    pub step: Option<usize>,
    pub flags: BTreeMap<String, String>,
}

impl ResumeQuery {
    /// Parses `step=3&customer_type=business` style state. Unparseable step
    /// values are treated as absent.
    pub fn parse(query: &str) -> Self {
        let mut step = None;
        let mut flags = BTreeMap::new();
        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            if key == STEP_PARAM {
                step = value.parse::<usize>().ok();
            } else if !key.is_empty() {
                flags.insert(unescape_component(key), unescape_component(value));
            }
        }
        Self { step, flags }
    }

    /// Encodes the state back into query form. Flag keys and values are
    /// percent-escaped so the separators round-trip through `parse`.
    pub fn encode(&self) -> String {
        let mut parts = Vec::with_capacity(self.flags.len() + 1);
        if let Some(step) = self.step {
            parts.push(format!("{}={}", STEP_PARAM, step));
        }
        for (key, value) in &self.flags {
            parts.push(format!(
                "{}={}",
                escape_component(key),
                escape_component(value)
            ));
        }
        parts.join("&")
    }
}

fn escape_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape_component(raw: &str) -> String {
    // `%25` last, so decoded percent signs cannot form new escapes.
    raw.replace("%3D", "=").replace("%26", "&").replace("%25", "%")
}

/// Result of attempting to advance past the current step.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// Validation passed, values were persisted, cursor moved to `to`.
    Advanced { to: usize },
    /// Validation failed; the cursor is unchanged.
    Blocked(Vec<FieldViolation>),
    /// Already on the confirmation step; nothing advances past it.
    AtTerminal,
}

/// Drives one flow instance: resolves the current step, gates advancement on
/// validation, persists accepted values, and keeps the resumable query state
/// current on every transition.
///
/// The draft is owned by the controller for the lifetime of the attempt and
/// threaded explicitly to callers; no ambient shared state.
pub struct FlowController<'a, S: DraftStore> {
    flow: &'a FlowDescriptor,
    store: &'a S,
    cursor: usize,
    flags: BTreeMap<String, String>,
    draft: Draft,
}

impl<'a, S: DraftStore> FlowController<'a, S> {
    /// Resumes the flow from its recorded query state, defaulting to step 1.
    /// An out-of-range cursor is clamped to the nearest valid step.
    pub fn resume(flow: &'a FlowDescriptor, store: &'a S) -> Result<Self, FlowError> {
        let query = store
            .load_resume(flow.key)?
            .map(|raw| ResumeQuery::parse(&raw))
            .unwrap_or_default();
        Self::with_query(flow, store, &query)
    }

    /// Resumes from an explicit query state.
    pub fn with_query(
        flow: &'a FlowDescriptor,
        store: &'a S,
        query: &ResumeQuery,
    ) -> Result<Self, FlowError> {
        let cursor = clamp_cursor(flow, query.step.unwrap_or(1));
        let draft = store.load(flow.key)?;
        let controller = Self {
            flow,
            store,
            cursor,
            flags: query.flags.clone(),
            draft,
        };
        controller.persist_query()?;
        Ok(controller)
    }

    pub fn flow(&self) -> &FlowDescriptor {
        self.flow
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_step(&self) -> &StepDescriptor {
        self.flow.step(self.cursor)
    }

    pub fn at_terminal(&self) -> bool {
        self.cursor == self.flow.terminal_index()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn flag(&self, key: &str) -> Option<&str> {
        self.flags.get(key).map(String::as_str)
    }

    pub fn set_flag(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), FlowError> {
        self.flags.insert(key.into(), value.into());
        self.persist_query()
    }

    /// Current resumable query state.
    pub fn query(&self) -> ResumeQuery {
        ResumeQuery {
            step: Some(self.cursor),
            flags: self.flags.clone(),
        }
    }

    /// Validates the current step against the draft overlaid with `input`,
    /// persists the normalized values, and advances by one.
    pub fn next(&mut self, input: &Draft) -> Result<NavigationOutcome, FlowError> {
        if self.at_terminal() {
            return Ok(NavigationOutcome::AtTerminal);
        }
        let step = self.flow.step(self.cursor);
        let mut view = self.draft.clone();
        view.merge_from(input);
        match validate_step(step, &view) {
            Ok(normalized) => {
                self.draft = self.store.merge(self.flow.key, &normalized)?;
                self.cursor += 1;
                self.persist_query()?;
                tracing::debug!(
                    "flow `{}` advanced past `{}` to step {}",
                    self.flow.key,
                    step.key,
                    self.cursor
                );
                Ok(NavigationOutcome::Advanced { to: self.cursor })
            }
            Err(violations) => Ok(NavigationOutcome::Blocked(violations)),
        }
    }

    /// Moves back one step unconditionally; the step being left is not
    /// re-validated. Has no effect on step 1.
    pub fn previous(&mut self) -> Result<usize, FlowError> {
        if self.cursor > 1 {
            self.cursor -= 1;
            self.persist_query()?;
        }
        Ok(self.cursor)
    }

    /// Advances without validation. Only legal for skippable steps.
    pub fn skip(&mut self) -> Result<usize, FlowError> {
        let step = self.flow.step(self.cursor);
        if !step.skippable {
            return Err(FlowError::NotSkippable(self.cursor));
        }
        if !self.at_terminal() {
            self.cursor += 1;
            self.persist_query()?;
        }
        Ok(self.cursor)
    }

    /// Sets the cursor directly, clamped to the flow's valid range. Used by
    /// "make changes" from the confirmation step and by error surfacing.
    pub fn jump_to(&mut self, step: usize) -> Result<usize, FlowError> {
        self.cursor = clamp_cursor(self.flow, step);
        self.persist_query()?;
        Ok(self.cursor)
    }

    /// Abandons the attempt: clears the persisted draft and resume state.
    pub fn cancel(&mut self) -> Result<(), FlowError> {
        self.draft = Draft::new();
        self.cursor = 1;
        self.store.clear(self.flow.key)
    }

    /// Called after a successful final submission; the persisted draft and
    /// resume state are gone and the flow is exited.
    pub fn finish(&mut self) -> Result<(), FlowError> {
        self.draft = Draft::new();
        self.store.clear(self.flow.key)
    }

    fn persist_query(&self) -> Result<(), FlowError> {
        self.store.record_resume(self.flow.key, &self.query().encode())
    }
}

fn clamp_cursor(flow: &FlowDescriptor, requested: usize) -> usize {
    requested.clamp(1, flow.terminal_index())
}

use chrono::NaiveDate;
use std::fmt;

use crate::flow::draft::Draft;
use crate::flow::field::{FieldDescriptor, FieldKind, FieldValue};
use crate::flow::registry::StepDescriptor;

/// Classifies a per-field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    EmptyRequired,
    MalformedFormat,
    UnknownChoice,
    SizeExceeded,
    TypeNotAllowed,
    CrossField,
}

/// Field-level validation failure surfaced inline next to the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Constraint spanning more than one field of a step.
#[derive(Debug, Clone)]
pub enum CrossFieldRule {
    /// The `end` date must not precede the `start` date.
    DateOrder {
        start: &'static str,
        end: &'static str,
    },
}

/// Validates the subset of draft fields relevant to `step`.
///
/// Pure check: returns the normalized value set on success, or every
/// violation found. Skippable steps accept an entirely empty subset; required
/// steps block until all required fields pass. Persisting the result is the
/// caller's responsibility.
pub fn validate_step(step: &StepDescriptor, input: &Draft) -> Result<Draft, Vec<FieldViolation>> {
    let subset_empty = step.fields.iter().all(|field| input.get(field.key).is_none());
    if step.skippable && subset_empty {
        return Ok(Draft::new());
    }

    let mut normalized = Draft::new();
    let mut violations = Vec::new();

    for field in &step.fields {
        match input.get(field.key) {
            None => {
                if field.required {
                    violations.push(FieldViolation::new(
                        field.key,
                        ViolationKind::EmptyRequired,
                        format!("{} is required", field.label),
                    ));
                }
            }
            Some(value) => match check_field(field, value) {
                Ok(Some(value)) => normalized.insert(field.key, value),
                Ok(None) => {
                    if field.required {
                        violations.push(FieldViolation::new(
                            field.key,
                            ViolationKind::EmptyRequired,
                            format!("{} is required", field.label),
                        ));
                    }
                }
                Err(violation) => violations.push(violation),
            },
        }
    }

    if violations.is_empty() {
        for rule in &step.rules {
            if let Some(violation) = check_rule(rule, &normalized) {
                violations.push(violation);
            }
        }
    }

    if violations.is_empty() {
        Ok(normalized)
    } else {
        Err(violations)
    }
}

/// Normalizes one value against its descriptor. `Ok(None)` marks an empty
/// optional value that should not be carried into the draft.
fn check_field(
    field: &FieldDescriptor,
    value: &FieldValue,
) -> Result<Option<FieldValue>, FieldViolation> {
    match (&field.kind, value) {
        (FieldKind::Text, FieldValue::Text(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(FieldValue::Text(trimmed.to_string())))
            }
        }
        (FieldKind::Email, FieldValue::Text(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if is_valid_email(trimmed) {
                Ok(Some(FieldValue::Text(trimmed.to_ascii_lowercase())))
            } else {
                Err(FieldViolation::new(
                    field.key,
                    ViolationKind::MalformedFormat,
                    "Enter a valid email address (e.g., name@example.com)",
                ))
            }
        }
        (FieldKind::Number, FieldValue::Number(num)) => Ok(Some(FieldValue::Number(*num))),
        (FieldKind::Number, FieldValue::Text(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(|num| Some(FieldValue::Number(num)))
                .map_err(|_| {
                    FieldViolation::new(
                        field.key,
                        ViolationKind::MalformedFormat,
                        "Enter a numeric value",
                    )
                })
        }
        (FieldKind::Date, FieldValue::Date(date)) => Ok(Some(FieldValue::Date(*date))),
        (FieldKind::Date, FieldValue::Text(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(|date| Some(FieldValue::Date(date)))
                .map_err(|_| {
                    FieldViolation::new(
                        field.key,
                        ViolationKind::MalformedFormat,
                        "Use YYYY-MM-DD format",
                    )
                })
        }
        (FieldKind::Choice(options), FieldValue::Choice(raw))
        | (FieldKind::Choice(options), FieldValue::Text(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            options
                .iter()
                .find(|candidate| candidate.eq_ignore_ascii_case(trimmed))
                .map(|canonical| Some(FieldValue::Choice(canonical.to_string())))
                .ok_or_else(|| {
                    FieldViolation::new(
                        field.key,
                        ViolationKind::UnknownChoice,
                        format!("Value must be one of: {}", options.join(", ")),
                    )
                })
        }
        (
            FieldKind::Attachment {
                max_len,
                allowed_types,
            },
            FieldValue::Attachment(att),
        ) => {
            if att.len > *max_len {
                return Err(FieldViolation::new(
                    field.key,
                    ViolationKind::SizeExceeded,
                    format!("Attachment exceeds {} bytes (got {})", max_len, att.len),
                ));
            }
            if !allowed_types.is_empty()
                && !allowed_types
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(&att.content_type))
            {
                return Err(FieldViolation::new(
                    field.key,
                    ViolationKind::TypeNotAllowed,
                    format!("Attachment type must be one of: {}", allowed_types.join(", ")),
                ));
            }
            Ok(Some(FieldValue::Attachment(att.clone())))
        }
        _ => Err(FieldViolation::new(
            field.key,
            ViolationKind::MalformedFormat,
            format!("{} has an unexpected value type", field.label),
        )),
    }
}

fn check_rule(rule: &CrossFieldRule, values: &Draft) -> Option<FieldViolation> {
    match rule {
        CrossFieldRule::DateOrder { start, end } => {
            let (FieldValue::Date(start_date), FieldValue::Date(end_date)) =
                (values.get(start)?, values.get(end)?)
            else {
                return None;
            };
            if end_date < start_date {
                Some(FieldViolation::new(
                    end,
                    ViolationKind::CrossField,
                    "End date cannot be before the start date",
                ))
            } else {
                None
            }
        }
    }
}

fn is_valid_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !raw.contains(char::is_whitespace)
}

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::flow::field::{humanize_field_name, to_pascal_case, to_snake_case};
use crate::flow::registry::FlowDescriptor;

/// Section assigned to fields no flow schema claims.
pub const GENERAL_SECTION: &str = "General Information";

/// Field key used for errors that are not tied to a specific field.
pub const GENERAL_FIELD: &str = "general";

const GENERIC_MESSAGE: &str = "The request could not be processed. Please try again.";

/// Known gateway misspellings of field names. The gateway is not going to be
/// fixed, so the corrections live here.
static FIELD_NAME_CORRECTIONS: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("BussinessAddress", "BusinessAddress"),
        ("BussinessName", "BusinessName"),
        ("RegistrationNumer", "RegistrationNumber"),
        ("PhoneNumer", "PhoneNumber"),
        ("DateOfBith", "DateOfBirth"),
        ("ResidentialAdress", "ResidentialAddress"),
        ("EmailAdress", "Email"),
    ])
});

/// The four failure-body shapes the gateway is known to produce, decoded
/// defensively: nothing beyond the tag check is assumed about the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteErrorBody {
    /// `{ "errors": { "FieldName": ["message", ...] } }`
    FieldMap(BTreeMap<String, Vec<String>>),
    /// `{ "errors": ["message", ...] }` or a bare JSON array.
    MessageList(Vec<String>),
    /// `{ "message": "..." }`, `{ "error": "..." }`, or a bare string.
    Message(String),
    /// `{}` or an empty body.
    Empty,
}

impl RemoteErrorBody {
    /// Decodes a raw failure body. Unparseable or unrecognized content
    /// degrades to a single generic message; it is never surfaced raw.
    pub fn decode(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return RemoteErrorBody::Empty;
        }
        let value: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("unparseable gateway error body: {}", err);
                return RemoteErrorBody::Message(GENERIC_MESSAGE.into());
            }
        };
        match value {
            Value::Object(map) if map.is_empty() => RemoteErrorBody::Empty,
            Value::Object(map) => {
                match map.get("errors") {
                    Some(Value::Object(fields)) => {
                        return RemoteErrorBody::FieldMap(decode_field_map(fields));
                    }
                    Some(Value::Array(items)) => {
                        return RemoteErrorBody::MessageList(decode_messages(items));
                    }
                    _ => {}
                }
                for key in ["message", "error"] {
                    if let Some(Value::String(message)) = map.get(key) {
                        return RemoteErrorBody::Message(message.clone());
                    }
                }
                RemoteErrorBody::Message(GENERIC_MESSAGE.into())
            }
            Value::Array(items) => RemoteErrorBody::MessageList(decode_messages(&items)),
            Value::String(message) => RemoteErrorBody::Message(message),
            _ => RemoteErrorBody::Message(GENERIC_MESSAGE.into()),
        }
    }
}

fn decode_field_map(fields: &serde_json::Map<String, Value>) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    for (name, value) in fields {
        let messages = match value {
            Value::Array(items) => decode_messages(items),
            Value::String(message) => vec![message.clone()],
            _ => Vec::new(),
        };
        out.insert(name.clone(), messages);
    }
    out
}

fn decode_messages(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(message) => Some(message.clone()),
            _ => None,
        })
        .collect()
}

/// One normalized remote validation failure, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFieldError {
    /// Local snake_case field key, or [`GENERAL_FIELD`].
    pub field_key: String,
    pub label: String,
    pub section: String,
    pub message: String,
}

/// Applies the known-typo corrections to a gateway field name.
pub fn correct_field_name(name: &str) -> &str {
    FIELD_NAME_CORRECTIONS.get(name).copied().unwrap_or(name)
}

/// Normalizes any of the four error-body shapes into a uniform list.
///
/// Sections come from the flow's field-to-section mapping with
/// [`GENERAL_SECTION`] as the fallback. An empty body falls back to the
/// flow's required-field set so the user always sees something actionable.
pub fn normalize(body: &RemoteErrorBody, flow: &FlowDescriptor) -> Vec<RemoteFieldError> {
    match body {
        RemoteErrorBody::FieldMap(fields) => {
            let mut out = Vec::new();
            for (name, messages) in fields {
                let corrected = correct_field_name(name);
                let field_key = to_snake_case(corrected);
                let label = humanize_field_name(corrected);
                let section = flow
                    .section_for_field(&field_key)
                    .unwrap_or(GENERAL_SECTION)
                    .to_string();
                if messages.is_empty() {
                    out.push(RemoteFieldError {
                        field_key: field_key.clone(),
                        label: label.clone(),
                        section: section.clone(),
                        message: "Invalid value".into(),
                    });
                }
                for message in messages {
                    out.push(RemoteFieldError {
                        field_key: field_key.clone(),
                        label: label.clone(),
                        section: section.clone(),
                        message: message.clone(),
                    });
                }
            }
            out
        }
        RemoteErrorBody::MessageList(messages) if !messages.is_empty() => messages
            .iter()
            .map(|message| general_error(message.clone()))
            .collect(),
        RemoteErrorBody::Message(message) => vec![general_error(message.clone())],
        // Empty bodies and empty lists fall back to the required-field set.
        RemoteErrorBody::MessageList(_) | RemoteErrorBody::Empty => flow
            .required_field_keys()
            .into_iter()
            .map(|key| {
                let pascal = to_pascal_case(key);
                RemoteFieldError {
                    field_key: key.to_string(),
                    label: humanize_field_name(&pascal),
                    section: flow
                        .section_for_field(key)
                        .unwrap_or(GENERAL_SECTION)
                        .to_string(),
                    message: "Required".into(),
                }
            })
            .collect(),
    }
}

fn general_error(message: String) -> RemoteFieldError {
    RemoteFieldError {
        field_key: GENERAL_FIELD.into(),
        label: "General".into(),
        section: GENERAL_SECTION.into(),
        message,
    }
}

/// Step owning the first failing field, used by "make changes" to send the
/// user back to the right place.
pub fn first_failing_step(errors: &[RemoteFieldError], flow: &FlowDescriptor) -> Option<usize> {
    errors
        .iter()
        .find_map(|error| flow.step_owning_field(&error.field_key))
}

/// Groups normalized errors by section, preserving first-seen section order.
pub fn group_by_section(errors: &[RemoteFieldError]) -> Vec<(String, Vec<RemoteFieldError>)> {
    let mut grouped: Vec<(String, Vec<RemoteFieldError>)> = Vec::new();
    for error in errors {
        match grouped.iter_mut().find(|(section, _)| *section == error.section) {
            Some((_, bucket)) => bucket.push(error.clone()),
            None => grouped.push((error.section.clone(), vec![error.clone()])),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_field_map_shape() {
        let body = RemoteErrorBody::decode(r#"{ "errors": { "BusinessAddress": ["Required"] } }"#);
        let RemoteErrorBody::FieldMap(fields) = body else {
            panic!("expected field map");
        };
        assert_eq!(fields.get("BusinessAddress"), Some(&vec!["Required".to_string()]));
    }

    #[test]
    fn decodes_message_list_shape() {
        let body = RemoteErrorBody::decode(r#"{ "errors": ["Too many requests", "Slow down"] }"#);
        assert_eq!(
            body,
            RemoteErrorBody::MessageList(vec!["Too many requests".into(), "Slow down".into()])
        );
    }

    #[test]
    fn decodes_single_message_shapes() {
        assert_eq!(
            RemoteErrorBody::decode(r#"{ "message": "Duplicate customer" }"#),
            RemoteErrorBody::Message("Duplicate customer".into())
        );
        assert_eq!(
            RemoteErrorBody::decode(r#""Service unavailable""#),
            RemoteErrorBody::Message("Service unavailable".into())
        );
    }

    #[test]
    fn decodes_empty_shapes() {
        assert_eq!(RemoteErrorBody::decode("{}"), RemoteErrorBody::Empty);
        assert_eq!(RemoteErrorBody::decode("   "), RemoteErrorBody::Empty);
    }

    #[test]
    fn unparseable_body_degrades_to_generic_message() {
        let body = RemoteErrorBody::decode("<html>Bad gateway</html>");
        assert!(matches!(body, RemoteErrorBody::Message(_)));
    }

    #[test]
    fn known_typos_are_corrected() {
        assert_eq!(correct_field_name("BussinessAddress"), "BusinessAddress");
        assert_eq!(correct_field_name("PhoneNumer"), "PhoneNumber");
        assert_eq!(correct_field_name("BusinessAddress"), "BusinessAddress");
    }
}

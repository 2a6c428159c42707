use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Supported data kinds for flow fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Date,
    Choice(Vec<&'static str>),
    Attachment {
        max_len: u64,
        allowed_types: Vec<&'static str>,
    },
}

/// Reference to attachment bytes held out of band in the blob store.
///
/// The draft carries only this handle; the encoded transport form is produced
/// at the submission boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    /// Hex-encoded SHA-256 digest of the content.
    pub digest: String,
    pub file_name: String,
    pub content_type: String,
    pub len: u64,
}

/// A single collected field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Choice(String),
    Attachment(AttachmentRef),
}

impl FieldValue {
    /// Human-readable rendering used by summaries and prompts.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(value) | FieldValue::Choice(value) => value.clone(),
            FieldValue::Number(value) => {
                if value.fract().abs() < f64::EPSILON {
                    format!("{:.0}", value)
                } else {
                    format!("{:.2}", value)
                }
            }
            FieldValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            FieldValue::Attachment(att) => {
                format!("{} ({}, {} bytes)", att.file_name, att.content_type, att.len)
            }
        }
    }

    /// True when the value carries no usable content.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(value) | FieldValue::Choice(value) => value.trim().is_empty(),
            _ => false,
        }
    }
}

/// Declarative description of a single flow field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
}

impl FieldDescriptor {
    pub fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
            help: None,
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

/// Converts a snake_case field key into the PascalCase name the gateway uses.
pub fn to_pascal_case(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Converts a PascalCase gateway field name into the local snake_case key.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (idx, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Derives a display label by inserting spaces before capital letters.
pub fn humanize_field_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (idx, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() && idx > 0 {
            out.push(' ');
        }
        if ch == '_' {
            out.push(' ');
            continue;
        }
        out.push(ch);
    }
    out
}

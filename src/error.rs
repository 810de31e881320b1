use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Field-keyed validation messages as the backend reports them.
///
/// The backend answers a rejected form either with the field map at the top
/// level (`{"password": ["Too short"]}`) or wrapped as
/// `{"message": "...", "errors": {...}}`. Both shapes land here; top-level
/// entries win over wrapped ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub message: Option<String>,
    pub fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn from_body(body: &Value) -> Self {
        let mut errors = FieldErrors::default();
        let Some(map) = body.as_object() else {
            if let Some(text) = body.as_str() {
                errors.message = Some(text.to_string());
            }
            return errors;
        };

        for (key, value) in map {
            match key.as_str() {
                "message" | "detail" => {
                    if errors.message.is_none() {
                        errors.message = value.as_str().map(str::to_string);
                    }
                }
                "errors" => {}
                _ => {
                    if let Some(messages) = messages_of(value) {
                        errors.fields.insert(key.clone(), messages);
                    }
                }
            }
        }

        if let Some(nested) = map.get("errors") {
            match nested {
                Value::Object(inner) => {
                    for (key, value) in inner {
                        if let Some(messages) = messages_of(value) {
                            errors.fields.entry(key.clone()).or_insert(messages);
                        }
                    }
                }
                other => {
                    if let Some(messages) = messages_of(other) {
                        errors
                            .fields
                            .entry("non_field_errors".to_string())
                            .or_insert(messages);
                    }
                }
            }
        }

        errors
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// `"Password: a, b"` for a named field, the bare joined list for
    /// `non_field_errors`.
    pub fn describe(&self, field: &str) -> Option<String> {
        let messages = self.get(field)?;
        if messages.is_empty() {
            return None;
        }
        let joined = messages.join(", ");
        if field == "non_field_errors" {
            Some(joined)
        } else {
            Some(format!("{}: {}", field_label(field), joined))
        }
    }

    /// First matching field in `order`, then the body message, then `fallback`.
    pub fn summarize(&self, order: &[&str], fallback: &str) -> String {
        order
            .iter()
            .find_map(|field| self.describe(field))
            .or_else(|| self.message.clone().filter(|m| !m.trim().is_empty()))
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .keys()
            .filter_map(|field| self.describe(field))
            .collect();
        if !parts.is_empty() {
            return write!(f, "{}", parts.join("; "));
        }
        match &self.message {
            Some(message) => write!(f, "{message}"),
            None => write!(f, "request rejected"),
        }
    }
}

fn messages_of(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(vec![s.clone()]),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        _ => None,
    }
}

/// `parent_contact_primary` -> `Parent contact primary`.
pub fn field_label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not authorized; session cleared")]
    Unauthorized,
    #[error("{0}")]
    Validation(FieldErrors),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

pub type ApiResult<T> = Result<T, ApiError>;

//! Contact form types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Submitted contact form. Every field is required but parsed leniently so a
/// missing or oddly typed field produces the form error rather than a
/// deserializer error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub message: Option<Value>,
}

/// A contact form with every field present and truthy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Returns `None` if any field is missing or falsy (`""`, `0`, `false`,
    /// `null`). Whitespace and non-string values count as filled in.
    pub fn into_message(self) -> Option<ContactMessage> {
        fn required(field: Option<Value>) -> Option<String> {
            match field? {
                Value::Null | Value::Bool(false) => None,
                Value::String(value) if value.is_empty() => None,
                Value::Number(n) if n.as_f64() == Some(0.0) => None,
                Value::String(value) => Some(value),
                other => Some(other.to_string()),
            }
        }

        Some(ContactMessage {
            name: required(self.name)?,
            email: required(self.email)?,
            message: required(self.message)?,
        })
    }
}

/// Uniform response body for the contact backend
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

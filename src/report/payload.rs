//! Permissive accessors over untyped GitLab JSON.
//!
//! GitLab payloads drift between versions and editions: fields go missing,
//! counts arrive as strings, timestamps change precision. Everything here
//! degrades to a typed default instead of failing, so tolerance for schema
//! variance stays at the normalisation boundary.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::gitlab::error::FetchError;

use super::model::Author;

/// Top-level shape a payload must have to be interpreted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
}

impl PayloadShape {
    const fn describe(self) -> &'static str {
        match self {
            Self::Object => "a JSON object",
            Self::Array => "a JSON array",
        }
    }

    const fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Object, Value::Object(_)) | (Self::Array, Value::Array(_))
        )
    }
}

/// Decodes a raw payload and checks its top-level shape.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] when the bytes are not JSON or the
/// top-level value has the wrong shape.
pub fn parse_payload(label: &str, raw: &[u8], shape: PayloadShape) -> Result<Value, FetchError> {
    let value: Value = serde_json::from_slice(raw).map_err(|error| FetchError::Parse {
        message: format!("{label} response: {error}"),
    })?;
    if shape.matches(&value) {
        Ok(value)
    } else {
        Err(FetchError::Parse {
            message: format!("{label} response: expected {}", shape.describe()),
        })
    }
}

/// Read-only view over a JSON object that never fails.
///
/// A view over a non-object value behaves like an empty object.
#[derive(Debug, Clone, Copy)]
pub struct LooseObject<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> LooseObject<'a> {
    /// Wraps any JSON value.
    #[must_use]
    pub const fn new(value: &'a Value) -> Self {
        match value {
            Value::Object(fields) => Self {
                fields: Some(fields),
            },
            _ => Self { fields: None },
        }
    }

    /// True when the underlying value is an object.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        self.fields.is_some()
    }

    fn field(&self, key: &str) -> Option<&'a Value> {
        self.fields.and_then(|fields| fields.get(key))
    }

    /// String field, or empty when missing or not a string.
    #[must_use]
    pub fn string(&self, key: &str) -> String {
        self.optional_string(key).unwrap_or_default()
    }

    /// String field when present and non-empty.
    #[must_use]
    pub fn optional_string(&self, key: &str) -> Option<String> {
        self.field(key)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(ToOwned::to_owned)
    }

    /// Boolean field, `false` when missing or not a boolean.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.field(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Unsigned integer accepting JSON numbers and numeric strings
    /// (`"changes_count": "12"`); zero otherwise.
    #[must_use]
    pub fn count(&self, key: &str) -> u64 {
        self.optional_count(key).unwrap_or(0)
    }

    /// Unsigned integer when present and well-formed.
    #[must_use]
    pub fn optional_count(&self, key: &str) -> Option<u64> {
        match self.field(key)? {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse::<u64>().ok(),
            _ => None,
        }
    }

    /// Signed integer accepting JSON numbers and numeric strings; zero
    /// otherwise.
    #[must_use]
    pub fn signed(&self, key: &str) -> i64 {
        match self.field(key) {
            Some(Value::Number(number)) => number.as_i64().unwrap_or(0),
            Some(Value::String(text)) => text.trim().parse::<i64>().unwrap_or(0),
            _ => 0,
        }
    }

    /// RFC 3339 timestamp, or the Unix epoch when missing or malformed.
    #[must_use]
    pub fn timestamp(&self, key: &str) -> DateTime<Utc> {
        let Some(raw) = self.field(key).and_then(Value::as_str) else {
            return DateTime::<Utc>::UNIX_EPOCH;
        };
        DateTime::parse_from_rfc3339(raw).map_or_else(
            |error| {
                tracing::debug!(key, raw, %error, "defaulting unparseable timestamp");
                DateTime::<Utc>::UNIX_EPOCH
            },
            |parsed| parsed.with_timezone(&Utc),
        )
    }

    /// Nested object view; empty when missing or not an object.
    #[must_use]
    pub fn object(&self, key: &str) -> Self {
        self.field(key).map_or(Self { fields: None }, Self::new)
    }

    /// Array elements; empty when missing or not an array.
    #[must_use]
    pub fn list(&self, key: &str) -> &'a [Value] {
        self.field(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Flattens a user sub-object into an [`Author`].
    #[must_use]
    pub fn author(&self, key: &str) -> Author {
        let user = self.object(key);
        Author::new(user.string("name"), user.string("username"))
    }
}

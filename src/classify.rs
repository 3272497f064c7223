//! Shape detection for raw batch payloads.
//!
//! A payload is one of:
//! - an object with a `records` array (any casing): audit log records
//! - a bare array: resource events
//! - anything else: an unknown message type, skipped without error
//!
//! Malformed JSON is a hard failure while valid JSON of an unknown shape is
//! only skipped, since the stream may carry unrelated message types.

use serde_json::Value;

use crate::decode::lookup;
use crate::error::{DecodeError, JsonKind};

/// The detected shape of a parsed payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    /// Audit log envelope; holds the `records` elements.
    AuditLog(&'a [Value]),
    /// Bare array of resource events.
    ResourceEvents(&'a [Value]),
    /// Valid JSON that is neither known shape.
    Unknown(JsonKind),
}

/// Parses raw payload bytes as JSON.
///
/// # Errors
///
/// Returns [`MalformedJson`](crate::DecodeErrorKind::MalformedJson) for invalid
/// JSON or invalid UTF-8.
pub fn parse_payload(payload: &[u8]) -> Result<Value, DecodeError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Detects the shape of a parsed payload.
///
/// An object counts as an audit log only when its `records` member is an
/// array; any other `records` value leaves it an unknown object.
///
/// # Examples
///
/// ```
/// use vault_notify::{classify, JsonKind, PayloadShape};
/// use serde_json::json;
///
/// let envelope = json!({"Records": [{}, {}]});
/// assert!(matches!(classify(&envelope), PayloadShape::AuditLog(r) if r.len() == 2));
///
/// let events = json!([{}]);
/// assert!(matches!(classify(&events), PayloadShape::ResourceEvents(_)));
///
/// let other = json!({"hello": "world"});
/// assert_eq!(classify(&other), PayloadShape::Unknown(JsonKind::Object));
/// ```
pub fn classify(value: &Value) -> PayloadShape<'_> {
    match value {
        Value::Object(obj) => match lookup(obj, "records") {
            Some(Value::Array(records)) => PayloadShape::AuditLog(records.as_slice()),
            _ => PayloadShape::Unknown(JsonKind::Object),
        },
        Value::Array(events) => PayloadShape::ResourceEvents(events.as_slice()),
        other => PayloadShape::Unknown(JsonKind::of(other)),
    }
}

//! Decoding of JSON documents that arrive double-encoded as JSON strings.

use serde_json::Value;

use crate::error::{DecodeError, JsonKind};

/// Decodes a JSON string whose content is itself JSON text.
///
/// The outer value must be a string; its content is parsed and handed to
/// `decode`, whose errors are returned unchanged.
///
/// # Errors
///
/// - [`ShapeMismatch`](crate::DecodeErrorKind::ShapeMismatch) if `value` is not a string
/// - [`MalformedJson`](crate::DecodeErrorKind::MalformedJson) if the string is not valid JSON
/// - whatever `decode` returns for the inner document
///
/// # Examples
///
/// ```
/// use vault_notify::{decode_nested, decode_event_data};
/// use serde_json::json;
///
/// let raw = json!(r#"{"VaultName":"kv1","ObjectType":"Secret","ObjectName":"x"}"#);
/// let data = decode_nested(&raw, decode_event_data).unwrap();
/// assert_eq!(data.vault_name, "kv1");
/// ```
pub fn decode_nested<T>(
    value: &Value,
    decode: impl FnOnce(&Value) -> Result<T, DecodeError>,
) -> Result<T, DecodeError> {
    let text = value
        .as_str()
        .ok_or_else(|| DecodeError::shape("JSON-encoded string", JsonKind::of(value)))?;

    let inner: Value = serde_json::from_str(text)?;
    decode(&inner)
}

//! Field-level decoding helpers shared by the record decoders.
//!
//! Every helper reports failures as [`DecodeError`] with the field path of
//! the value it was asked to read. Member lookup prefers an exact name match
//! and falls back to an ASCII case-insensitive one; `null` counts as absent.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use url::Url;
use uuid::Uuid;

use crate::error::{DecodeError, DecodeErrorKind, JsonKind};

pub(crate) type Object = Map<String, Value>;

/// Views `value` as a JSON object.
pub(crate) fn object(value: &Value) -> Result<&Object, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::shape("object", JsonKind::of(value)))
}

/// Looks up a member by name, exact match first.
pub(crate) fn lookup<'a>(obj: &'a Object, name: &str) -> Option<&'a Value> {
    let found = obj.get(name).or_else(|| {
        obj.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    });

    found.filter(|value| !value.is_null())
}

/// Decodes an optional member, attaching `name` to any error.
pub(crate) fn optional<'a, T>(
    obj: &'a Object,
    name: &str,
    decode: impl FnOnce(&'a Value) -> Result<T, DecodeError>,
) -> Result<Option<T>, DecodeError> {
    match lookup(obj, name) {
        Some(value) => decode(value).map(Some).map_err(|e| e.at(name)),
        None => Ok(None),
    }
}

/// Decodes a required member, failing with `MissingField` when absent.
pub(crate) fn required<'a, T>(
    obj: &'a Object,
    name: &str,
    decode: impl FnOnce(&'a Value) -> Result<T, DecodeError>,
) -> Result<T, DecodeError> {
    optional(obj, name, decode)?.ok_or_else(|| DecodeError::missing(name))
}

pub(crate) fn string(value: &Value) -> Result<String, DecodeError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DecodeError::shape("string", JsonKind::of(value)))
}

pub(crate) fn boolean(value: &Value) -> Result<bool, DecodeError> {
    value
        .as_bool()
        .ok_or_else(|| DecodeError::shape("boolean", JsonKind::of(value)))
}

pub(crate) fn unsigned(value: &Value) -> Result<u64, DecodeError> {
    match value {
        Value::Number(n) => n.as_u64().ok_or_else(|| {
            DecodeError::new(
                DecodeErrorKind::InvalidValue,
                format!("expected a non-negative integer, found {}", n),
            )
        }),
        Value::String(text) => text.trim().parse::<u64>().map_err(|e| {
            DecodeError::new(
                DecodeErrorKind::InvalidValue,
                format!("expected a non-negative integer, found {:?}", text),
            )
            .with_source(e)
        }),
        other => Err(DecodeError::shape("number", JsonKind::of(other))),
    }
}

pub(crate) fn status_code(value: &Value) -> Result<u16, DecodeError> {
    let n = unsigned(value)?;
    u16::try_from(n).map_err(|e| {
        DecodeError::new(
            DecodeErrorKind::InvalidValue,
            format!("status code {} is out of range", n),
        )
        .with_source(e)
    })
}

pub(crate) fn uuid(value: &Value) -> Result<Uuid, DecodeError> {
    let text = value
        .as_str()
        .ok_or_else(|| DecodeError::shape("string", JsonKind::of(value)))?;
    Uuid::parse_str(text).map_err(|e| {
        DecodeError::new(
            DecodeErrorKind::InvalidValue,
            format!("`{}` is not a valid UUID", text),
        )
        .with_source(e)
    })
}

pub(crate) fn uri(value: &Value) -> Result<Url, DecodeError> {
    let text = value
        .as_str()
        .ok_or_else(|| DecodeError::shape("string", JsonKind::of(value)))?;
    Url::parse(text).map_err(|e| {
        DecodeError::new(
            DecodeErrorKind::InvalidValue,
            format!("`{}` is not a valid URI", text),
        )
        .with_source(e)
    })
}

/// Decodes an RFC 3339 timestamp string.
pub(crate) fn timestamp(value: &Value) -> Result<DateTime<Utc>, DecodeError> {
    let text = value
        .as_str()
        .ok_or_else(|| DecodeError::shape("string", JsonKind::of(value)))?;
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            DecodeError::new(
                DecodeErrorKind::InvalidValue,
                format!("`{}` is not an RFC 3339 timestamp", text),
            )
            .with_source(e)
        })
}

/// Decodes a timestamp given either as seconds since the Unix epoch or as
/// an RFC 3339 string.
pub(crate) fn epoch_or_timestamp(value: &Value) -> Result<DateTime<Utc>, DecodeError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .ok_or_else(|| {
                DecodeError::new(
                    DecodeErrorKind::InvalidValue,
                    format!("{} is not a valid epoch seconds value", n),
                )
            }),
        Value::String(_) => timestamp(value),
        other => Err(DecodeError::shape("number or string", JsonKind::of(other))),
    }
}

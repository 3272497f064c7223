//! Resource lifecycle event schema and decoder.

use chrono::{DateTime, Utc};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::decode::{self, object, optional, required};
use crate::error::DecodeError;
use crate::nested::decode_nested;

/// A lifecycle event for a vault object (new version, near expiry, expired).
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEvent {
    /// Event identifier.
    pub id: Uuid,
    /// Resource ID of the vault that raised the event.
    pub topic: String,
    /// Name of the object the event is about.
    pub subject: String,
    /// Event type, e.g. `Microsoft.KeyVault.SecretNewVersionCreated`.
    pub event_type: String,
    /// Details of the object.
    pub data: ResourceEventData,
    /// When the event was raised.
    pub event_time: DateTime<Utc>,
}

/// Object details carried by a [`ResourceEvent`].
///
/// `nbf` and `exp` are independent; an absent bound means "no bound".
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEventData {
    /// URI of the object.
    pub id: Option<Url>,
    /// Name of the vault holding the object.
    pub vault_name: String,
    /// `Key`, `Secret` or `Certificate`.
    pub object_type: String,
    /// Name of the object.
    pub object_name: String,
    /// Object version.
    pub version: Option<String>,
    /// Not valid before.
    pub nbf: Option<DateTime<Utc>>,
    /// Expires at.
    pub exp: Option<DateTime<Utc>>,
}

/// Decodes a single resource event.
///
/// The `data` member arrives as a JSON string holding the
/// [`ResourceEventData`] document and is decoded with [`decode_nested`].
///
/// # Errors
///
/// Returns a [`DecodeError`] naming the failing field, e.g. `MissingField`
/// at `eventType` or `ShapeMismatch` at `data` when it is not a string.
pub fn decode_resource_event(value: &Value) -> Result<ResourceEvent, DecodeError> {
    let obj = object(value)?;

    Ok(ResourceEvent {
        id: required(obj, "id", decode::uuid)?,
        topic: optional(obj, "topic", decode::string)?.unwrap_or_default(),
        subject: optional(obj, "subject", decode::string)?.unwrap_or_default(),
        event_type: required(obj, "eventType", decode::string)?,
        data: required(obj, "data", |data| decode_nested(data, decode_event_data))?,
        event_time: required(obj, "eventTime", decode::timestamp)?,
    })
}

/// Decodes the inner event data document.
///
/// `NBF` and `EXP` accept seconds since the Unix epoch or RFC 3339 text.
pub fn decode_event_data(value: &Value) -> Result<ResourceEventData, DecodeError> {
    let obj = object(value)?;

    Ok(ResourceEventData {
        id: optional(obj, "Id", decode::uri)?,
        vault_name: required(obj, "VaultName", decode::string)?,
        object_type: required(obj, "ObjectType", decode::string)?,
        object_name: required(obj, "ObjectName", decode::string)?,
        version: optional(obj, "Version", decode::string)?,
        nbf: optional(obj, "NBF", decode::epoch_or_timestamp)?,
        exp: optional(obj, "EXP", decode::epoch_or_timestamp)?,
    })
}

//! Audit log record schema and decoder.

use chrono::{DateTime, Utc};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::claims::{decode_claims, find_claim, Claim};
use crate::decode::{self, object, optional, required};
use crate::error::DecodeError;

/// One audit log entry describing an operation against the vault.
///
/// `identity` is always a list once decoded; a record without identity
/// information simply has no claims.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    /// When the operation happened.
    pub time: DateTime<Utc>,
    /// Log category (`AuditEvent` for vault logs).
    pub category: String,
    /// Operation name, e.g. `SecretGet`.
    pub operation_name: String,
    /// Result of the REST request, e.g. `Success`.
    pub result_type: String,
    /// Additional description of the result.
    pub result_description: Option<String>,
    /// Client-supplied correlation identifier.
    pub correlation_id: Option<Uuid>,
    /// IP address of the caller.
    pub caller_ip_address: String,
    /// Claims from the token presented with the request, in source order.
    pub identity: Vec<Claim>,
    /// Operation-specific properties.
    pub properties: AuditProperties,
    /// Resource manager ID of the vault.
    pub resource_id: String,
    /// REST API version requested.
    pub operation_version: String,
    /// HTTP status text.
    pub result_signature: String,
    /// Time spent serving the request, in milliseconds.
    pub duration_ms: u64,
}

impl AuditRecord {
    /// Returns the value of the first identity claim of the given type.
    pub fn claim(&self, claim_type: &str) -> Option<&str> {
        find_claim(&self.identity, claim_type)
    }
}

/// Operation-specific audit properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditProperties {
    /// URI of the object returned by the request (key, secret or certificate).
    pub id: Option<Url>,
    /// User agent reported by the client.
    pub client_info: Option<String>,
    /// HTTP status code returned.
    pub http_status_code: Option<u16>,
    /// Exact request URI.
    pub request_uri: Option<Url>,
    /// Whether an access policy allowed the operation.
    pub is_access_policy_match: bool,
    /// Resource properties, passed through uninterpreted.
    pub resource_properties: Option<Value>,
}

/// Decodes a single audit record.
///
/// # Errors
///
/// Returns a [`DecodeError`] naming the failing field: `MissingField` for
/// an absent `time`, `operationName` or `resultType`, `ShapeMismatch` for a
/// value of the wrong JSON kind, `InvalidValue` for unparseable timestamps,
/// URIs or UUIDs.
///
/// # Examples
///
/// ```
/// use vault_notify::decode_audit_record;
/// use serde_json::json;
///
/// let record = decode_audit_record(&json!({
///     "time": "2021-01-05T14:00:00Z",
///     "operationName": "SecretGet",
///     "resultType": "Success",
///     "identity": {"claim": {"upn": "alice@contoso.com"}}
/// }))
/// .unwrap();
///
/// assert_eq!(record.operation_name, "SecretGet");
/// assert_eq!(record.claim("upn"), Some("alice@contoso.com"));
/// ```
pub fn decode_audit_record(value: &Value) -> Result<AuditRecord, DecodeError> {
    let obj = object(value)?;

    Ok(AuditRecord {
        time: required(obj, "time", decode::timestamp)?,
        category: optional(obj, "category", decode::string)?.unwrap_or_default(),
        operation_name: required(obj, "operationName", decode::string)?,
        result_type: required(obj, "resultType", decode::string)?,
        result_description: optional(obj, "resultDescription", decode::string)?,
        correlation_id: optional(obj, "correlationId", decode::uuid)?,
        caller_ip_address: optional(obj, "callerIpAddress", decode::string)?.unwrap_or_default(),
        identity: optional(obj, "identity", decode_identity)?.unwrap_or_default(),
        properties: optional(obj, "properties", decode_properties)?.unwrap_or_default(),
        resource_id: optional(obj, "resourceId", decode::string)?.unwrap_or_default(),
        operation_version: optional(obj, "operationVersion", decode::string)?.unwrap_or_default(),
        result_signature: optional(obj, "resultSignature", decode::string)?.unwrap_or_default(),
        duration_ms: optional(obj, "durationMs", decode::unsigned)?.unwrap_or_default(),
    })
}

fn decode_identity(value: &Value) -> Result<Vec<Claim>, DecodeError> {
    let obj = object(value)?;
    Ok(optional(obj, "claim", decode_claims)?.unwrap_or_default())
}

fn decode_properties(value: &Value) -> Result<AuditProperties, DecodeError> {
    let obj = object(value)?;

    Ok(AuditProperties {
        id: optional(obj, "id", decode::uri)?,
        client_info: optional(obj, "clientInfo", decode::string)?,
        http_status_code: optional(obj, "httpStatusCode", decode::status_code)?,
        request_uri: optional(obj, "requestUri", decode::uri)?,
        is_access_policy_match: optional(obj, "isAccessPolicyMatch", decode::boolean)?
            .unwrap_or_default(),
        resource_properties: decode::lookup(obj, "properties").cloned(),
    })
}

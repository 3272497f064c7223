//! Decoding of identity claim bags.
//!
//! The audit log carries the caller's token claims as a flat JSON object
//! keyed by claim-type URI. Decoding is one-way: nothing in this crate ever
//! writes a claim list back into that shape.

use serde_json::Value;

use crate::error::{DecodeError, DecodeErrorKind, JsonKind};

/// Claim type carrying the caller's user principal name.
pub const UPN_CLAIM: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/upn";

/// Claim type carrying the caller's directory object identifier.
pub const OBJECT_ID_CLAIM: &str = "http://schemas.microsoft.com/identity/claims/objectidentifier";

/// A single `(type, value)` assertion taken from an identity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Claim type, usually a URI.
    pub claim_type: String,
    /// Claim value, coerced to a string.
    pub value: String,
}

impl Claim {
    /// Creates a new claim.
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// Decodes a claims object into claims, in key order.
///
/// String values are taken as-is; numbers and booleans are rendered to
/// their JSON text. `null`, arrays and objects fail with
/// [`DecodeErrorKind::ValueCoercion`] at the offending key.
///
/// # Errors
///
/// Returns [`DecodeErrorKind::ShapeMismatch`] if `value` is not an object.
///
/// # Examples
///
/// ```
/// use vault_notify::{decode_claims, DecodeErrorKind};
/// use serde_json::json;
///
/// let claims = decode_claims(&json!({"upn": "alice"})).unwrap();
/// assert_eq!(claims.len(), 1);
/// assert_eq!(claims[0].claim_type, "upn");
/// assert_eq!(claims[0].value, "alice");
///
/// let err = decode_claims(&json!(["upn", "alice"])).unwrap_err();
/// assert_eq!(err.kind(), DecodeErrorKind::ShapeMismatch);
/// ```
pub fn decode_claims(value: &Value) -> Result<Vec<Claim>, DecodeError> {
    let members = value
        .as_object()
        .ok_or_else(|| DecodeError::shape("claims object", JsonKind::of(value)))?;

    members
        .iter()
        .map(|(claim_type, claim_value)| {
            coerce(claim_value)
                .map(|value| Claim::new(claim_type.as_str(), value))
                .map_err(|e| e.at(claim_type))
        })
        .collect()
}

/// Returns the value of the first claim with exactly this type.
pub fn find_claim<'a>(claims: &'a [Claim], claim_type: &str) -> Option<&'a str> {
    claims
        .iter()
        .find(|claim| claim.claim_type == claim_type)
        .map(|claim| claim.value.as_str())
}

fn coerce(value: &Value) -> Result<String, DecodeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(DecodeError::new(
            DecodeErrorKind::ValueCoercion,
            format!("a {} claim value cannot be read as a string", JsonKind::of(other)),
        )),
    }
}

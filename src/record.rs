//! Typed vault activity records.
//!
//! This module provides:
//! - `AuditRecord`: one entry of the vault's audit log
//! - `ResourceEvent`: one lifecycle event for a vault object
//!
//! Decoders are plain functions over `serde_json::Value`. They ignore
//! unknown members, treat missing optional members as absent, and report
//! failures with the dotted path of the field that failed.

mod audit;
mod event;

pub use audit::{decode_audit_record, AuditProperties, AuditRecord};
pub use event::{decode_event_data, decode_resource_event, ResourceEvent, ResourceEventData};

//! Key vault activity notifications from event-stream batches.
//!
//! This crate decodes batches of raw event payloads describing vault
//! activity and turns qualifying records into chat notifications:
//! - **Classification**: each payload is an audit log envelope
//!   (`{"records": [...]}`), a bare array of resource events, or an unknown
//!   shape that is skipped
//! - **Decoding**: records are decoded into typed values, including the
//!   identity claims bag and the double-encoded event `data` string
//! - **Partial failure**: every item is attempted and failures are
//!   collected; a batch with any failure dispatches nothing
//! - **Formatting**: audit records matching a [`NotificationPolicy`] and all
//!   resource events are rendered as [`NotificationMessage`]s
//!
//! # Core Types
//!
//! - [`BatchProcessor`]: decodes a batch into a [`BatchOutcome`]
//! - [`NotificationFormatter`]: filters and renders decoded records
//! - [`Notifier`]: runs a batch end to end into a [`NotificationSink`]
//! - [`BatchError`]: the single error a failed batch surfaces
//!
//! # Examples
//!
//! ```
//! use vault_notify::{Notifier, NotifierConfig, VecSink};
//!
//! let payload = r#"{"records": [{
//!     "time": "2021-01-05T14:22:31Z",
//!     "operationName": "SecretGet",
//!     "resultType": "Success",
//!     "callerIpAddress": "203.0.113.7",
//!     "identity": {"claim": {
//!         "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/upn": "alice@contoso.com"
//!     }},
//!     "properties": {"id": "https://kv-prod.vault.azure.net/secrets/db-password/0123"}
//! }]}"#;
//!
//! let notifier = Notifier::new(NotifierConfig::default());
//! let sink = VecSink::new();
//! notifier.run("batch-1", &[payload], &sink).expect("batch decodes");
//!
//! let messages = sink.into_vec();
//! let body = messages[0].body().unwrap();
//! assert_eq!(body.get("Who"), Some("alice@contoso.com[N/A]"));
//! assert_eq!(body.get("Name"), Some("db-password"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod claims;
mod classify;
mod config;
mod decode;
mod error;
mod format;
mod logging;
mod message;
mod nested;
mod notifier;
mod policy;
pub mod record;
mod sink;

pub use batch::{process_batch, BatchOutcome, BatchProcessor, DecodedBatch, SkippedItem};
pub use claims::{decode_claims, find_claim, Claim, OBJECT_ID_CLAIM, UPN_CLAIM};
pub use classify::{classify, parse_payload, PayloadShape};
pub use config::{NotifierConfig, DEFAULT_PORTAL_URL, DEFAULT_VAULT_HOST_SUFFIX};
pub use error::{BatchError, DecodeError, DecodeErrorKind, DecodeFailure, JsonKind};
pub use format::{NotificationFormatter, NOT_AVAILABLE};
pub use logging::BatchLog;
pub use message::{Field, Link, NotificationMessage, Section};
pub use nested::decode_nested;
pub use notifier::{DispatchReport, Notifier};
pub use policy::{NotificationPolicy, DEFAULT_OPERATION, DEFAULT_RESULT};
pub use record::{
    decode_audit_record, decode_event_data, decode_resource_event, AuditProperties, AuditRecord,
    ResourceEvent, ResourceEventData,
};
pub use sink::{NotificationSink, SinkError, SinkErrorKind, TracingSink, VecSink};

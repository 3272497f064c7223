//! Batch decoding with per-item failure collection.
//!
//! Every payload in a batch is attempted. Failures are accumulated in a
//! [`BatchOutcome`] instead of aborting the loop, and only once all items
//! have been seen does [`BatchOutcome::into_result`] decide whether the batch
//! as a whole succeeded.

use serde_json::Value;

use crate::classify::{classify, parse_payload, PayloadShape};
use crate::error::{BatchError, DecodeError, DecodeFailure, JsonKind};
use crate::logging::BatchLog;
use crate::record::{decode_audit_record, decode_resource_event, AuditRecord, ResourceEvent};

/// A payload that was valid JSON of an unrecognized shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedItem {
    /// Index of the payload within the batch.
    pub item: usize,
    /// JSON kind of the payload's top-level value.
    pub kind: JsonKind,
}

/// Records decoded from a batch, in decode order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DecodedBatch {
    /// Audit log records, in payload then record order.
    pub audit_records: Vec<AuditRecord>,
    /// Resource events, in payload then element order.
    pub resource_events: Vec<ResourceEvent>,
    /// Payloads skipped because their shape is not handled.
    pub skipped: Vec<SkippedItem>,
}

/// Accumulated result of decoding a batch.
///
/// Holds both the records that decoded and the failures that did not; the
/// batch-level decision is made by [`into_result`](Self::into_result).
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successfully decoded records.
    pub decoded: DecodedBatch,
    /// Per-item failures, in batch order.
    pub failures: Vec<DecodeFailure>,
}

impl BatchOutcome {
    /// Returns `true` if no item failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Resolves the outcome into the decoded records or a batch error.
    ///
    /// Any failure fails the whole batch, discarding the records that did
    /// decode. One failure is returned as [`BatchError::Single`], several as
    /// [`BatchError::Aggregate`].
    pub fn into_result(self) -> Result<DecodedBatch, BatchError> {
        match BatchError::from_failures(self.failures) {
            Some(err) => Err(err),
            None => Ok(self.decoded),
        }
    }
}

/// Decodes batches of raw payloads.
///
/// # Examples
///
/// ```
/// use vault_notify::BatchProcessor;
///
/// let payloads = [
///     r#"{"records":[{"time":"2021-01-05T14:00:00Z","operationName":"SecretGet","resultType":"Success"}]}"#,
///     r#""heartbeat""#,
/// ];
///
/// let outcome = BatchProcessor::new("batch-1").process(&payloads);
/// assert!(outcome.is_clean());
///
/// let decoded = outcome.into_result().unwrap();
/// assert_eq!(decoded.audit_records.len(), 1);
/// assert_eq!(decoded.skipped.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BatchProcessor<'a> {
    log: BatchLog<'a>,
}

impl<'a> BatchProcessor<'a> {
    /// Creates a processor for the given batch.
    pub fn new(batch_id: &'a str) -> Self {
        Self {
            log: BatchLog::new(batch_id),
        }
    }

    /// Decodes every payload, in order, never stopping at a failure.
    pub fn process<P: AsRef<[u8]>>(&self, payloads: &[P]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for (item, payload) in payloads.iter().enumerate() {
            self.process_item(item, payload.as_ref(), &mut outcome);
        }

        self.log.info(format_args!(
            "Decoded {} audit record(s) and {} event(s) from {} item(s); {} skipped, {} failed",
            outcome.decoded.audit_records.len(),
            outcome.decoded.resource_events.len(),
            payloads.len(),
            outcome.decoded.skipped.len(),
            outcome.failures.len(),
        ));

        outcome
    }

    /// Classifies one payload and folds its records or failures into `outcome`.
    pub fn process_item(&self, item: usize, payload: &[u8], outcome: &mut BatchOutcome) {
        self.log
            .info(format_args!("Processing item {} ({} bytes)", item, payload.len()));
        self.log.debug(format_args!(
            "Item {} body: {}",
            item,
            String::from_utf8_lossy(payload)
        ));

        let value = match parse_payload(payload) {
            Ok(value) => value,
            Err(err) => return self.fail(outcome, DecodeFailure::payload(item, err)),
        };

        match classify(&value) {
            PayloadShape::AuditLog(records) => {
                self.log
                    .info(format_args!("Found {} audit record(s)", records.len()));
                let decoded =
                    self.decode_records(item, records, "records", outcome, decode_audit_record);
                outcome.decoded.audit_records.extend(decoded);
            }
            PayloadShape::ResourceEvents(events) => {
                self.log.info(format_args!("Found {} event(s)", events.len()));
                let decoded =
                    self.decode_records(item, events, "", outcome, decode_resource_event);
                outcome.decoded.resource_events.extend(decoded);
            }
            PayloadShape::Unknown(kind) => {
                self.log.warn(format_args!(
                    "Item {} is valid JSON but its {} shape is not handled; skipping",
                    item, kind
                ));
                outcome.decoded.skipped.push(SkippedItem { item, kind });
            }
        }
    }

    fn decode_records<T>(
        &self,
        item: usize,
        elements: &[Value],
        container: &str,
        outcome: &mut BatchOutcome,
        decode: impl Fn(&Value) -> Result<T, DecodeError>,
    ) -> Vec<T> {
        let mut decoded = Vec::with_capacity(elements.len());

        for (index, element) in elements.iter().enumerate() {
            match decode(element) {
                Ok(record) => decoded.push(record),
                Err(err) => {
                    let err = err.at(&format!("{}[{}]", container, index));
                    self.fail(outcome, DecodeFailure::record(item, index, err));
                }
            }
        }

        decoded
    }

    fn fail(&self, outcome: &mut BatchOutcome, failure: DecodeFailure) {
        self.log.error(format_args!("{}", failure));
        outcome.failures.push(failure);
    }
}

/// Decodes a batch of raw payloads.
///
/// Shorthand for `BatchProcessor::new(batch_id).process(payloads)`.
pub fn process_batch<P: AsRef<[u8]>>(batch_id: &str, payloads: &[P]) -> BatchOutcome {
    BatchProcessor::new(batch_id).process(payloads)
}

//! End-to-end batch handling: decode, decide, format, dispatch.

use crate::batch::BatchProcessor;
use crate::config::NotifierConfig;
use crate::error::BatchError;
use crate::format::NotificationFormatter;
use crate::logging::BatchLog;
use crate::sink::NotificationSink;

/// Summary of a successfully processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Audit records decoded.
    pub audit_records: usize,
    /// Resource events decoded.
    pub resource_events: usize,
    /// Payloads skipped as an unknown shape.
    pub skipped: usize,
    /// Notifications accepted by the sink.
    pub delivered: usize,
    /// Notifications the sink refused.
    pub sink_failures: usize,
}

/// Turns batches of raw vault activity payloads into notifications.
///
/// Dispatch is all-or-nothing per batch: every item is decoded first, and
/// if any item failed the batch returns a [`BatchError`] and nothing is
/// sent, including notifications for the items that did decode.
///
/// # Examples
///
/// ```
/// use vault_notify::{Notifier, NotifierConfig, VecSink};
///
/// let notifier = Notifier::new(NotifierConfig::default());
/// let sink = VecSink::new();
///
/// let payload = r#"[{
///     "id": "1d3a9c50-6a3e-4a0e-b0f5-2f8a8d7b1c22",
///     "eventType": "Microsoft.KeyVault.SecretNearExpiry",
///     "data": "{\"VaultName\":\"kv1\",\"ObjectType\":\"Secret\",\"ObjectName\":\"x\",\"EXP\":1700000000}",
///     "eventTime": "2023-11-07T22:13:20Z"
/// }]"#;
///
/// let report = notifier.run("batch-1", &[payload], &sink).unwrap();
/// assert_eq!(report.resource_events, 1);
/// assert_eq!(report.delivered, 1);
/// assert_eq!(sink.len(), 1);
///
/// let err = notifier.run("batch-2", &["{oops", payload], &sink).unwrap_err();
/// assert_eq!(err.failures().len(), 1);
/// assert_eq!(sink.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    formatter: NotificationFormatter,
}

impl Notifier {
    /// Creates a notifier with the given configuration.
    pub fn new(config: NotifierConfig) -> Self {
        Self {
            formatter: NotificationFormatter::new(config),
        }
    }

    /// Returns the formatter used for rendering.
    pub fn formatter(&self) -> &NotificationFormatter {
        &self.formatter
    }

    /// Processes one batch and dispatches its notifications to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError`] if any payload failed to decode, after every
    /// payload has been attempted. No notification is sent in that case.
    pub fn run<P, S>(
        &self,
        batch_id: &str,
        payloads: &[P],
        sink: &S,
    ) -> Result<DispatchReport, BatchError>
    where
        P: AsRef<[u8]>,
        S: NotificationSink + ?Sized,
    {
        let log = BatchLog::new(batch_id);
        let outcome = BatchProcessor::new(batch_id).process(payloads);

        let decoded = outcome.into_result().map_err(|err| {
            log.error(format_args!(
                "Batch rejected with {} failure(s); no notifications sent",
                err.failures().len()
            ));
            err
        })?;

        let mut report = DispatchReport {
            audit_records: decoded.audit_records.len(),
            resource_events: decoded.resource_events.len(),
            skipped: decoded.skipped.len(),
            ..DispatchReport::default()
        };

        for message in self.formatter.format_batch(&decoded) {
            match sink.send(message) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    log.warn(format_args!("Notification not accepted: {}", err));
                    report.sink_failures += 1;
                }
            }
        }

        log.info(format_args!(
            "Dispatched {} notification(s), {} refused",
            report.delivered, report.sink_failures
        ));

        Ok(report)
    }
}

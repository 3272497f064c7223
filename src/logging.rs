use std::fmt;

/// A batch-scoped logging interface.
///
/// `BatchLog` borrows the batch identifier and attaches it as a `batch_id`
/// field to every event, so all records emitted while processing one batch
/// can be correlated.
///
/// Payload bodies may contain identity claims; log them only through
/// [`debug`](Self::debug).
#[derive(Debug, Clone, Copy)]
pub struct BatchLog<'a> {
    batch_id: &'a str,
}

impl<'a> BatchLog<'a> {
    /// Creates a new logger for the given batch.
    pub fn new(batch_id: &'a str) -> Self {
        Self { batch_id }
    }

    /// Returns the batch ID associated with this logger.
    pub fn batch_id(&self) -> &str {
        self.batch_id
    }

    /// Logs an info-level message with batch ID.
    ///
    /// Use with `format_args!` for efficient formatting:
    /// ```no_run
    /// # use vault_notify::BatchLog;
    /// # fn example(log: &BatchLog) {
    /// log.info(format_args!("Found {} audit record(s)", 3));
    /// # }
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(batch_id = %self.batch_id, "{}", args);
    }

    /// Logs a warning-level message with batch ID.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(batch_id = %self.batch_id, "{}", args);
    }

    /// Logs an error-level message with batch ID.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(batch_id = %self.batch_id, "{}", args);
    }

    /// Logs a debug-level message with batch ID.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(batch_id = %self.batch_id, "{}", args);
    }
}

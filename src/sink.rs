use std::cell::RefCell;
use std::fmt;

use crate::message::NotificationMessage;

/// Error returned when a sink does not accept a notification.
///
/// # Examples
///
/// ```
/// use vault_notify::{SinkError, SinkErrorKind};
///
/// let error = SinkError::with_message(SinkErrorKind::Full, "outbound queue at capacity");
/// assert_eq!(error.kind(), SinkErrorKind::Full);
/// assert_eq!(error.message(), Some("outbound queue at capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError {
    kind: SinkErrorKind,
    message: Option<String>,
}

impl SinkError {
    /// Creates a new sink error with the specified kind.
    pub fn new(kind: SinkErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Creates a new sink error with a custom message.
    pub fn with_message(kind: SinkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> SinkErrorKind {
        self.kind
    }

    /// Returns the error message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(msg) = &self.message {
            write!(f, "sink error ({}): {}", self.kind, msg)
        } else {
            write!(f, "sink error ({})", self.kind)
        }
    }
}

impl std::error::Error for SinkError {}

/// Kind of sink error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkErrorKind {
    /// The transport refused the message.
    Rejected,
    /// I/O error occurred while handing the message over.
    Io,
    /// Sink is full or has reached capacity.
    Full,
}

impl fmt::Display for SinkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected => write!(f, "rejected"),
            Self::Io => write!(f, "I/O error"),
            Self::Full => write!(f, "sink full"),
        }
    }
}

/// Outbound notification transport.
///
/// Sends are fire-and-forget from the batch's point of view: an error is
/// logged and counted but never fails the batch, and nothing is retried.
pub trait NotificationSink {
    /// Appends a message to the outbound queue.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the transport does not accept the message.
    fn send(&self, message: NotificationMessage) -> Result<(), SinkError>;
}

/// A sink that collects notifications in memory.
///
/// # Examples
///
/// ```
/// use vault_notify::{NotificationMessage, NotificationSink, VecSink};
///
/// let sink = VecSink::new();
/// sink.send(NotificationMessage::new("hello")).unwrap();
///
/// let messages = sink.into_vec();
/// assert_eq!(messages[0].summary, "hello");
/// ```
#[derive(Debug, Default)]
pub struct VecSink {
    messages: RefCell<Vec<NotificationMessage>>,
}

impl VecSink {
    /// Creates a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of messages in the sink.
    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    /// Returns `true` if the sink contains no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    /// Provides borrowed access to messages via callback.
    pub fn with_messages<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[NotificationMessage]) -> R,
    {
        f(&self.messages.borrow())
    }

    /// Consumes the sink and returns the collected messages.
    pub fn into_vec(self) -> Vec<NotificationMessage> {
        self.messages.into_inner()
    }
}

impl NotificationSink for VecSink {
    fn send(&self, message: NotificationMessage) -> Result<(), SinkError> {
        self.messages.borrow_mut().push(message);
        Ok(())
    }
}

/// A sink that emits each notification as a structured `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn send(&self, message: NotificationMessage) -> Result<(), SinkError> {
        let body = serde_json::to_string(&message)
            .map_err(|e| SinkError::with_message(SinkErrorKind::Rejected, e.to_string()))?;
        tracing::info!(
            target: "vault_notify::notification",
            summary = %message.summary,
            %body,
            "notification"
        );
        Ok(())
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for &S {
    fn send(&self, message: NotificationMessage) -> Result<(), SinkError> {
        (**self).send(message)
    }
}

use std::error::Error as StdError;
use std::fmt;

type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// Error produced while decoding a single payload or record.
///
/// Carries the kind of failure, the dotted path of the field that failed
/// (e.g. `properties.id`, `records[2].time`), a human-readable message and,
/// when one exists, the parser error that caused it.
///
/// # Examples
///
/// ```
/// use vault_notify::{DecodeError, DecodeErrorKind};
///
/// let error = DecodeError::missing("operationName").at("records[0]");
/// assert_eq!(error.kind(), DecodeErrorKind::MissingField);
/// assert_eq!(error.field(), Some("records[0].operationName"));
/// ```
#[derive(Debug)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    field: Option<String>,
    message: String,
    source: Option<Cause>,
}

impl DecodeError {
    /// Creates a new decode error with no field path.
    pub fn new(kind: DecodeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `MissingField` error for the named field.
    pub fn missing(field: &str) -> Self {
        Self::new(DecodeErrorKind::MissingField, "required field is absent").at(field)
    }

    /// Creates a `ShapeMismatch` error describing the expected and found JSON kinds.
    pub fn shape(expected: &str, found: JsonKind) -> Self {
        Self::new(
            DecodeErrorKind::ShapeMismatch,
            format!("expected {}, found {}", expected, found),
        )
    }

    /// Attaches the underlying parser error.
    pub fn with_source(mut self, source: impl Into<Cause>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Prefixes the field path with `parent`.
    ///
    /// Decoders call this on the way back up, so the path ends up rooted at
    /// the outermost record.
    pub fn at(mut self, parent: &str) -> Self {
        self.field = Some(match self.field.take() {
            None => parent.to_string(),
            Some(child) if child.starts_with('[') => format!("{}{}", parent, child),
            Some(child) => format!("{}.{}", parent, child),
        });
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// Returns the dotted path of the failing field, if known.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(
                f,
                "decode error ({}) at `{}`: {}",
                self.kind, field, self.message
            ),
            None => write!(f, "decode error ({}): {}", self.kind, self.message),
        }
    }
}

impl StdError for DecodeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::new(DecodeErrorKind::MalformedJson, err.to_string()).with_source(err)
    }
}

/// Kind of decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Payload or nested string is not valid JSON.
    MalformedJson,
    /// Value is present but has the wrong JSON kind.
    ShapeMismatch,
    /// A required field is absent.
    MissingField,
    /// Value has the right JSON kind but its content does not parse
    /// (bad timestamp, URI, UUID, out-of-range number).
    InvalidValue,
    /// A claim value cannot be represented as a string.
    ValueCoercion,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson => write!(f, "malformed json"),
            Self::ShapeMismatch => write!(f, "shape mismatch"),
            Self::MissingField => write!(f, "missing field"),
            Self::InvalidValue => write!(f, "invalid value"),
            Self::ValueCoercion => write!(f, "value coercion"),
        }
    }
}

/// The kind of a JSON value, used in shape diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    /// `null`
    Null,
    /// `true` / `false`
    Bool,
    /// Any number
    Number,
    /// A string
    String,
    /// An array
    Array,
    /// An object
    Object,
}

impl JsonKind {
    /// Returns the kind of `value`.
    pub fn of(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Array => write!(f, "array"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// A decode failure tied to its position in the batch.
///
/// `item` is the index of the raw payload in the batch. `record` is the index
/// of the element inside a multi-record payload, or `None` when the payload
/// as a whole could not be read.
#[derive(Debug)]
pub struct DecodeFailure {
    /// Index of the payload within the batch.
    pub item: usize,
    /// Index of the record within the payload, if the failure is per-record.
    pub record: Option<usize>,
    /// The underlying decode error.
    pub error: DecodeError,
}

impl DecodeFailure {
    /// Creates a failure for a whole payload.
    pub fn payload(item: usize, error: DecodeError) -> Self {
        Self {
            item,
            record: None,
            error,
        }
    }

    /// Creates a failure for one record inside a payload.
    pub fn record(item: usize, record: usize, error: DecodeError) -> Self {
        Self {
            item,
            record: Some(record),
            error,
        }
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            Some(record) => write!(f, "item {} record {}: {}", self.item, record, self.error),
            None => write!(f, "item {}: {}", self.item, self.error),
        }
    }
}

impl StdError for DecodeFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.error)
    }
}

/// Error raised once a batch has been fully attempted and at least one
/// item failed.
///
/// A batch that returns this error dispatches no notifications.
#[derive(Debug)]
pub enum BatchError {
    /// Exactly one item failed.
    Single(DecodeFailure),
    /// More than one item failed; every failure is kept in batch order.
    Aggregate(Vec<DecodeFailure>),
}

impl BatchError {
    /// Builds the batch error for a list of failures.
    ///
    /// Returns `None` when the list is empty.
    pub fn from_failures(mut failures: Vec<DecodeFailure>) -> Option<Self> {
        match failures.len() {
            0 => None,
            1 => failures.pop().map(BatchError::Single),
            _ => Some(BatchError::Aggregate(failures)),
        }
    }

    /// Returns every failure carried by this error.
    pub fn failures(&self) -> &[DecodeFailure] {
        match self {
            BatchError::Single(failure) => std::slice::from_ref(failure),
            BatchError::Aggregate(failures) => failures,
        }
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::Single(failure) => write!(f, "batch failed: {}", failure),
            BatchError::Aggregate(failures) => {
                write!(f, "batch failed with {} errors", failures.len())?;
                for failure in failures {
                    write!(f, "; {}", failure)?;
                }
                Ok(())
            }
        }
    }
}

impl StdError for BatchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            BatchError::Single(failure) => Some(failure),
            BatchError::Aggregate(_) => None,
        }
    }
}

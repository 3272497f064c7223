use serde::Deserialize;

use crate::record::AuditRecord;

/// Operation name notified by default.
pub const DEFAULT_OPERATION: &str = "SecretGet";

/// Result type notified by default.
pub const DEFAULT_RESULT: &str = "Success";

/// Predicate deciding which audit records produce a notification.
///
/// Both fields are exact, case-sensitive matches.
///
/// # Examples
///
/// ```
/// use vault_notify::NotificationPolicy;
///
/// let policy = NotificationPolicy::default();
/// assert_eq!(policy.operation_name, "SecretGet");
/// assert_eq!(policy.result_type, "Success");
///
/// let deletes = NotificationPolicy::new("SecretDelete", "Success");
/// assert_eq!(deletes.operation_name, "SecretDelete");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationPolicy {
    /// Required `operationName`.
    pub operation_name: String,
    /// Required `resultType`.
    pub result_type: String,
}

impl NotificationPolicy {
    /// Creates a policy matching the given operation and result.
    pub fn new(operation_name: impl Into<String>, result_type: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            result_type: result_type.into(),
        }
    }

    /// Returns `true` if the record should be notified.
    pub fn matches(&self, record: &AuditRecord) -> bool {
        record.operation_name == self.operation_name && record.result_type == self.result_type
    }
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_OPERATION, DEFAULT_RESULT)
    }
}

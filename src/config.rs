//! Notifier configuration.

use serde::Deserialize;

use crate::policy::NotificationPolicy;

/// Host suffix of vault endpoints in the public cloud.
pub const DEFAULT_VAULT_HOST_SUFFIX: &str = ".vault.azure.net";

/// Portal used for resource links.
pub const DEFAULT_PORTAL_URL: &str = "https://portal.azure.com";

/// Settings for formatting and filtering notifications.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use vault_notify::NotifierConfig;
///
/// let config = NotifierConfig::from_json(r#"{
///     "tenantDomain": "contoso.onmicrosoft.com",
///     "policy": {"operationName": "SecretSet"}
/// }"#).unwrap();
///
/// assert_eq!(config.policy.operation_name, "SecretSet");
/// assert_eq!(config.policy.result_type, "Success");
/// assert_eq!(config.vault_host_suffix, ".vault.azure.net");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotifierConfig {
    /// Which audit records are notified.
    pub policy: NotificationPolicy,
    /// Suffix stripped from vault hosts to get the vault name.
    pub vault_host_suffix: String,
    /// Base URL for resource links.
    pub portal_url: String,
    /// Directory domain inserted into portal links, if any.
    pub tenant_domain: Option<String>,
}

impl NotifierConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the text is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Sets the notification policy.
    pub fn with_policy(mut self, policy: NotificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the vault host suffix.
    pub fn with_vault_host_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.vault_host_suffix = suffix.into();
        self
    }

    /// Sets the portal base URL.
    pub fn with_portal_url(mut self, url: impl Into<String>) -> Self {
        self.portal_url = url.into();
        self
    }

    /// Sets the tenant domain used in portal links.
    pub fn with_tenant_domain(mut self, domain: impl Into<String>) -> Self {
        self.tenant_domain = Some(domain.into());
        self
    }

    /// Returns the portal link for a resource ID.
    pub(crate) fn portal_link(&self, resource_id: &str) -> String {
        let base = self.portal_url.trim_end_matches('/');
        match &self.tenant_domain {
            Some(tenant) => format!("{}/#@{}/resource{}", base, tenant, resource_id),
            None => format!("{}/#resource{}", base, resource_id),
        }
    }

    /// Returns the endpoint URL of a vault.
    pub(crate) fn vault_url(&self, vault_name: &str) -> String {
        format!("https://{}{}", vault_name, self.vault_host_suffix)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            policy: NotificationPolicy::default(),
            vault_host_suffix: DEFAULT_VAULT_HOST_SUFFIX.to_string(),
            portal_url: DEFAULT_PORTAL_URL.to_string(),
            tenant_domain: None,
        }
    }
}

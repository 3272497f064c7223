//! Rendering of decoded records into notification messages.

use chrono::{DateTime, Utc};

use crate::batch::DecodedBatch;
use crate::claims::{OBJECT_ID_CLAIM, UPN_CLAIM};
use crate::config::NotifierConfig;
use crate::message::{Link, NotificationMessage, Section};
use crate::record::{AuditRecord, ResourceEvent};

/// Placeholder for values the record does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

const AUDIT_SUMMARY: &str = "A new key vault audit event occurred";
const AUDIT_HEADER: &str = "You have a new key vault audit event activity";
const EVENT_SUMMARY: &str = "A new key vault event occurred";
const EVENT_HEADER: &str = "You have a new key vault event activity";

/// Filters records and renders them as [`NotificationMessage`]s.
///
/// Audit records are notified only when they match the configured
/// [`NotificationPolicy`](crate::NotificationPolicy); every resource event is
/// notified.
#[derive(Debug, Clone, Default)]
pub struct NotificationFormatter {
    config: NotifierConfig,
}

impl NotificationFormatter {
    /// Creates a formatter with the given configuration.
    pub fn new(config: NotifierConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Renders every notification for a decoded batch.
    ///
    /// Qualifying audit records come first, then all resource events, each
    /// in decode order.
    pub fn format_batch(&self, batch: &DecodedBatch) -> Vec<NotificationMessage> {
        let audits = batch
            .audit_records
            .iter()
            .filter_map(|record| self.format_audit(record));
        let events = batch
            .resource_events
            .iter()
            .map(|event| self.format_resource_event(event));

        audits.chain(events).collect()
    }

    /// Renders an audit record if it matches the policy.
    pub fn format_audit(&self, record: &AuditRecord) -> Option<NotificationMessage> {
        if !self.config.policy.matches(record) {
            return None;
        }
        Some(self.render_audit(record))
    }

    /// Renders an audit record without consulting the policy.
    pub fn render_audit(&self, record: &AuditRecord) -> NotificationMessage {
        let object_id = record.properties.id.as_ref();
        let vault_name = object_id
            .and_then(|id| id.host_str())
            .map(|host| vault_name_from_host(host, &self.config.vault_host_suffix))
            .unwrap_or(NOT_AVAILABLE);
        let object_name = object_id
            .and_then(|id| object_name_from_path(id.path()))
            .unwrap_or(NOT_AVAILABLE);

        let who = format!(
            "{}[{}]",
            record.claim(UPN_CLAIM).unwrap_or(NOT_AVAILABLE),
            record.claim(OBJECT_ID_CLAIM).unwrap_or(NOT_AVAILABLE),
        );
        let portal_link = self.config.portal_link(&record.resource_id);

        let header = Section::new().field(
            AUDIT_HEADER,
            Link::new(&portal_link, vault_name).to_string(),
        );
        let body = Section::new()
            .field("Who", who)
            .field("Time", render_time(&record.time))
            .field("Type", record.operation_name.as_str())
            .field("Name", object_name)
            .field("IP", record.caller_ip_address.as_str());

        NotificationMessage::new(AUDIT_SUMMARY)
            .section(header)
            .section(body)
    }

    /// Renders a resource event.
    ///
    /// `Not Before` and `Expires` fields are only present when the event
    /// carries those bounds.
    pub fn format_resource_event(&self, event: &ResourceEvent) -> NotificationMessage {
        let data = &event.data;
        let vault_url = self.config.vault_url(&data.vault_name);
        let object_url = data.id.as_ref().map(|id| id.as_str());

        let header = Section::new().field(
            EVENT_HEADER,
            Link::new(&vault_url, &data.vault_name).to_string(),
        );
        let body = Section::new()
            .field("Type", event.event_type.as_str())
            .field("Time", render_time(&event.event_time))
            .field("Object Type", data.object_type.as_str())
            .field("Name", Link::maybe(object_url, &data.object_name).to_string())
            .field("Version", data.version.as_deref().unwrap_or(NOT_AVAILABLE))
            .optional_field("Not Before", data.nbf.as_ref().map(render_time))
            .optional_field("Expires", data.exp.as_ref().map(render_time));

        NotificationMessage::new(EVENT_SUMMARY)
            .section(header)
            .section(body)
    }
}

fn render_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn vault_name_from_host<'a>(host: &'a str, suffix: &str) -> &'a str {
    host.strip_suffix(suffix).unwrap_or(host)
}

// Object URIs look like /secrets/<name>/<version>.
fn object_name_from_path(path: &str) -> Option<&str> {
    let mut segments = path.trim_start_matches('/').rsplit('/');
    segments.next()?;
    segments.next().filter(|name| !name.is_empty())
}

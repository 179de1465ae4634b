//! The report event record.

use serde::{Deserialize, Serialize};

/// Event type carried by every report this client emits.
pub const EVENT_TYPE_ERROR: &str = "error";

/// A single application error report.
///
/// Field order is part of the wire format: the schema encodes the fields
/// exactly as they are declared here. Field names are not encoded, so the
/// message field keeps the collector's `event_msg` name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEvent {
    /// Identifier of the unit of work that failed.
    pub instance_id: String,
    /// Human-readable description, `"<context>: <error text>"`.
    pub event_msg: String,
    /// Name of the service that produced the report.
    pub service_name: String,
    /// Kind of event. Only [`EVENT_TYPE_ERROR`] is emitted by this client.
    pub event_type: String,
}

impl ReportEvent {
    /// Builds an error report, formatting the message as `"<context>: <cause>"`.
    pub fn error(
        instance_id: impl Into<String>,
        context: &str,
        cause: impl std::fmt::Display,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            event_msg: format!("{context}: {cause}"),
            service_name: service_name.into(),
            event_type: EVENT_TYPE_ERROR.to_string(),
        }
    }
}

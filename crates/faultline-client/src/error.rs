//! Error types for the reporter client.

use std::time::Duration;

use faultline_types::SchemaError;

use crate::producer::ProducerError;

/// Validation message for a missing instance identifier.
pub const ID_REQUIRED: &str = "id required";

/// Validation message for a missing error context.
pub const CONTEXT_REQUIRED: &str = "context required";

/// Errors returned by [`Reporter`](crate::Reporter) operations.
#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    /// The reporter could not be constructed from the supplied settings.
    #[error("invalid reporter configuration: {0}")]
    Config(String),

    /// A required per-call field was empty. Nothing was encoded or sent.
    #[error("cannot notify: {0}")]
    Validation(&'static str),

    /// The encoder rejected the report event. Nothing was sent.
    #[error("failed to encode report event: {0}")]
    Encoding(#[source] SchemaError),

    /// The producer no longer accepts payloads.
    #[error("outbound channel closed, report event was not submitted")]
    ChannelClosed,

    /// Close did not complete within the allotted time.
    #[error("reporter close timed out after {0:?}")]
    Timeout(Duration),

    /// The producer failed while closing.
    #[error("producer close failed: {0}")]
    Close(#[source] ProducerError),
}

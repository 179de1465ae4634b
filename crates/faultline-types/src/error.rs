//! Error types for the report event schema.

/// Errors raised while encoding or decoding a [`ReportEvent`](crate::ReportEvent).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The record could not be written in the schema's binary layout.
    #[error("report event encode error: {0}")]
    Encode(String),

    /// The payload is not a valid encoding of a report event.
    #[error("report event decode error: {0}")]
    Decode(String),
}

//! Encoder/decoder capabilities and the standard binary schema.
//!
//! Reporters receive an encoder at construction time instead of reaching for
//! a shared schema object, so tests and alternate schemas can be swapped in
//! per instance.

use bincode::Options;

use crate::error::SchemaError;
use crate::event::ReportEvent;

/// Turns a report event into its wire payload.
pub trait EventEncoder: Send + Sync {
    /// Encodes `event` into bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Encode`] if the record cannot be represented.
    fn encode(&self, event: &ReportEvent) -> Result<Vec<u8>, SchemaError>;
}

/// Reads a wire payload back into a report event.
pub trait EventDecoder: Send + Sync {
    /// Decodes `bytes` into a report event.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Decode`] on truncated or otherwise malformed
    /// input, including trailing bytes after the record.
    fn decode(&self, bytes: &[u8]) -> Result<ReportEvent, SchemaError>;
}

/// The standard report event schema.
///
/// Fixed-width little-endian length prefixes, fields in declaration order,
/// no trailing data. Encoding has no size cap. Decoding never reads past the
/// input, so a length prefix larger than the payload fails before anything
/// is allocated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportEventSchema;

fn layout() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

impl EventEncoder for ReportEventSchema {
    fn encode(&self, event: &ReportEvent) -> Result<Vec<u8>, SchemaError> {
        layout()
            .serialize(event)
            .map_err(|e| SchemaError::Encode(e.to_string()))
    }
}

impl EventDecoder for ReportEventSchema {
    fn decode(&self, bytes: &[u8]) -> Result<ReportEvent, SchemaError> {
        layout()
            .with_limit(bytes.len() as u64)
            .reject_trailing_bytes()
            .deserialize(bytes)
            .map_err(|e| SchemaError::Decode(e.to_string()))
    }
}

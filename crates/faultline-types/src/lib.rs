//! Wire record and binary schema for faultline error reports.
//!
//! Every report that leaves a service is a single [`ReportEvent`], encoded
//! by an [`EventEncoder`] into an opaque byte payload. The payload is what
//! travels over the outbound channel; the collector decodes it with the
//! matching [`EventDecoder`].
//!
//! # Wire layout
//!
//! [`ReportEventSchema`] is the standard schema. It writes the four record
//! fields in declaration order, each as a little-endian `u64` byte length
//! followed by the UTF-8 bytes:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `instance_id` | unit of work that failed |
//! | `event_msg` | `"<context>: <error text>"` |
//! | `service_name` | reporting service |
//! | `event_type` | always `"error"` for this client |
//!
//! # Usage
//!
//! ```rust
//! use faultline_types::{EventDecoder, EventEncoder, ReportEvent, ReportEventSchema};
//!
//! let event = ReportEvent::error("666", "Ricky Ticky Tic Tac", "Flubba Wubba Dub Dub", "Bob");
//! let bytes = ReportEventSchema.encode(&event).unwrap();
//! assert_eq!(ReportEventSchema.decode(&bytes).unwrap(), event);
//! ```

mod error;
mod event;
mod schema;

pub use error::SchemaError;
pub use event::{ReportEvent, EVENT_TYPE_ERROR};
pub use schema::{EventDecoder, EventEncoder, ReportEventSchema};

//! Fire-and-forget error reporting for faultline services.
//!
//! A service builds one [`Reporter`] at startup and calls
//! [`Reporter::notify`] whenever a unit of work fails. Each call validates
//! its input, builds a [`ReportEvent`](faultline_types::ReportEvent),
//! encodes it and hands the bytes to the producer's outbound channel.
//! On shutdown, [`Reporter::close`] asks the producer to drain within a
//! bounded time.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use faultline_client::{ChannelProducer, Reporter};
//!
//! let (producer, mut outbound) = ChannelProducer::new(1024);
//! let reporter = Reporter::new(Some(Arc::new(producer)), "dataset-importer")?;
//!
//! reporter.notify(&instance_id, "validating observations", &err).await?;
//!
//! // ... forward `outbound.recv()` payloads downstream ...
//!
//! reporter.close(None).await?;
//! ```
//!
//! # Delivery
//!
//! A successful `notify` means the payload is in the outbound channel, not
//! that the collector has seen it. There are no retries, batching, or
//! delivery guarantees beyond that handoff.

pub mod config;
mod context;
mod error;
mod producer;
mod reporter;
pub mod testing;

pub use config::{load_config, Config, ConfigError, LoggingConfig, ReporterConfig};
pub use context::CloseContext;
pub use error::{ReporterError, CONTEXT_REQUIRED, ID_REQUIRED};
pub use producer::{ChannelProducer, OutboundReceiver, Producer, ProducerError};
pub use reporter::{ErrorReporter, Reporter, DEFAULT_CLOSE_TIMEOUT};

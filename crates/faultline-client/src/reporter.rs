//! The error reporter.
//!
//! A [`Reporter`] validates each request, builds a [`ReportEvent`], encodes
//! it with its injected encoder and submits the bytes to the producer's
//! outbound channel. Either every step succeeds or the call stops at the
//! first failing step and returns exactly that error; nothing is retried.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use faultline_types::{EventEncoder, ReportEvent, ReportEventSchema};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::ReporterConfig;
use crate::context::CloseContext;
use crate::error::{ReporterError, CONTEXT_REQUIRED, ID_REQUIRED};
use crate::producer::{Producer, ProducerError};

/// Close timeout applied when the caller supplies no deadline.
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can report an application error.
///
/// `id` and `context` are required. A missing one, or any failure while
/// reporting, is returned to the caller to handle as they see fit.
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    /// Reports `err`, raised while processing `id`, described by `context`.
    async fn notify(
        &self,
        id: &str,
        context: &str,
        err: &(dyn std::error::Error + Send + Sync),
    ) -> Result<(), ReporterError>;
}

/// Sends error reports to the collector through a [`Producer`].
///
/// Cloning is cheap and clones share the same producer, so a single reporter
/// can be handed to many concurrent tasks.
#[derive(Clone)]
pub struct Reporter {
    producer: Arc<dyn Producer>,
    encoder: Arc<dyn EventEncoder>,
    service_name: Arc<str>,
    close_timeout: Duration,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("service_name", &self.service_name)
            .field("close_timeout", &self.close_timeout)
            .finish_non_exhaustive()
    }
}

impl Reporter {
    /// Creates a reporter for `service_name` that submits through `producer`.
    ///
    /// The reporter encodes with [`ReportEventSchema`] and closes with
    /// [`DEFAULT_CLOSE_TIMEOUT`] unless told otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ReporterError::Config`] if `producer` is `None` or
    /// `service_name` is empty.
    pub fn new(
        producer: Option<Arc<dyn Producer>>,
        service_name: &str,
    ) -> Result<Self, ReporterError> {
        let Some(producer) = producer else {
            return Err(ReporterError::Config(
                "cannot create reporter, producer is missing".to_string(),
            ));
        };
        if service_name.is_empty() {
            return Err(ReporterError::Config(
                "cannot create reporter, service name is empty".to_string(),
            ));
        }

        Ok(Self {
            producer,
            encoder: Arc::new(ReportEventSchema),
            service_name: Arc::from(service_name),
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
        })
    }

    /// Creates a reporter from loaded configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Reporter::new`].
    pub fn from_config(
        config: &ReporterConfig,
        producer: Option<Arc<dyn Producer>>,
    ) -> Result<Self, ReporterError> {
        Ok(Self::new(producer, &config.service_name)?.with_close_timeout(config.close_timeout()))
    }

    /// Replaces the event encoder.
    pub fn with_encoder(mut self, encoder: Arc<dyn EventEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Replaces the timeout used by [`Reporter::close`] when no deadline is given.
    pub fn with_close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }

    /// The service name stamped on every report.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// The timeout applied to deadline-less closes.
    pub fn close_timeout(&self) -> Duration {
        self.close_timeout
    }

    /// Reports `err`, raised while processing `id`, described by `context`.
    ///
    /// Returns once the encoded event has been accepted by the outbound
    /// channel, suspending for as long as the channel is full.
    ///
    /// # Errors
    ///
    /// - [`ReporterError::Validation`] if `id` or `context` is empty
    /// - [`ReporterError::Encoding`] if the encoder rejects the event
    /// - [`ReporterError::ChannelClosed`] if the producer stopped accepting payloads
    pub async fn notify(
        &self,
        id: &str,
        context: &str,
        err: &(dyn std::error::Error + Send + Sync),
    ) -> Result<(), ReporterError> {
        if id.is_empty() {
            warn!(service_name = %self.service_name, "cannot notify, id is a required field but was empty");
            return Err(ReporterError::Validation(ID_REQUIRED));
        }
        if context.is_empty() {
            warn!(
                service_name = %self.service_name,
                instance_id = id,
                "cannot notify, context is a required field but was empty"
            );
            return Err(ReporterError::Validation(CONTEXT_REQUIRED));
        }

        let event = ReportEvent::error(id, context, err, &*self.service_name);
        info!(
            instance_id = %event.instance_id,
            service_name = %event.service_name,
            event_msg = %event.event_msg,
            "sending report event for application error"
        );

        let payload = self.encoder.encode(&event).map_err(|e| {
            error!(
                instance_id = %event.instance_id,
                error = %e,
                "failed to encode report event"
            );
            ReporterError::Encoding(e)
        })?;

        let output = self.producer.output().map_err(|e| {
            warn!(instance_id = %event.instance_id, error = %e, "producer refused output");
            ReporterError::ChannelClosed
        })?;
        output
            .send(payload)
            .await
            .map_err(|_| ReporterError::ChannelClosed)?;

        debug!(instance_id = %event.instance_id, "report event submitted");
        Ok(())
    }

    /// Closes the underlying producer.
    ///
    /// Without a context, or with one that has no deadline, the reporter's
    /// close timeout applies. The wait is bounded by the effective deadline
    /// even if the producer ignores it.
    ///
    /// # Errors
    ///
    /// - [`ReporterError::Timeout`] if the deadline passes first
    /// - [`ReporterError::Close`] for any other producer failure
    pub async fn close(&self, ctx: Option<CloseContext>) -> Result<(), ReporterError> {
        let ctx = ctx.unwrap_or_default().or_timeout(self.close_timeout);
        let budget = ctx.remaining().unwrap_or(self.close_timeout);
        let deadline = ctx.deadline().unwrap_or_else(|| Instant::now() + budget);

        info!(
            service_name = %self.service_name,
            timeout_ms = budget.as_millis() as u64,
            "closing reporter"
        );

        match tokio::time::timeout_at(deadline, self.producer.close(ctx)).await {
            Ok(Ok(())) => {
                info!(service_name = %self.service_name, "reporter closed");
                Ok(())
            }
            Ok(Err(ProducerError::Timeout)) | Err(_) => {
                warn!(
                    service_name = %self.service_name,
                    timeout_ms = budget.as_millis() as u64,
                    "reporter close timed out"
                );
                Err(ReporterError::Timeout(budget))
            }
            Ok(Err(e)) => {
                warn!(service_name = %self.service_name, error = %e, "producer close failed");
                Err(ReporterError::Close(e))
            }
        }
    }
}

#[async_trait]
impl ErrorReporter for Reporter {
    async fn notify(
        &self,
        id: &str,
        context: &str,
        err: &(dyn std::error::Error + Send + Sync),
    ) -> Result<(), ReporterError> {
        Reporter::notify(self, id, context, err).await
    }
}

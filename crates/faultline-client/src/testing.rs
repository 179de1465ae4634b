//! Test doubles for code that reports errors.
//!
//! - [`ProducerMock`] stands in for a transport and records how it was used.
//! - [`ReporterMock`] stands in for a [`Reporter`](crate::Reporter) in the
//!   caller's own tests.
//! - [`RecordingEncoder`] captures the events a reporter asks to encode.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use faultline_types::{EventEncoder, ReportEvent, SchemaError};
use tokio::sync::mpsc;

use crate::context::CloseContext;
use crate::error::ReporterError;
use crate::producer::{Producer, ProducerError};
use crate::reporter::ErrorReporter;

/// A [`Producer`] that hands out a caller-owned channel.
#[derive(Debug)]
pub struct ProducerMock {
    output: Option<mpsc::Sender<Vec<u8>>>,
    output_calls: AtomicUsize,
    close_calls: Mutex<Vec<CloseContext>>,
    close_result: Result<(), ProducerError>,
    close_delay: Option<Duration>,
}

impl ProducerMock {
    /// A producer whose output is `output`. Close succeeds immediately.
    pub fn new(output: mpsc::Sender<Vec<u8>>) -> Self {
        Self {
            output: Some(output),
            output_calls: AtomicUsize::new(0),
            close_calls: Mutex::new(Vec::new()),
            close_result: Ok(()),
            close_delay: None,
        }
    }

    /// A producer whose `output()` always fails with [`ProducerError::Closed`].
    pub fn closed() -> Self {
        Self {
            output: None,
            ..Self::new(mpsc::channel(1).0)
        }
    }

    /// Makes `close` return `result`.
    pub fn with_close_result(mut self, result: Result<(), ProducerError>) -> Self {
        self.close_result = result;
        self
    }

    /// Makes `close` sleep for `delay` before returning, ignoring any deadline.
    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = Some(delay);
        self
    }

    /// Number of times `output()` was called.
    pub fn output_calls(&self) -> usize {
        self.output_calls.load(Ordering::SeqCst)
    }

    /// Contexts passed to `close`, in call order.
    pub fn close_calls(&self) -> Vec<CloseContext> {
        self.close_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Producer for ProducerMock {
    fn output(&self) -> Result<mpsc::Sender<Vec<u8>>, ProducerError> {
        self.output_calls.fetch_add(1, Ordering::SeqCst);
        self.output.clone().ok_or(ProducerError::Closed)
    }

    async fn close(&self, ctx: CloseContext) -> Result<(), ProducerError> {
        self.close_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ctx);
        if let Some(delay) = self.close_delay {
            tokio::time::sleep(delay).await;
        }
        self.close_result.clone()
    }
}

/// The arguments of a single [`ErrorReporter::notify`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyCall {
    /// The instance identifier.
    pub id: String,
    /// The error context.
    pub context: String,
    /// The error's display text.
    pub err: String,
}

type NotifyFn = Box<dyn Fn(&NotifyCall) -> Result<(), ReporterError> + Send + Sync>;

/// An [`ErrorReporter`] that records calls and answers with a caller-supplied function.
pub struct ReporterMock {
    calls: Mutex<Vec<NotifyCall>>,
    notify_fn: NotifyFn,
}

impl std::fmt::Debug for ReporterMock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReporterMock")
            .field("calls", &self.notify_calls())
            .finish_non_exhaustive()
    }
}

impl ReporterMock {
    /// A mock whose result for each call is computed by `notify_fn`.
    pub fn new(
        notify_fn: impl Fn(&NotifyCall) -> Result<(), ReporterError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            notify_fn: Box::new(notify_fn),
        }
    }

    /// A mock that accepts every call.
    pub fn succeeding() -> Self {
        Self::new(|_| Ok(()))
    }

    /// The recorded calls, in call order.
    pub fn notify_calls(&self) -> Vec<NotifyCall> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ErrorReporter for ReporterMock {
    async fn notify(
        &self,
        id: &str,
        context: &str,
        err: &(dyn std::error::Error + Send + Sync),
    ) -> Result<(), ReporterError> {
        let call = NotifyCall {
            id: id.to_string(),
            context: context.to_string(),
            err: err.to_string(),
        };
        let result = (self.notify_fn)(&call);
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        result
    }
}

/// An [`EventEncoder`] that records every event it is given.
pub struct RecordingEncoder {
    inner: Result<Arc<dyn EventEncoder>, SchemaError>,
    events: Mutex<Vec<ReportEvent>>,
}

impl std::fmt::Debug for RecordingEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingEncoder")
            .field("events", &self.events())
            .finish_non_exhaustive()
    }
}

impl RecordingEncoder {
    /// Records events, then delegates encoding to `inner`.
    pub fn wrapping(inner: impl EventEncoder + 'static) -> Self {
        let inner: Arc<dyn EventEncoder> = Arc::new(inner);
        Self {
            inner: Ok(inner),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Records events, then fails every encode with `err`.
    pub fn failing(err: SchemaError) -> Self {
        Self {
            inner: Err(err),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Events passed to `encode`, in call order.
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl EventEncoder for RecordingEncoder {
    fn encode(&self, event: &ReportEvent) -> Result<Vec<u8>, SchemaError> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
        match &self.inner {
            Ok(inner) => inner.encode(event),
            Err(err) => Err(err.clone()),
        }
    }
}

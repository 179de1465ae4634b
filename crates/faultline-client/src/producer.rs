//! The outbound producer capability and its in-process channel implementation.
//!
//! A [`Producer`] owns the outbound channel. The reporter only borrows a
//! sender per report and asks the producer to shut down through
//! [`Producer::close`]; connection handling, partitioning and delivery
//! retries belong to whatever sits behind the channel.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::context::CloseContext;

/// Errors raised by a producer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProducerError {
    /// The producer has been closed and no longer hands out senders.
    #[error("producer is closed")]
    Closed,

    /// The close deadline passed before the producer finished draining.
    #[error("producer close deadline exceeded")]
    Timeout,

    /// The underlying transport reported a failure.
    #[error("producer transport error: {0}")]
    Transport(String),
}

/// Capabilities a reporter needs from its transport.
#[async_trait]
pub trait Producer: Send + Sync {
    /// Returns a sender for the outbound channel.
    ///
    /// Sending on it suspends while the channel has no free slot.
    ///
    /// # Errors
    ///
    /// Returns [`ProducerError::Closed`] once the producer has been closed.
    fn output(&self) -> Result<mpsc::Sender<Vec<u8>>, ProducerError>;

    /// Stops accepting payloads and waits for queued ones to be drained.
    ///
    /// Implementations should give up when `ctx`'s deadline passes.
    ///
    /// # Errors
    ///
    /// Returns [`ProducerError::Timeout`] if draining outlives the deadline,
    /// or a transport-specific error.
    async fn close(&self, ctx: CloseContext) -> Result<(), ProducerError>;
}

/// A [`Producer`] backed by a bounded tokio channel.
///
/// Pair it with the [`OutboundReceiver`] returned by [`ChannelProducer::new`]
/// and hand that receiver to whatever forwards payloads downstream.
#[derive(Debug)]
pub struct ChannelProducer {
    output: Mutex<Option<mpsc::Sender<Vec<u8>>>>,
    drained: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
    capacity: usize,
}

impl ChannelProducer {
    /// Creates a producer with room for `capacity` queued payloads.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> (Self, OutboundReceiver) {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        let (drained_tx, drained_rx) = oneshot::channel();

        let producer = Self {
            output: Mutex::new(Some(tx)),
            drained: tokio::sync::Mutex::new(Some(drained_rx)),
            capacity,
        };
        let receiver = OutboundReceiver {
            rx,
            drained: Some(drained_tx),
        };
        (producer, receiver)
    }

    /// Number of payloads the channel buffers before senders suspend.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` once [`Producer::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.output
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }
}

#[async_trait]
impl Producer for ChannelProducer {
    fn output(&self) -> Result<mpsc::Sender<Vec<u8>>, ProducerError> {
        self.output
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(ProducerError::Closed)
    }

    async fn close(&self, ctx: CloseContext) -> Result<(), ProducerError> {
        // Dropping our sender lets the receiver see end-of-stream once every
        // in-flight send has finished.
        self.output
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        // Waiting on the lock counts against the deadline too, so a close
        // queued behind a slower one still times out on schedule.
        // An Err from the signal means the receiver was dropped, which also
        // ends draining.
        let drain = async {
            let mut drained = self.drained.lock().await;
            if let Some(signal) = drained.as_mut() {
                let _ = signal.await;
                *drained = None;
            }
        };
        match ctx.deadline() {
            Some(deadline) => tokio::time::timeout_at(deadline, drain)
                .await
                .map_err(|_| ProducerError::Timeout)?,
            None => drain.await,
        }

        tracing::debug!("channel producer drained");
        Ok(())
    }
}

/// Consumer half of a [`ChannelProducer`].
#[derive(Debug)]
pub struct OutboundReceiver {
    rx: mpsc::Receiver<Vec<u8>>,
    drained: Option<oneshot::Sender<()>>,
}

impl OutboundReceiver {
    /// Receives the next payload, in submission order.
    ///
    /// Returns `None` once the producer is closed and the queue is empty;
    /// that also completes any pending [`Producer::close`].
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        let next = self.rx.recv().await;
        if next.is_none() {
            self.signal_drained();
        }
        next
    }

    /// Receives a payload if one is queued, without waiting.
    pub fn try_recv(&mut self) -> Option<Vec<u8>> {
        match self.rx.try_recv() {
            Ok(payload) => Some(payload),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.signal_drained();
                None
            }
        }
    }

    fn signal_drained(&mut self) {
        if let Some(tx) = self.drained.take() {
            let _ = tx.send(());
        }
    }
}

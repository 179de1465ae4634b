//! Deadlines for shutdown.

use std::time::Duration;

use tokio::time::Instant;

/// Carries an optional deadline into [`Producer::close`](crate::Producer::close).
///
/// A context without a deadline never expires on its own; the reporter layers
/// its default close timeout on top before handing it to a producer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloseContext {
    deadline: Option<Instant>,
}

impl CloseContext {
    /// A context with no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    /// Returns the deadline, if one is set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Applies `timeout` from now if this context has no deadline yet.
    ///
    /// An existing deadline is kept as is, even if it is later than the
    /// timeout would give.
    pub fn or_timeout(self, timeout: Duration) -> Self {
        match self.deadline {
            Some(_) => self,
            None => Self::with_timeout(timeout),
        }
    }

    /// Time left before the deadline, or `None` for a context without one.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

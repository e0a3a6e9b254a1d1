//! Readiness abstraction, independent of any native polling primitive.
//!
//! The event loop expresses what it wants to hear about (`InterestSet`) and
//! how long it is willing to wait; a `Reactor` implementation blocks until
//! one of the requested conditions is ready or the timeout elapses. Concrete
//! transports implement this over their native readiness source; tests use a
//! deterministic scripted implementation.

use std::pin::Pin;
use std::time::Duration;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Readiness conditions the event loop is interested in this iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterestSet {
    /// Inbound data may be available.
    pub read: bool,
    /// The outbound buffer has bytes to flush.
    pub write: bool,
    /// Error conditions on the descriptor.
    pub error: bool,
}

/// Readiness conditions reported by a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadySet {
    pub readable: bool,
    pub writable: bool,
    pub error: bool,
}

/// Outcome of a bounded readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// At least one requested condition is ready.
    Ready(ReadySet),
    /// The timeout elapsed with no readiness.
    TimedOut,
}

/// Block until one of the requested conditions is ready or the timeout
/// elapses. `None` means wait without bound.
pub trait Reactor {
    fn wait_ready(
        &mut self,
        interest: InterestSet,
        timeout: Option<Duration>,
    ) -> BoxFuture<'_, std::io::Result<WaitOutcome>>;
}

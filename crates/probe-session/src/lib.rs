//! Connection state machine and readiness-driven event loop.
//!
//! This crate is the core of the gateway probe. It owns:
//! - `SessionContext`: the mutable facts of one connection (state, counters,
//!   single wake deadline)
//! - `SessionClient`: request dispatcher and response correlator, implemented
//!   as a `GatewayHandler`
//! - `EventLoop`: computes interest sets and timeouts, blocks on the
//!   transport's reactor, and dispatches readiness into callbacks
//! - `TransportHandle` / `Reactor`: the contracts a concrete transport must
//!   satisfy, plus a deterministic scripted implementation for tests

pub mod client;
pub mod clock;
pub mod context;
pub mod error;
pub mod event_loop;
pub mod handler;
pub mod reactor;
pub mod scripted;
pub mod transport;

pub use client::{DriveOutcome, SessionClient, SessionConfig, CONNECTIVITY_LOST_CODE};
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::{SessionContext, SessionState};
pub use error::{DisconnectReason, TransportError, TransportResult};
pub use event_loop::EventLoop;
pub use handler::GatewayHandler;
pub use reactor::{BoxFuture, InterestSet, Reactor, ReadySet, WaitOutcome};
pub use scripted::{ScriptedEvent, ScriptedTransport, SentRequest};
pub use transport::TransportHandle;

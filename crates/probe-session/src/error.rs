//! Transport error types and session termination reasons.

use std::fmt;
use thiserror::Error;

/// Errors surfaced by a transport handle.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Not connected")]
    NotConnected,

    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Result type alias for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Why the event loop ended the session.
///
/// Errors are handled locally; the loop reports its final state through this
/// enum instead of propagating failures across component boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Gateway reported the connectivity-lost sentinel error.
    ConnectivityLost,
    /// No time-sync response arrived within the ack window.
    AckTimeout,
    /// The readiness wait itself failed.
    WaitFailed,
    /// A send or dispatch callback failed at the transport level.
    TransportFailed,
    /// The transport was closed (peer hangup or local teardown).
    ConnectionClosed,
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ConnectivityLost => "connectivity lost",
            Self::AckTimeout => "ack timeout",
            Self::WaitFailed => "readiness wait failed",
            Self::TransportFailed => "transport failed",
            Self::ConnectionClosed => "connection closed",
        };
        write!(f, "{s}")
    }
}

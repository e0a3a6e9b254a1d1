//! The readiness-driven event loop.
//!
//! Each iteration drives the state machine, computes the interest set and
//! bounded timeout from the session's single wake deadline, blocks on the
//! transport's reactor, and dispatches readiness into transport callbacks.
//! All failures are resolved locally into a `DisconnectReason`; nothing
//! propagates out of `run`.

use crate::client::{DriveOutcome, SessionClient};
use crate::clock::Clock;
use crate::error::DisconnectReason;
use crate::reactor::{InterestSet, Reactor, WaitOutcome};
use crate::transport::TransportHandle;
use std::time::Duration;
use tracing::{debug, error, info};

/// Owns a session client and its transport, and runs them to completion.
pub struct EventLoop<C: Clock, T: TransportHandle + Reactor> {
    client: SessionClient<C>,
    transport: T,
}

impl<C: Clock, T: TransportHandle + Reactor> EventLoop<C, T> {
    #[must_use]
    pub fn new(client: SessionClient<C>, transport: T) -> Self {
        Self { client, transport }
    }

    #[must_use]
    pub fn client(&self) -> &SessionClient<C> {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut SessionClient<C> {
        &mut self.client
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Run until the session ends. The transport is disconnected before
    /// returning, whatever the reason.
    pub async fn run(&mut self) -> DisconnectReason {
        loop {
            let now_ms = self.client.now_ms();

            match self.client.drive(now_ms, &mut self.transport) {
                Ok(DriveOutcome::Continue) => {}
                Ok(DriveOutcome::Disconnect(reason)) => {
                    return self.finish(reason);
                }
                Err(e) => {
                    error!(error = %e, "request send failed");
                    return self.finish(DisconnectReason::TransportFailed);
                }
            }

            if !self.transport.has_descriptor() {
                if !self.transport.is_connected() {
                    return self.finish(DisconnectReason::ConnectionClosed);
                }
                continue;
            }

            // Bound the wait by the wake deadline, if one is armed. Driving
            // already handled an elapsed deadline, so saturating_sub only
            // rounds a race down to an immediate poll.
            let timeout = self
                .client
                .context()
                .wake_deadline()
                .map(|deadline| Duration::from_millis(deadline.saturating_sub(now_ms)));

            let interest = InterestSet {
                read: true,
                write: !self.transport.is_outbound_buffer_empty(),
                error: true,
            };

            let ready = match self.transport.wait_ready(interest, timeout).await {
                Ok(WaitOutcome::Ready(ready)) => ready,
                Ok(WaitOutcome::TimedOut) => continue,
                Err(e) => {
                    error!(error = %e, "readiness wait failed");
                    return self.finish(DisconnectReason::WaitFailed);
                }
            };

            if ready.error {
                debug!("error readiness on descriptor");
                self.transport.on_error(&mut self.client);
            }
            if !self.transport.has_descriptor() {
                continue;
            }

            if ready.writable {
                if let Err(e) = self.transport.on_writable() {
                    error!(error = %e, "outbound flush failed");
                    return self.finish(DisconnectReason::TransportFailed);
                }
            }
            if !self.transport.has_descriptor() {
                continue;
            }

            if ready.readable {
                if let Err(e) = self.transport.on_readable(&mut self.client) {
                    error!(error = %e, "inbound dispatch failed");
                    return self.finish(DisconnectReason::TransportFailed);
                }
            }

            // Handlers cannot reach the transport, so a handler-demanded
            // disconnect lands here.
            if let Some(reason) = self.client.take_pending_disconnect() {
                return self.finish(reason);
            }
        }
    }

    fn finish(&mut self, reason: DisconnectReason) -> DisconnectReason {
        info!(reason = %reason, "session ended");
        self.transport.disconnect();
        reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SessionConfig;
    use crate::clock::ManualClock;
    use crate::scripted::ScriptedTransport;
    use std::sync::Arc;

    fn event_loop() -> EventLoop<Arc<ManualClock>, ScriptedTransport> {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let client = SessionClient::new(Arc::clone(&clock), SessionConfig::default());
        let transport = ScriptedTransport::new(clock);
        EventLoop::new(client, transport)
    }

    #[tokio::test]
    async fn test_wait_failure_ends_session() {
        let mut event_loop = event_loop();
        event_loop.transport_mut().fail_next_wait();

        let reason = event_loop.run().await;
        assert_eq!(reason, DisconnectReason::WaitFailed);
        assert!(!event_loop.transport().is_connected());
    }

    #[tokio::test]
    async fn test_closed_transport_ends_session() {
        let mut event_loop = event_loop();
        event_loop.transport_mut().disconnect();

        let reason = event_loop.run().await;
        assert_eq!(reason, DisconnectReason::ConnectionClosed);
    }
}

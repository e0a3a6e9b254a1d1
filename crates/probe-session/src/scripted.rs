//! Deterministic scripted transport for driving the event loop in tests.
//!
//! Inbound gateway events are queued up front; each read-readiness dispatch
//! delivers exactly one of them. Outbound requests are recorded instead of
//! encoded. The readiness wait never sleeps: when the queue is empty and the
//! loop asked for a bounded wait, the shared `ManualClock` jumps forward by
//! the full timeout, so deadline-driven behavior plays out instantly.

use crate::clock::ManualClock;
use crate::error::{TransportError, TransportResult};
use crate::handler::GatewayHandler;
use crate::reactor::{BoxFuture, InterestSet, Reactor, ReadySet, WaitOutcome};
use crate::transport::TransportHandle;
use probe_core::{Instrument, Order, OrderId, OrderSide, OrderStatus};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// A scripted inbound gateway event.
#[derive(Debug, Clone)]
pub enum ScriptedEvent {
    NextValidId(OrderId),
    OrderStatus {
        order_id: OrderId,
        status: OrderStatus,
        filled: i64,
        remaining: i64,
        avg_fill_price: f64,
    },
    CurrentTime(i64),
    Error {
        id: i64,
        code: i32,
        message: String,
    },
}

/// A recorded outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum SentRequest {
    CurrentTime,
    PlaceOrder {
        order_id: OrderId,
        symbol: String,
        side: OrderSide,
        quantity: i64,
    },
    CancelOrder {
        order_id: OrderId,
    },
}

/// In-memory transport with a scripted inbound queue and a recorded
/// outbound log.
pub struct ScriptedTransport {
    clock: Arc<ManualClock>,
    inbound: VecDeque<ScriptedEvent>,
    sent: Vec<SentRequest>,
    connected: bool,
    fail_next_wait: bool,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            inbound: VecDeque::new(),
            sent: Vec::new(),
            connected: true,
            fail_next_wait: false,
        }
    }

    /// Queue an inbound event for a later read-readiness dispatch.
    pub fn push_event(&mut self, event: ScriptedEvent) {
        self.inbound.push_back(event);
    }

    /// Requests recorded so far, in send order.
    #[must_use]
    pub fn sent(&self) -> &[SentRequest] {
        &self.sent
    }

    /// Make the next readiness wait fail with an I/O error.
    pub fn fail_next_wait(&mut self) {
        self.fail_next_wait = true;
    }

    fn ensure_connected(&self) -> TransportResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(TransportError::NotConnected)
        }
    }
}

impl TransportHandle for ScriptedTransport {
    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn has_descriptor(&self) -> bool {
        self.connected
    }

    fn is_outbound_buffer_empty(&self) -> bool {
        // Sends are recorded, never buffered.
        true
    }

    fn on_readable(&mut self, handler: &mut dyn GatewayHandler) -> TransportResult<()> {
        self.ensure_connected()?;

        // One event per dispatch, mirroring one decoded message per
        // readable-readiness callback.
        match self.inbound.pop_front() {
            Some(ScriptedEvent::NextValidId(order_id)) => handler.next_valid_id(order_id),
            Some(ScriptedEvent::OrderStatus {
                order_id,
                status,
                filled,
                remaining,
                avg_fill_price,
            }) => handler.order_status(order_id, status, filled, remaining, avg_fill_price),
            Some(ScriptedEvent::CurrentTime(time)) => handler.current_time(time),
            Some(ScriptedEvent::Error { id, code, message }) => {
                handler.error(id, code, &message);
            }
            None => {}
        }
        Ok(())
    }

    fn on_writable(&mut self) -> TransportResult<()> {
        self.ensure_connected()
    }

    fn on_error(&mut self, handler: &mut dyn GatewayHandler) {
        self.connected = false;
        handler.connection_closed();
    }

    fn send_current_time_request(&mut self) -> TransportResult<()> {
        self.ensure_connected()?;
        self.sent.push(SentRequest::CurrentTime);
        Ok(())
    }

    fn send_place_order_request(
        &mut self,
        order_id: OrderId,
        instrument: &Instrument,
        order: &Order,
    ) -> TransportResult<()> {
        self.ensure_connected()?;
        self.sent.push(SentRequest::PlaceOrder {
            order_id,
            symbol: instrument.symbol.clone(),
            side: order.side,
            quantity: order.quantity,
        });
        Ok(())
    }

    fn send_cancel_order_request(&mut self, order_id: OrderId) -> TransportResult<()> {
        self.ensure_connected()?;
        self.sent.push(SentRequest::CancelOrder { order_id });
        Ok(())
    }
}

impl Reactor for ScriptedTransport {
    fn wait_ready(
        &mut self,
        interest: InterestSet,
        timeout: Option<Duration>,
    ) -> BoxFuture<'_, std::io::Result<WaitOutcome>> {
        Box::pin(async move {
            if self.fail_next_wait {
                self.fail_next_wait = false;
                return Err(std::io::Error::other("scripted wait failure"));
            }

            if interest.read && !self.inbound.is_empty() {
                return Ok(WaitOutcome::Ready(ReadySet {
                    readable: true,
                    ..ReadySet::default()
                }));
            }

            match timeout {
                Some(duration) => {
                    // Jump straight to the deadline instead of sleeping.
                    self.clock.advance(duration.as_millis() as u64);
                    Ok(WaitOutcome::TimedOut)
                }
                // An unbounded wait with nothing scripted would hang the
                // test; fail loudly instead.
                None => Err(std::io::Error::new(
                    std::io::ErrorKind::WouldBlock,
                    "no scripted events and no deadline",
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::handler::GatewayHandler;

    #[derive(Default)]
    struct Recorder {
        seen_ids: Vec<OrderId>,
        closed: bool,
    }

    impl GatewayHandler for Recorder {
        fn next_valid_id(&mut self, order_id: OrderId) {
            self.seen_ids.push(order_id);
        }

        fn connection_closed(&mut self) {
            self.closed = true;
        }
    }

    #[test]
    fn test_one_event_per_readable_dispatch() {
        let clock = Arc::new(ManualClock::new(0));
        let mut transport = ScriptedTransport::new(clock);
        transport.push_event(ScriptedEvent::NextValidId(OrderId::new(1)));
        transport.push_event(ScriptedEvent::NextValidId(OrderId::new(2)));

        let mut handler = Recorder::default();
        transport.on_readable(&mut handler).unwrap();
        assert_eq!(handler.seen_ids, vec![OrderId::new(1)]);
        transport.on_readable(&mut handler).unwrap();
        assert_eq!(handler.seen_ids, vec![OrderId::new(1), OrderId::new(2)]);
    }

    #[test]
    fn test_bounded_wait_advances_shared_clock() {
        let clock = Arc::new(ManualClock::new(1_000));
        let mut transport = ScriptedTransport::new(Arc::clone(&clock));

        let interest = InterestSet {
            read: true,
            ..InterestSet::default()
        };
        let outcome = tokio_test::block_on(
            transport.wait_ready(interest, Some(Duration::from_millis(2_000))),
        )
        .unwrap();
        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert_eq!(clock.now_ms(), 3_000);
    }

    #[test]
    fn test_error_dispatch_tears_down() {
        let clock = Arc::new(ManualClock::new(0));
        let mut transport = ScriptedTransport::new(clock);
        let mut handler = Recorder::default();

        transport.on_error(&mut handler);
        assert!(handler.closed);
        assert!(!transport.is_connected());
        assert!(transport.send_current_time_request().is_err());
    }
}

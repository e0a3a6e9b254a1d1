//! Transport handle contract consumed by the event loop.
//!
//! The wire-level details (framing, message encoding, connection handshake)
//! live behind this trait. Connection establishment is a constructor-level
//! concern of concrete transports; the trait covers the connected-lifetime
//! surface the event loop drives.

use crate::error::TransportResult;
use crate::handler::GatewayHandler;
use probe_core::{Instrument, Order, OrderId};

/// Byte-stream transport to the gateway.
pub trait TransportHandle {
    /// Tear down the connection; the descriptor becomes invalid.
    fn disconnect(&mut self);

    /// True while the connection is up.
    fn is_connected(&self) -> bool;

    /// True while the transport exposes a valid, pollable descriptor.
    /// Callbacks may tear the connection down mid-iteration, so the event
    /// loop re-checks this between dispatches.
    fn has_descriptor(&self) -> bool;

    /// True when there are no outbound bytes waiting to be flushed.
    fn is_outbound_buffer_empty(&self) -> bool;

    /// Read-readiness callback: decode available inbound data and dispatch
    /// each complete event into the handler.
    fn on_readable(&mut self, handler: &mut dyn GatewayHandler) -> TransportResult<()>;

    /// Write-readiness callback: flush the outbound buffer.
    fn on_writable(&mut self) -> TransportResult<()>;

    /// Error-readiness callback: surface the descriptor's error condition.
    /// Implementations may tear down the connection.
    fn on_error(&mut self, handler: &mut dyn GatewayHandler);

    /// Enqueue a time-sync request. Never blocks.
    fn send_current_time_request(&mut self) -> TransportResult<()>;

    /// Enqueue an order placement. Never blocks.
    fn send_place_order_request(
        &mut self,
        order_id: OrderId,
        instrument: &Instrument,
        order: &Order,
    ) -> TransportResult<()>;

    /// Enqueue a cancel for a previously placed order. Never blocks.
    fn send_cancel_order_request(&mut self, order_id: OrderId) -> TransportResult<()>;
}

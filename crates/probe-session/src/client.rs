//! Session client: request dispatcher and response correlator.
//!
//! Owns the `SessionContext` for one connection. The dispatcher side sends
//! the three scripted requests and advances the state machine as part of the
//! send; the correlator side is the `GatewayHandler` implementation that
//! interprets asynchronous responses against the current state.

use crate::clock::Clock;
use crate::context::{SessionContext, SessionState};
use crate::error::{DisconnectReason, TransportResult};
use crate::handler::GatewayHandler;
use crate::transport::TransportHandle;
use probe_core::{Instrument, Order, OrderId, OrderSide, OrderStatus, OrderType};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Gateway error code for "connectivity to the gateway has been lost".
pub const CONNECTIVITY_LOST_CODE: i32 = 1100;

fn default_ack_timeout_ms() -> u64 {
    2_000
}

fn default_idle_interval_ms() -> u64 {
    30_000
}

fn default_instrument() -> Instrument {
    Instrument::stock("IBM", "SMART", "USD")
}

fn default_order() -> Order {
    Order {
        side: OrderSide::Buy,
        order_type: OrderType::Limit,
        quantity: 1000,
        limit_price: dec!(0.01),
    }
}

/// Scripted-session parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Instrument for the scripted placement.
    #[serde(default = "default_instrument")]
    pub instrument: Instrument,
    /// Order parameters for the scripted placement.
    #[serde(default = "default_order")]
    pub order: Order,
    /// Ack window for the time-sync response (ms). Default: 2,000.
    #[serde(default = "default_ack_timeout_ms")]
    pub ack_timeout_ms: u64,
    /// Quiet interval between pings (ms). Default: 30,000.
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            instrument: default_instrument(),
            order: default_order(),
            ack_timeout_ms: default_ack_timeout_ms(),
            idle_interval_ms: default_idle_interval_ms(),
        }
    }
}

/// Outcome of one driving step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    /// Keep looping.
    Continue,
    /// End the session.
    Disconnect(DisconnectReason),
}

/// The session client for one connection.
pub struct SessionClient<C: Clock> {
    ctx: SessionContext,
    config: SessionConfig,
    clock: C,
    /// Set by the correlator when an inbound event demands disconnect;
    /// consumed by the event loop.
    pending_disconnect: Option<DisconnectReason>,
}

impl<C: Clock> SessionClient<C> {
    #[must_use]
    pub fn new(clock: C, config: SessionConfig) -> Self {
        Self {
            ctx: SessionContext::new(),
            config,
            clock,
            pending_disconnect: None,
        }
    }

    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.ctx.state()
    }

    /// Current time from the session's clock.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Take a disconnect demanded by an inbound event, if any.
    pub fn take_pending_disconnect(&mut self) -> Option<DisconnectReason> {
        self.pending_disconnect.take()
    }

    /// One driving step of the state machine.
    ///
    /// Action states send their request exactly once and transition to the
    /// corresponding awaiting state atomically; deadline-driven transitions
    /// are evaluated here, before any I/O wait in the same iteration. Idle
    /// expiry combines the transition to `Pinging` with the ping send, so
    /// exactly one ping goes out per expiry.
    pub fn drive(
        &mut self,
        now_ms: u64,
        transport: &mut dyn TransportHandle,
    ) -> TransportResult<DriveOutcome> {
        if let Some(reason) = self.pending_disconnect.take() {
            return Ok(DriveOutcome::Disconnect(reason));
        }

        match self.ctx.state() {
            SessionState::Connecting
            | SessionState::AwaitingPlaceAck
            | SessionState::AwaitingCancelAck => {}
            SessionState::PlacingOrder => self.send_place_order(transport)?,
            SessionState::Cancelling => self.send_cancel_order(transport)?,
            SessionState::Pinging => self.send_ping_request(now_ms, transport)?,
            SessionState::AwaitingPingAck => {
                if self.ctx.deadline_elapsed(now_ms) {
                    error!("no time-sync response within the ack window");
                    return Ok(DriveOutcome::Disconnect(DisconnectReason::AckTimeout));
                }
            }
            SessionState::Idle => {
                if self.ctx.deadline_elapsed(now_ms) {
                    self.ctx.set_state(SessionState::Pinging);
                    self.send_ping_request(now_ms, transport)?;
                }
            }
        }

        Ok(DriveOutcome::Continue)
    }

    /// Allocate the next order id and enqueue the scripted placement.
    fn send_place_order(&mut self, transport: &mut dyn TransportHandle) -> TransportResult<()> {
        let order_id = self.ctx.allocate_order_id();
        let order = self.config.order.clone();
        let instrument = self.config.instrument.clone();

        info!(
            order_id = %order_id,
            side = %order.side,
            quantity = order.quantity,
            symbol = %instrument.symbol,
            limit_price = %order.limit_price,
            "placing order"
        );

        self.ctx.set_state(SessionState::AwaitingPlaceAck);
        transport.send_place_order_request(order_id, &instrument, &order)
    }

    /// Enqueue a cancel for the active order. No new id is allocated.
    fn send_cancel_order(&mut self, transport: &mut dyn TransportHandle) -> TransportResult<()> {
        let Some(order_id) = self.ctx.active_order_id() else {
            warn!("cancel requested with no active order");
            self.ctx.set_state(SessionState::Pinging);
            return Ok(());
        };

        info!(order_id = %order_id, "cancelling order");

        self.ctx.set_state(SessionState::AwaitingCancelAck);
        transport.send_cancel_order_request(order_id)
    }

    /// Enqueue a time-sync request and arm the ack window.
    fn send_ping_request(
        &mut self,
        now_ms: u64,
        transport: &mut dyn TransportHandle,
    ) -> TransportResult<()> {
        info!("requesting current time");

        self.ctx.arm_ack_deadline(now_ms, self.config.ack_timeout_ms);
        self.ctx.set_state(SessionState::AwaitingPingAck);
        transport.send_current_time_request()
    }
}

impl<C: Clock> GatewayHandler for SessionClient<C> {
    fn next_valid_id(&mut self, order_id: OrderId) {
        debug!(order_id = %order_id, "order id namespace seeded");
        self.ctx.seed_order_id(order_id.as_i64());
        if self.ctx.state() == SessionState::Connecting {
            self.ctx.set_state(SessionState::PlacingOrder);
        }
    }

    fn current_time(&mut self, time: i64) {
        if self.ctx.state() != SessionState::AwaitingPingAck {
            // Late or duplicate response; not an error.
            debug!(time, "time-sync response outside the ping window, ignoring");
            return;
        }

        if let Some(gateway_time) = chrono::DateTime::from_timestamp(time, 0) {
            info!(gateway_time = %gateway_time, "time-sync response");
        } else {
            warn!(time, "time-sync response with out-of-range timestamp");
        }

        let now_ms = self.clock.now_ms();
        self.ctx.arm_idle_deadline(now_ms, self.config.idle_interval_ms);
        self.ctx.set_state(SessionState::Idle);
    }

    fn order_status(
        &mut self,
        order_id: OrderId,
        status: OrderStatus,
        filled: i64,
        remaining: i64,
        _avg_fill_price: f64,
    ) {
        if Some(order_id) != self.ctx.active_order_id() {
            return;
        }

        if self.ctx.state() == SessionState::AwaitingPlaceAck && status.is_acknowledged() {
            self.ctx.set_state(SessionState::Cancelling);
        }

        if self.ctx.state() == SessionState::AwaitingCancelAck && status.is_cancelled() {
            self.ctx.set_state(SessionState::Pinging);
        }

        info!(
            order_id = %order_id,
            status = %status,
            filled,
            remaining,
            "order status"
        );
    }

    fn error(&mut self, id: i64, code: i32, message: &str) {
        if id == -1 && code == CONNECTIVITY_LOST_CODE {
            error!(code, msg = message, "connectivity to gateway lost");
            self.pending_disconnect = Some(DisconnectReason::ConnectivityLost);
        } else {
            warn!(id, code, msg = message, "gateway error");
        }
    }
}

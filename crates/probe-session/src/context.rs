//! Session context: the mutable facts of one gateway conversation.

use probe_core::{OrderId, TickerId};
use std::fmt;

/// Connection state machine states.
///
/// Action states (`PlacingOrder`, `Cancelling`, `Pinging`) trigger an
/// outbound request on the next driving step; awaiting states and `Idle` are
/// advanced only by inbound events or deadline expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Connected, waiting for the gateway to seed the order id namespace.
    Connecting,
    /// Ready to send the scripted order placement.
    PlacingOrder,
    /// Placement sent, waiting for a working order-status event.
    AwaitingPlaceAck,
    /// Ready to cancel the active order.
    Cancelling,
    /// Cancel sent, waiting for a cancelled order-status event.
    AwaitingCancelAck,
    /// Ready to send a time-sync request.
    Pinging,
    /// Time-sync sent, waiting for the response within the ack window.
    AwaitingPingAck,
    /// Quiet until the idle deadline, then ping again.
    Idle,
}

impl SessionState {
    /// True for states whose driving step sends a request.
    #[must_use]
    pub fn is_action(&self) -> bool {
        matches!(self, Self::PlacingOrder | Self::Cancelling | Self::Pinging)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "Connecting",
            Self::PlacingOrder => "PlacingOrder",
            Self::AwaitingPlaceAck => "AwaitingPlaceAck",
            Self::Cancelling => "Cancelling",
            Self::AwaitingCancelAck => "AwaitingCancelAck",
            Self::Pinging => "Pinging",
            Self::AwaitingPingAck => "AwaitingPingAck",
            Self::Idle => "Idle",
        };
        write!(f, "{s}")
    }
}

/// Mutable record for one connection, owned exclusively by the event loop.
///
/// `wake_deadline` is a single field with two state-dependent meanings: the
/// ack window while in `AwaitingPingAck` and the sleep-until time while in
/// `Idle`. Arming always overwrites, so at most one deadline is pending for
/// the whole session.
#[derive(Debug)]
pub struct SessionContext {
    state: SessionState,
    next_order_id: i64,
    active_order_id: Option<OrderId>,
    next_ticker_id: i64,
    wake_deadline: Option<u64>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SessionState::Connecting,
            next_order_id: 1,
            active_order_id: None,
            next_ticker_id: 1,
            wake_deadline: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Order id the next placement will use.
    #[must_use]
    pub fn next_order_id(&self) -> i64 {
        self.next_order_id
    }

    /// The single in-flight order id, once a placement has been sent.
    #[must_use]
    pub fn active_order_id(&self) -> Option<OrderId> {
        self.active_order_id
    }

    #[must_use]
    pub fn next_ticker_id(&self) -> i64 {
        self.next_ticker_id
    }

    /// Pending wake-up deadline in epoch milliseconds, if any.
    #[must_use]
    pub fn wake_deadline(&self) -> Option<u64> {
        self.wake_deadline
    }

    /// True once the pending deadline has been reached.
    #[must_use]
    pub fn deadline_elapsed(&self, now_ms: u64) -> bool {
        self.wake_deadline.is_some_and(|deadline| deadline <= now_ms)
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    /// Allocate the next order id and mark it active.
    pub(crate) fn allocate_order_id(&mut self) -> OrderId {
        let id = OrderId::new(self.next_order_id);
        self.next_order_id += 1;
        self.active_order_id = Some(id);
        id
    }

    /// Seed the order id namespace from the gateway-assigned value.
    ///
    /// Fast-forwards only; the counter never regresses, keeping allocated
    /// ids monotonically non-decreasing across the session.
    pub(crate) fn seed_order_id(&mut self, order_id: i64) {
        if order_id > self.next_order_id {
            self.next_order_id = order_id;
        }
    }

    /// Allocate the next ticker id (independent namespace from order ids).
    /// Market data subscriptions are not part of the scripted session, but
    /// handlers that issue them draw ids from here.
    pub fn allocate_ticker_id(&mut self) -> TickerId {
        let id = TickerId::new(self.next_ticker_id);
        self.next_ticker_id += 1;
        id
    }

    /// Arm the ack window: the time-sync response must arrive by this time.
    pub(crate) fn arm_ack_deadline(&mut self, now_ms: u64, ack_timeout_ms: u64) {
        self.wake_deadline = Some(now_ms + ack_timeout_ms);
    }

    /// Arm the idle sleep: stay quiet until this time, then ping again.
    pub(crate) fn arm_idle_deadline(&mut self, now_ms: u64, idle_interval_ms: u64) {
        self.wake_deadline = Some(now_ms + idle_interval_ms);
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_defaults() {
        let ctx = SessionContext::new();
        assert_eq!(ctx.state(), SessionState::Connecting);
        assert_eq!(ctx.next_order_id(), 1);
        assert_eq!(ctx.next_ticker_id(), 1);
        assert!(ctx.active_order_id().is_none());
        assert!(ctx.wake_deadline().is_none());
    }

    #[test]
    fn test_allocate_order_id_increments_and_activates() {
        let mut ctx = SessionContext::new();
        let first = ctx.allocate_order_id();
        assert_eq!(first, OrderId::new(1));
        assert_eq!(ctx.active_order_id(), Some(first));
        assert_eq!(ctx.next_order_id(), 2);

        let second = ctx.allocate_order_id();
        assert_eq!(second, OrderId::new(2));
        assert_eq!(ctx.active_order_id(), Some(second));
    }

    #[test]
    fn test_seed_fast_forwards() {
        let mut ctx = SessionContext::new();
        ctx.seed_order_id(5);
        assert_eq!(ctx.allocate_order_id(), OrderId::new(5));
    }

    #[test]
    fn test_seed_never_regresses() {
        let mut ctx = SessionContext::new();
        ctx.seed_order_id(10);
        ctx.seed_order_id(3);
        assert_eq!(ctx.next_order_id(), 10);
    }

    #[test]
    fn test_ticker_ids_are_independent_of_order_ids() {
        let mut ctx = SessionContext::new();
        ctx.seed_order_id(100);
        assert_eq!(ctx.allocate_ticker_id(), TickerId::new(1));
        assert_eq!(ctx.allocate_ticker_id(), TickerId::new(2));
        assert_eq!(ctx.next_order_id(), 100);
    }

    #[test]
    fn test_deadline_elapsed_boundary() {
        let mut ctx = SessionContext::new();
        assert!(!ctx.deadline_elapsed(u64::MAX));

        ctx.arm_ack_deadline(1_000, 2_000);
        assert!(!ctx.deadline_elapsed(2_999));
        assert!(ctx.deadline_elapsed(3_000));
        assert!(ctx.deadline_elapsed(3_001));
    }

    #[test]
    fn test_arming_overwrites_single_deadline() {
        let mut ctx = SessionContext::new();
        ctx.arm_ack_deadline(1_000, 2_000);
        assert_eq!(ctx.wake_deadline(), Some(3_000));

        // Idle sleep replaces the ack window; only one deadline is ever pending.
        ctx.arm_idle_deadline(4_000, 30_000);
        assert_eq!(ctx.wake_deadline(), Some(34_000));
    }

    #[test]
    fn test_action_state_predicate() {
        assert!(SessionState::PlacingOrder.is_action());
        assert!(SessionState::Cancelling.is_action());
        assert!(SessionState::Pinging.is_action());
        assert!(!SessionState::AwaitingPlaceAck.is_action());
        assert!(!SessionState::Idle.is_action());
        assert!(!SessionState::Connecting.is_action());
    }
}

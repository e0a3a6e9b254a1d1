//! Protocol-handler capability interface.
//!
//! The transport layer invokes these methods as it decodes inbound gateway
//! events. Every method has a default no-op body, so an implementor overrides
//! only the events it cares about; the session client overrides order status,
//! time sync, order id seeding, and errors, and inherits the rest.

use probe_core::{Instrument, Order, OrderId, OrderStatus, TickerId};

/// Inbound-event surface of the gateway protocol.
#[allow(unused_variables)]
pub trait GatewayHandler {
    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    /// Gateway-assigned starting point for the order id namespace.
    fn next_valid_id(&mut self, order_id: OrderId) {}

    /// Response to a time-sync request, in epoch seconds.
    fn current_time(&mut self, time: i64) {}

    /// Error or notice; `id == -1` marks connection-level notifications.
    fn error(&mut self, id: i64, code: i32, message: &str) {}

    /// The transport observed the connection closing.
    fn connection_closed(&mut self) {}

    // ------------------------------------------------------------------
    // Orders and executions
    // ------------------------------------------------------------------

    /// Lifecycle update for an order previously placed on this session.
    fn order_status(
        &mut self,
        order_id: OrderId,
        status: OrderStatus,
        filled: i64,
        remaining: i64,
        avg_fill_price: f64,
    ) {
    }

    fn open_order(&mut self, order_id: OrderId, instrument: &Instrument, order: &Order) {}

    fn open_order_end(&mut self) {}

    fn exec_details(&mut self, req_id: i64, instrument: &Instrument) {}

    fn exec_details_end(&mut self, req_id: i64) {}

    fn commission_report(&mut self, exec_id: &str, commission: f64, currency: &str) {}

    // ------------------------------------------------------------------
    // Market data
    // ------------------------------------------------------------------

    fn tick_price(&mut self, ticker_id: TickerId, field: i32, price: f64) {}

    fn tick_size(&mut self, ticker_id: TickerId, field: i32, size: i64) {}

    fn tick_generic(&mut self, ticker_id: TickerId, tick_type: i32, value: f64) {}

    fn tick_string(&mut self, ticker_id: TickerId, tick_type: i32, value: &str) {}

    fn tick_option_computation(
        &mut self,
        ticker_id: TickerId,
        tick_type: i32,
        implied_vol: f64,
        delta: f64,
        opt_price: f64,
    ) {
    }

    fn tick_efp(&mut self, ticker_id: TickerId, tick_type: i32, basis_points: f64) {}

    fn tick_snapshot_end(&mut self, req_id: i64) {}

    fn market_data_type(&mut self, req_id: i64, market_data_type: i32) {}

    fn update_mkt_depth(
        &mut self,
        ticker_id: TickerId,
        position: i32,
        operation: i32,
        side: i32,
        price: f64,
        size: i64,
    ) {
    }

    fn update_mkt_depth_l2(
        &mut self,
        ticker_id: TickerId,
        position: i32,
        market_maker: &str,
        operation: i32,
        side: i32,
        price: f64,
        size: i64,
    ) {
    }

    fn realtime_bar(
        &mut self,
        req_id: i64,
        time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: i64,
    ) {
    }

    fn historical_data(
        &mut self,
        req_id: i64,
        date: &str,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: i64,
    ) {
    }

    fn fundamental_data(&mut self, req_id: i64, data: &str) {}

    // ------------------------------------------------------------------
    // Account and positions
    // ------------------------------------------------------------------

    fn update_account_value(&mut self, key: &str, value: &str, currency: &str, account: &str) {}

    fn update_portfolio(
        &mut self,
        instrument: &Instrument,
        position: i64,
        market_price: f64,
        market_value: f64,
    ) {
    }

    fn update_account_time(&mut self, timestamp: &str) {}

    fn account_download_end(&mut self, account: &str) {}

    fn account_summary(&mut self, req_id: i64, account: &str, tag: &str, value: &str, currency: &str) {
    }

    fn account_summary_end(&mut self, req_id: i64) {}

    fn position(&mut self, account: &str, instrument: &Instrument, position: i64, avg_cost: f64) {}

    fn position_end(&mut self) {}

    fn managed_accounts(&mut self, accounts: &str) {}

    // ------------------------------------------------------------------
    // Contract reference data
    // ------------------------------------------------------------------

    fn contract_details(&mut self, req_id: i64, instrument: &Instrument) {}

    fn bond_contract_details(&mut self, req_id: i64, instrument: &Instrument) {}

    fn contract_details_end(&mut self, req_id: i64) {}

    // ------------------------------------------------------------------
    // Scanner, news, display groups
    // ------------------------------------------------------------------

    fn scanner_parameters(&mut self, xml: &str) {}

    fn scanner_data(
        &mut self,
        req_id: i64,
        rank: i32,
        instrument: &Instrument,
        distance: &str,
        benchmark: &str,
    ) {
    }

    fn scanner_data_end(&mut self, req_id: i64) {}

    fn update_news_bulletin(&mut self, msg_id: i32, msg_type: i32, message: &str, origin_exchange: &str) {
    }

    fn display_group_list(&mut self, req_id: i64, groups: &str) {}

    fn display_group_updated(&mut self, req_id: i64, contract_info: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;
    impl GatewayHandler for Silent {}

    #[test]
    fn test_default_handlers_are_no_ops() {
        // An empty impl satisfies the whole surface; only the events a client
        // cares about need overriding.
        let mut handler = Silent;
        handler.next_valid_id(OrderId::new(1));
        handler.current_time(1_700_000_000);
        handler.tick_price(TickerId::new(1), 4, 101.5);
        handler.managed_accounts("DU12345");
        handler.position_end();
        handler.error(2, 321, "informational");
    }
}

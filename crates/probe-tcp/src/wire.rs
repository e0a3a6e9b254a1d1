//! Wire message types: newline-delimited JSON, internally tagged.
//!
//! Requests flow client-to-gateway, events gateway-to-client. Each message is
//! one JSON object per line with a camel-cased `type` tag. Real gateway
//! framing and authentication are out of scope; the hello line carrying the
//! client id is the whole handshake.

use probe_core::{Instrument, Order, OrderId, OrderStatus, TickerId};
use probe_session::GatewayHandler;
use serde::{Deserialize, Serialize};

/// Client-to-gateway request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    /// Connect-time handshake line.
    Hello { client_id: i64 },
    /// Time-sync request.
    CurrentTime,
    PlaceOrder {
        order_id: OrderId,
        instrument: Instrument,
        order: Order,
    },
    CancelOrder { order_id: OrderId },
}

/// Gateway-to-client event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Event {
    NextValidId {
        order_id: OrderId,
    },
    CurrentTime {
        time: i64,
    },
    Error {
        id: i64,
        code: i32,
        message: String,
    },
    OrderStatus {
        order_id: OrderId,
        status: OrderStatus,
        filled: i64,
        remaining: i64,
        avg_fill_price: f64,
    },
    OpenOrder {
        order_id: OrderId,
        instrument: Instrument,
        order: Order,
    },
    OpenOrderEnd,
    TickPrice {
        ticker_id: TickerId,
        field: i32,
        price: f64,
    },
    TickSize {
        ticker_id: TickerId,
        field: i32,
        size: i64,
    },
    TickString {
        ticker_id: TickerId,
        tick_type: i32,
        value: String,
    },
    ManagedAccounts {
        accounts: String,
    },
    Position {
        account: String,
        instrument: Instrument,
        position: i64,
        avg_cost: f64,
    },
    PositionEnd,
    AccountSummary {
        req_id: i64,
        account: String,
        tag: String,
        value: String,
        currency: String,
    },
    AccountSummaryEnd {
        req_id: i64,
    },
    ContractDetails {
        req_id: i64,
        instrument: Instrument,
    },
    ContractDetailsEnd {
        req_id: i64,
    },
}

/// Route a decoded event to its handler method.
pub fn dispatch_event(event: Event, handler: &mut dyn GatewayHandler) {
    match event {
        Event::NextValidId { order_id } => handler.next_valid_id(order_id),
        Event::CurrentTime { time } => handler.current_time(time),
        Event::Error { id, code, message } => handler.error(id, code, &message),
        Event::OrderStatus {
            order_id,
            status,
            filled,
            remaining,
            avg_fill_price,
        } => handler.order_status(order_id, status, filled, remaining, avg_fill_price),
        Event::OpenOrder {
            order_id,
            instrument,
            order,
        } => handler.open_order(order_id, &instrument, &order),
        Event::OpenOrderEnd => handler.open_order_end(),
        Event::TickPrice {
            ticker_id,
            field,
            price,
        } => handler.tick_price(ticker_id, field, price),
        Event::TickSize {
            ticker_id,
            field,
            size,
        } => handler.tick_size(ticker_id, field, size),
        Event::TickString {
            ticker_id,
            tick_type,
            value,
        } => handler.tick_string(ticker_id, tick_type, &value),
        Event::ManagedAccounts { accounts } => handler.managed_accounts(&accounts),
        Event::Position {
            account,
            instrument,
            position,
            avg_cost,
        } => handler.position(&account, &instrument, position, avg_cost),
        Event::PositionEnd => handler.position_end(),
        Event::AccountSummary {
            req_id,
            account,
            tag,
            value,
            currency,
        } => handler.account_summary(req_id, &account, &tag, &value, &currency),
        Event::AccountSummaryEnd { req_id } => handler.account_summary_end(req_id),
        Event::ContractDetails { req_id, instrument } => {
            handler.contract_details(req_id, &instrument);
        }
        Event::ContractDetailsEnd { req_id } => handler.contract_details_end(req_id),
    }
}

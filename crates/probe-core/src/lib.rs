//! Opaque domain value objects for the gateway probe.
//!
//! This crate provides the value types the session core passes through
//! without interpreting:
//! - `Instrument`: tradable instrument description
//! - `Order`: fixed-shape order parameters
//! - `OrderStatus`: gateway-reported order lifecycle status
//! - `OrderId`, `TickerId`: request identifier namespaces

pub mod error;
pub mod instrument;
pub mod order;

pub use error::{CoreError, Result};
pub use instrument::{Instrument, SecurityType};
pub use order::{Order, OrderId, OrderSide, OrderStatus, OrderType, TickerId};

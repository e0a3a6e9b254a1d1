//! Error types for probe-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Invalid limit price: {0}")]
    InvalidPrice(String),

    #[error("Unknown order status: {0}")]
    UnknownOrderStatus(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

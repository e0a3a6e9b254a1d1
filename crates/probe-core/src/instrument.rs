//! Instrument description passed through to the gateway unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Security type of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityType {
    #[serde(rename = "STK")]
    Stock,
    #[serde(rename = "FUT")]
    Future,
    #[serde(rename = "CASH")]
    Cash,
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stock => write!(f, "STK"),
            Self::Future => write!(f, "FUT"),
            Self::Cash => write!(f, "CASH"),
        }
    }
}

/// A tradable instrument.
///
/// The session core never interprets these fields; they are carried into
/// place-order requests as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Ticker symbol (e.g., "IBM").
    pub symbol: String,
    /// Security type.
    pub security_type: SecurityType,
    /// Destination exchange (e.g., "SMART").
    pub exchange: String,
    /// Quote currency (e.g., "USD").
    pub currency: String,
}

impl Instrument {
    /// Create a stock instrument.
    #[must_use]
    pub fn stock(symbol: &str, exchange: &str, currency: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            security_type: SecurityType::Stock,
            exchange: exchange.to_string(),
            currency: currency.to_string(),
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}/{}",
            self.symbol, self.security_type, self.exchange, self.currency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_constructor() {
        let inst = Instrument::stock("IBM", "SMART", "USD");
        assert_eq!(inst.symbol, "IBM");
        assert_eq!(inst.security_type, SecurityType::Stock);
        assert_eq!(inst.exchange, "SMART");
        assert_eq!(inst.currency, "USD");
    }

    #[test]
    fn test_security_type_wire_names() {
        let json = serde_json::to_string(&SecurityType::Stock).unwrap();
        assert_eq!(json, "\"STK\"");

        let parsed: SecurityType = serde_json::from_str("\"FUT\"").unwrap();
        assert_eq!(parsed, SecurityType::Future);
    }

    #[test]
    fn test_instrument_display() {
        let inst = Instrument::stock("IBM", "SMART", "USD");
        assert_eq!(inst.to_string(), "IBM STK SMART/USD");
    }
}

//! TCP gateway transport: line-delimited JSON over `tokio::net::TcpStream`.

pub mod transport;
pub mod wire;

pub use transport::TcpTransport;
pub use wire::{dispatch_event, Event, Request};

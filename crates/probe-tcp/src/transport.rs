//! Non-blocking TCP transport implementing the session's transport and
//! reactor contracts.
//!
//! Outbound requests are encoded into a byte buffer and flushed on
//! write-readiness; read-readiness drains the socket, splits complete lines,
//! and dispatches each decoded event into the handler. Readiness itself comes
//! from `TcpStream::ready`, bounded by `tokio::time::timeout`.

use crate::wire::{dispatch_event, Event, Request};
use probe_core::{Instrument, Order, OrderId};
use probe_session::{
    BoxFuture, GatewayHandler, InterestSet, Reactor, ReadySet, TransportError, TransportHandle,
    TransportResult, WaitOutcome,
};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout as bounded;
use tracing::{debug, info, warn};

const READ_CHUNK: usize = 4096;

/// One gateway connection.
pub struct TcpTransport {
    stream: Option<TcpStream>,
    inbound: Vec<u8>,
    outbound: Vec<u8>,
}

impl TcpTransport {
    /// Connect and send the hello line. An empty host means loopback.
    pub async fn connect(host: &str, port: u16, client_id: i64) -> TransportResult<Self> {
        let host = if host.is_empty() { "127.0.0.1" } else { host };

        let mut stream = TcpStream::connect((host, port))
            .await
            .map_err(|e| TransportError::ConnectFailed(format!("{host}:{port}: {e}")))?;

        let hello = encode_line(&Request::Hello { client_id })?;
        stream
            .write_all(&hello)
            .await
            .map_err(|e| TransportError::ConnectFailed(format!("hello send: {e}")))?;

        info!(host, port, client_id, "connected to gateway");

        Ok(Self {
            stream: Some(stream),
            inbound: Vec::new(),
            outbound: Vec::new(),
        })
    }

    fn enqueue(&mut self, request: &Request) -> TransportResult<()> {
        if self.stream.is_none() {
            return Err(TransportError::NotConnected);
        }
        let line = encode_line(request)?;
        self.outbound.extend_from_slice(&line);
        Ok(())
    }

    /// Split complete lines off the inbound buffer and dispatch each decoded
    /// event. Stops early if a dispatched event tears the connection down.
    fn dispatch_lines(&mut self, handler: &mut dyn GatewayHandler) -> TransportResult<()> {
        while let Some(newline) = self.inbound.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.inbound.drain(..=newline).collect();
            let line = &line[..line.len() - 1];
            if line.is_empty() {
                continue;
            }

            let event: Event = serde_json::from_slice(line)?;
            debug!(?event, "gateway event");
            dispatch_event(event, handler);

            if self.stream.is_none() {
                break;
            }
        }
        Ok(())
    }
}

fn encode_line(request: &Request) -> TransportResult<Vec<u8>> {
    let mut line = serde_json::to_vec(request)?;
    line.push(b'\n');
    Ok(line)
}

impl TransportHandle for TcpTransport {
    fn disconnect(&mut self) {
        if self.stream.take().is_some() {
            info!("disconnected from gateway");
        }
        self.outbound.clear();
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn has_descriptor(&self) -> bool {
        self.stream.is_some()
    }

    fn is_outbound_buffer_empty(&self) -> bool {
        self.outbound.is_empty()
    }

    fn on_readable(&mut self, handler: &mut dyn GatewayHandler) -> TransportResult<()> {
        loop {
            let Some(stream) = self.stream.as_ref() else {
                return Ok(());
            };

            let mut chunk = [0u8; READ_CHUNK];
            match stream.try_read(&mut chunk) {
                Ok(0) => {
                    // Peer hangup. Dispatch what already arrived, then close.
                    self.dispatch_lines(handler)?;
                    self.disconnect();
                    handler.connection_closed();
                    return Ok(());
                }
                Ok(n) => self.inbound.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(e.into()),
            }
        }
        self.dispatch_lines(handler)
    }

    fn on_writable(&mut self) -> TransportResult<()> {
        let Some(stream) = self.stream.as_ref() else {
            return Ok(());
        };

        let mut written = 0;
        while written < self.outbound.len() {
            match stream.try_write(&self.outbound[written..]) {
                Ok(n) => written += n,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    self.outbound.drain(..written);
                    return Err(e.into());
                }
            }
        }
        self.outbound.drain(..written);
        Ok(())
    }

    fn on_error(&mut self, handler: &mut dyn GatewayHandler) {
        if let Some(stream) = self.stream.as_ref() {
            match stream.take_error() {
                Ok(Some(e)) => warn!(error = %e, "socket error condition"),
                Ok(None) => warn!("peer closed the connection"),
                Err(e) => warn!(error = %e, "could not read socket error condition"),
            }
        }
        self.disconnect();
        handler.connection_closed();
    }

    fn send_current_time_request(&mut self) -> TransportResult<()> {
        self.enqueue(&Request::CurrentTime)
    }

    fn send_place_order_request(
        &mut self,
        order_id: OrderId,
        instrument: &Instrument,
        order: &Order,
    ) -> TransportResult<()> {
        self.enqueue(&Request::PlaceOrder {
            order_id,
            instrument: instrument.clone(),
            order: order.clone(),
        })
    }

    fn send_cancel_order_request(&mut self, order_id: OrderId) -> TransportResult<()> {
        self.enqueue(&Request::CancelOrder { order_id })
    }
}

impl Reactor for TcpTransport {
    fn wait_ready(
        &mut self,
        interest: InterestSet,
        timeout: Option<Duration>,
    ) -> BoxFuture<'_, std::io::Result<WaitOutcome>> {
        Box::pin(async move {
            let Some(stream) = self.stream.as_ref() else {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotConnected,
                    "no descriptor to wait on",
                ));
            };

            let native = match (interest.read, interest.write) {
                (_, false) => tokio::io::Interest::READABLE,
                (false, true) => tokio::io::Interest::WRITABLE,
                (true, true) => tokio::io::Interest::READABLE | tokio::io::Interest::WRITABLE,
            };

            let wait = stream.ready(native);
            let ready = match timeout {
                Some(duration) => match bounded(duration, wait).await {
                    Ok(ready) => ready?,
                    Err(_) => return Ok(WaitOutcome::TimedOut),
                },
                None => wait.await?,
            };

            // Closed half-connections stand in for descriptor error
            // conditions.
            Ok(WaitOutcome::Ready(ReadySet {
                readable: ready.is_readable() || ready.is_read_closed(),
                writable: ready.is_writable(),
                error: interest.error && (ready.is_read_closed() || ready.is_write_closed()),
            }))
        })
    }
}

//! Loopback-socket exercises for the TCP transport.

use probe_core::{OrderId, TickerId};
use probe_session::{
    GatewayHandler, InterestSet, Reactor, TransportHandle, WaitOutcome,
};
use probe_tcp::TcpTransport;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Default)]
struct Recorder {
    seeded: Vec<OrderId>,
    times: Vec<i64>,
    ticks: Vec<(TickerId, f64)>,
    closed: bool,
}

impl GatewayHandler for Recorder {
    fn next_valid_id(&mut self, order_id: OrderId) {
        self.seeded.push(order_id);
    }

    fn current_time(&mut self, time: i64) {
        self.times.push(time);
    }

    fn tick_price(&mut self, ticker_id: TickerId, _field: i32, price: f64) {
        self.ticks.push((ticker_id, price));
    }

    fn connection_closed(&mut self) {
        self.closed = true;
    }
}

async fn connect_pair(client_id: i64) -> (TcpTransport, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let (transport, accepted) =
        tokio::join!(TcpTransport::connect("", port, client_id), listener.accept());
    let (server, _) = accepted.unwrap();
    (transport.unwrap(), server)
}

async fn read_line(server: &mut TcpStream) -> String {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        server.read_exact(&mut byte).await.unwrap();
        if byte[0] == b'\n' {
            break;
        }
        line.push(byte[0]);
    }
    String::from_utf8(line).unwrap()
}

#[tokio::test]
async fn test_connect_sends_hello_line() {
    let (transport, mut server) = connect_pair(7).await;
    assert!(transport.is_connected());
    assert!(transport.is_outbound_buffer_empty());

    let hello = read_line(&mut server).await;
    let json: serde_json::Value = serde_json::from_str(&hello).unwrap();
    assert_eq!(json["type"], "hello");
    assert_eq!(json["clientId"], 7);
}

#[tokio::test]
async fn test_readiness_read_dispatches_decoded_events() {
    let (mut transport, mut server) = connect_pair(1).await;
    let _ = read_line(&mut server).await;

    // Two events in one burst; a single readable dispatch handles both.
    server
        .write_all(
            b"{\"type\":\"nextValidId\",\"orderId\":5}\n\
              {\"type\":\"tickPrice\",\"tickerId\":2,\"field\":4,\"price\":101.5}\n",
        )
        .await
        .unwrap();

    let interest = InterestSet {
        read: true,
        error: true,
        ..InterestSet::default()
    };
    let outcome = transport
        .wait_ready(interest, Some(Duration::from_secs(5)))
        .await
        .unwrap();
    let ready = match outcome {
        WaitOutcome::Ready(ready) => ready,
        WaitOutcome::TimedOut => panic!("expected readiness"),
    };
    assert!(ready.readable);

    let mut handler = Recorder::default();
    transport.on_readable(&mut handler).unwrap();
    assert_eq!(handler.seeded, vec![OrderId::new(5)]);
    assert_eq!(handler.ticks, vec![(TickerId::new(2), 101.5)]);
}

#[tokio::test]
async fn test_sends_are_buffered_until_write_readiness() {
    let (mut transport, mut server) = connect_pair(1).await;
    let _ = read_line(&mut server).await;

    transport.send_current_time_request().unwrap();
    transport.send_cancel_order_request(OrderId::new(3)).unwrap();
    assert!(!transport.is_outbound_buffer_empty());

    let interest = InterestSet {
        read: true,
        write: true,
        error: true,
    };
    let outcome = transport
        .wait_ready(interest, Some(Duration::from_secs(5)))
        .await
        .unwrap();
    assert!(matches!(outcome, WaitOutcome::Ready(r) if r.writable));

    transport.on_writable().unwrap();
    assert!(transport.is_outbound_buffer_empty());

    let first: serde_json::Value = serde_json::from_str(&read_line(&mut server).await).unwrap();
    assert_eq!(first["type"], "currentTime");
    let second: serde_json::Value = serde_json::from_str(&read_line(&mut server).await).unwrap();
    assert_eq!(second["type"], "cancelOrder");
    assert_eq!(second["orderId"], 3);
}

#[tokio::test]
async fn test_wait_times_out_when_gateway_is_silent() {
    let (mut transport, mut server) = connect_pair(1).await;
    let _ = read_line(&mut server).await;

    let interest = InterestSet {
        read: true,
        error: true,
        ..InterestSet::default()
    };
    let outcome = transport
        .wait_ready(interest, Some(Duration::from_millis(50)))
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::TimedOut);
}

#[tokio::test]
async fn test_peer_hangup_closes_transport() {
    let (mut transport, mut server) = connect_pair(1).await;
    let _ = read_line(&mut server).await;
    drop(server);

    let interest = InterestSet {
        read: true,
        error: true,
        ..InterestSet::default()
    };
    let outcome = transport
        .wait_ready(interest, Some(Duration::from_secs(5)))
        .await
        .unwrap();
    let ready = match outcome {
        WaitOutcome::Ready(ready) => ready,
        WaitOutcome::TimedOut => panic!("expected readiness"),
    };
    assert!(ready.readable || ready.error);

    let mut handler = Recorder::default();
    if ready.error {
        transport.on_error(&mut handler);
    } else {
        transport.on_readable(&mut handler).unwrap();
    }
    assert!(handler.closed);
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_sending_after_disconnect_fails() {
    let (mut transport, mut server) = connect_pair(1).await;
    let _ = read_line(&mut server).await;

    transport.disconnect();
    assert!(!transport.has_descriptor());
    assert!(transport.send_current_time_request().is_err());
}

//! Gateway probe - entry point.
//!
//! Connects to the gateway, runs the scripted place/cancel/ping session to
//! completion, and reports why it ended.

use anyhow::Result;
use clap::Parser;
use probe_cli::AppConfig;
use probe_session::{EventLoop, SessionClient, SystemClock};
use probe_tcp::TcpTransport;
use tracing::info;

/// Single-connection trading-gateway probe
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via PROBE_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Gateway host; overrides the config file. Empty means loopback.
    #[arg(long)]
    host: Option<String>,

    /// Gateway port; overrides the config file.
    #[arg(long)]
    port: Option<u16>,

    /// Client id for the connect handshake; overrides the config file.
    #[arg(long)]
    client_id: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    probe_cli::init_logging();

    info!("Starting gateway probe v{}", env!("CARGO_PKG_VERSION"));

    let config_path = args
        .config
        .or_else(|| std::env::var("PROBE_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");

    let mut config = AppConfig::load(&config_path)?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(client_id) = args.client_id {
        config.client_id = client_id;
    }

    info!(
        host = %config.host,
        port = config.port,
        client_id = config.client_id,
        instrument = %config.session.instrument,
        order = %config.session.order,
        "Configuration loaded"
    );

    let transport = TcpTransport::connect(&config.host, config.port, config.client_id).await?;
    let client = SessionClient::new(SystemClock, config.session);
    let mut event_loop = EventLoop::new(client, transport);

    let reason = event_loop.run().await;
    info!(reason = %reason, "Session complete");

    Ok(())
}

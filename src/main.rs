//! api.met.no forwarding proxy.
//!
//! ```text
//!     Browser                    ┌──────────────────────────────────────┐
//!     ───── GET /path?query ────▶│ server → handler → request → client  │──▶ api.met.no
//!     ◀──── + CORS, Cache ───────│        ◀─ response ◀────────────────│◀──
//!                                └──────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use met_no_proxy::config::loader::load_config;
use met_no_proxy::config::{LogFormat, ProxyConfig};
use met_no_proxy::lifecycle::signals::shutdown_on_signal;
use met_no_proxy::observability::{logging, metrics};
use met_no_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "met-no-proxy")]
#[command(about = "Proxy api.met.no so that it can be used from web pages", long_about = None)]
struct Cli {
    /// TOML configuration file. Without one, built-in defaults are used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configured bind port.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Log output format, overriding the configured one.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(port) = cli.port {
        let mut addr: SocketAddr = config.listener.bind_address.parse()?;
        addr.set_port(port);
        config.listener.bind_address = addr.to_string();
    }
    if let Some(format) = cli.log_format {
        config.observability.log_format = format;
    }

    logging::init(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        "met-no-proxy starting"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown));

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

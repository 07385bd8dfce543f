use std::path::PathBuf;

use clap::Parser;

use intercept_proxy::config::{load_config, ProxyConfig};
use intercept_proxy::http::ProxyServer;
use intercept_proxy::lifecycle::shutdown_signal;
use intercept_proxy::net::Listener;
use intercept_proxy::observability::init_logging;

#[derive(Parser, Debug)]
#[command(name = "intercept-proxy", version)]
#[command(about = "Debug proxy that answers the OpenClash status endpoint with 403 and relays everything else")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TCP port to listen on [default: 8091]
    #[arg(long)]
    listen_port: Option<u16>,

    /// Upstream host [default: 192.168.110.45]
    #[arg(long)]
    upstream_host: Option<String>,

    /// Upstream port [default: 80]
    #[arg(long)]
    upstream_port: Option<u16>,

    /// Request target prefix answered with 403
    #[arg(long)]
    intercept_prefix: Option<String>,

    /// Log filter, e.g. "debug" (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Command-line values win over the file and the defaults.
    fn apply(&self, config: &mut ProxyConfig) {
        if let Some(port) = self.listen_port {
            config.listen_port = port;
        }
        if let Some(host) = &self.upstream_host {
            config.upstream_host = host.clone();
        }
        if let Some(port) = self.upstream_port {
            config.upstream_port = port;
        }
        if let Some(prefix) = &self.intercept_prefix {
            config.intercept_prefix = prefix.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), |config| cli.apply(config))?;

    init_logging(&config.observability);
    tracing::info!("intercept-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        listen_port = config.listen_port,
        upstream = %format!("{}:{}", config.upstream_host, config.upstream_port),
        intercept_prefix = %config.intercept_prefix,
        extra_rules = config.rules.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let server = ProxyServer::new(&config)?;
    let listener = Listener::bind(&config).await?;

    tokio::select! {
        _ = server.run(listener) => {}
        _ = shutdown_signal() => {}
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

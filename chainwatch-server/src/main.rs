//! Chainwatch Server - Headless Monitor Daemon
//!
//! - Polls every configured account on every chain through prioritized,
//!   failover-protected RPC endpoints
//! - Refreshes USD prices on its own interval
//! - Logs a portfolio snapshot after each poll cycle
//!
//! Environment:
//! - `CHAINWATCH_CONFIG` - config file path (default: `<data dir>/chainwatch/config.json`)
//! - `CHAINWATCH_METRICS_ADDR` - serve Prometheus metrics on this address
//! - `RUST_LOG` - log filter (default: `info`)

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod report;

use chainwatch_core::modules::config;
use chainwatch_core::poller::Poller;
use chainwatch_core::pricing::CoinGeckoOracle;
use chainwatch_core::rpc::EvmJsonRpcClient;
use chainwatch_core::MonitorSession;

const METRICS_ADDR_ENV: &str = "CHAINWATCH_METRICS_ADDR";
const CONFIG_PATH_ENV: &str = "CHAINWATCH_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => PathBuf::from(path),
        None => config::default_config_path()?,
    };
    let monitor_config = config::load_config_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!(
        "Chainwatch starting: {} chain(s), {} account(s), config {}",
        monitor_config.chains.len(),
        monitor_config.accounts.len(),
        config_path.display()
    );
    if monitor_config.chains.is_empty() || monitor_config.accounts.is_empty() {
        tracing::warn!("Nothing to monitor; add chains and accounts to the config file");
    }

    if let Ok(addr) = std::env::var(METRICS_ADDR_ENV) {
        let addr: SocketAddr =
            addr.parse().with_context(|| format!("Invalid {METRICS_ADDR_ENV}: {addr}"))?;
        install_metrics_exporter(addr)?;
        info!("Prometheus metrics on http://{}/metrics", addr);
    }
    chainwatch_core::telemetry::describe_metrics();

    let session = Arc::new(MonitorSession::new(&monitor_config));
    let client = Arc::new(EvmJsonRpcClient::new()?);
    let oracle = Arc::new(CoinGeckoOracle::new(monitor_config.price_api_url.clone())?);
    let poller = Poller::new(Arc::clone(&session), client, oracle);

    let mut handles =
        poller.start(monitor_config.poll_interval(), monitor_config.price_refresh_interval());
    handles.push(report::spawn_reporter(&poller));

    tokio::signal::ctrl_c().await.context("Failed to listen for shutdown signal")?;
    info!("Shutdown requested, stopping pollers");
    poller.shutdown();

    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!("Background task ended abnormally: {}", e);
        }
    }

    info!("Chainwatch stopped");
    Ok(())
}

fn install_metrics_exporter(addr: SocketAddr) -> Result<()> {
    use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

    // RPC latency: sub-100ms nodes up to the attempt timeout
    const RPC_LATENCY_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0];

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full("chainwatch_rpc_latency_seconds".to_string()),
            RPC_LATENCY_BUCKETS,
        )?
        .install()
        .context("Failed to install Prometheus exporter")
}

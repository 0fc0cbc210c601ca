use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::signal;

use opener_gateway::gateway_state::{GatewayConfig, GatewayState};
use opener_gateway::registry::StepRegistry;
use opener_gateway::server::startup;

/// A simple webservice to wrap OpeNER services.
#[derive(Debug, Parser)]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,

    #[arg(long, default_value_t = default_workers())]
    workers: usize,

    #[arg(long, default_value = "info")]
    log_level: String,

    /// Per-call timeout for backend requests, in seconds.
    #[arg(long, default_value_t = 600)]
    timeout: u64,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(1)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        workers: args.workers,
        log_level: args.log_level,
        timeout: args.timeout,
    };

    let registry = StepRegistry::from_env();
    let state = GatewayState::new(registry, Duration::from_secs(config.timeout));

    actix_web::rt::System::new().block_on(async move {
        tokio::select! {
            res = startup(config, state) => {
                res.context("server failed")?;
                Ok(())
            }
            _ = signal::ctrl_c() => {
                println!("Received Ctrl+C, shutting down");
                Ok(())
            }
        }
    })
}

//! Gateway service: validates CEP input and forwards the lookup to the
//! resolver service over a traced HTTP hop.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ceptemp_core::{Config, pipeline::build_http_client, telemetry};
use ceptemp_gateway::routes;

#[derive(Debug, Parser)]
#[command(name = "ceptemp-gateway", version, about = "CEP temperature gateway")]
struct Args {
    /// Path to a TOML config file; defaults plus CEPTEMP_* environment
    /// variables are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cfg = Config::load(args.config.as_deref())?;

    let provider = telemetry::init(&cfg.service_name, cfg.otlp_endpoint.as_deref())?;

    let resolver_url = cfg
        .resolver_url
        .clone()
        .context("resolver_url must be configured for the gateway")?;

    let app = routes::router(routes::AppState {
        http: build_http_client(&cfg)?,
        resolver_url,
    });

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.listen_addr))?;
    tracing::info!("listening on {}", cfg.listen_addr);

    axum::serve(listener, app).await.context("Server exited")?;

    if let Some(provider) = provider {
        let _ = provider.shutdown();
    }
    Ok(())
}

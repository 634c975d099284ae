//! Resolver service: `GET /cep/{code}` runs the full lookup pipeline
//! against the postal-code and weather upstreams.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ceptemp_core::{Config, Pipeline, telemetry};
use ceptemp_server::routes;

#[derive(Debug, Parser)]
#[command(name = "ceptemp-server", version, about = "CEP temperature service")]
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

    let pipeline = Pipeline::from_config(&cfg)?;
    let app = routes::router(routes::AppState {
        pipeline,
        include_city: cfg.include_city,
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

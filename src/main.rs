use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tokio::runtime::Builder;
use tracing_subscriber::EnvFilter;

use marketflow::{Config, EngineBuilder, http};

/// Marketing-content workflow engine server.
#[derive(Debug, Parser)]
#[command(name = "marketflow", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("marketflow=info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::create(path).with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let runtime = Arc::new(
        Builder::new_multi_thread()
            .worker_threads(config.async_worker_thread_number.into())
            .enable_all()
            .build()
            .context("building tokio runtime")?,
    );

    let engine = Arc::new(
        EngineBuilder::new()
            .config(config.clone())
            .runtime(runtime.clone())
            .build()
            .context("building engine")?,
    );
    engine.launch();

    let server_config = config.server.clone();
    runtime.block_on(http::serve(server_config, engine.clone()))?;

    engine.shutdown();
    Ok(())
}

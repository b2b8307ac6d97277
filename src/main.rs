use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use worktime_engine::api::{AppState, create_router};
use worktime_engine::config::ConfigLoader;

/// HTTP server for the work-time accounting engine.
#[derive(Debug, Parser)]
#[command(name = "worktime-engine", version, about)]
struct Cli {
    /// Configuration directory holding policy.yaml, office.yaml and holidays/.
    #[arg(long, default_value = "./config/default")]
    config: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn wait_for_shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let config = ConfigLoader::load(&cli.config)?;
    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    info!(bind = %cli.bind, config = %cli.config.display(), "worktime-engine listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;

    info!("worktime-engine stopped");
    Ok(())
}

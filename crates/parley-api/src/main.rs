//! Parley API server
//!
//! Opens conversation sessions and streams answers from the configured
//! upstream models as `text/event-stream` chunk frames.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use parley_common::{AppConfig, StorageBackend};
use parley_llm::{GenaiAgentRunner, GenaiGenerationClient};
use parley_memory::StoreSet;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod api;

use api::auth::HeaderIdentityResolver;
use api::{Adapters, AppState};

/// Command-line arguments for the Parley API server
#[derive(Parser, Debug)]
#[clap(name = "parley-api", about = "Streaming question/answer session server")]
struct Args {
    /// Host to bind to
    #[clap(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[clap(short, long, default_value = "8000")]
    port: u16,

    /// Path to the data directory (overrides PARLEY_DATA_DIR)
    #[clap(short, long)]
    data_dir: Option<PathBuf>,

    /// Keep sessions in memory only
    #[clap(long)]
    memory: bool,

    /// Header carrying the caller identity
    #[clap(long, default_value = api::auth::USER_HEADER)]
    user_header: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Parley API server...");

    let mut config = AppConfig::from_env()?;
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }
    if args.memory {
        config.storage.backend = StorageBackend::Memory;
    }

    let stores = match config.storage.backend {
        StorageBackend::File => {
            info!("Data directory: {:?}", config.storage.data_dir);
            std::fs::create_dir_all(&config.storage.data_dir)?;
            StoreSet::file(&config.storage.data_dir)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            StoreSet::in_memory()
        }
    };

    info!(
        "Models: standard={}, thinking={}, agent={}",
        config.gemini.flash_model, config.gemini.pro_model, config.agent.model
    );

    let adapters = Adapters::new(
        &config,
        Arc::new(GenaiGenerationClient::new()),
        Arc::new(GenaiAgentRunner::new(Arc::new(config.agent.clone()))),
        &stores,
    );
    let state = AppState::new(
        stores,
        Arc::new(HeaderIdentityResolver::new(args.user_header)),
        adapters,
    );
    let app = api::router(state);

    let addr = format!("{}:{}", args.host, args.port);
    info!("Binding to address: {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

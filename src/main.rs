//! Concierge - customer-support chatbot backend

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use concierge::{
    auth::SessionSealer,
    config::Args,
    db::MongoClient,
    seed,
    server::{self, AppState},
    store::{MemoryStore, MongoSupportStore, SupportStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("concierge={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Concierge - support chatbot backend");
    info!("======================================");
    info!("Node ID: {}", args.node_id);
    info!("Listen: {}", args.listen);
    info!(
        "Mode: {}",
        if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" }
    );
    info!("MongoDB: {}", args.mongodb_uri);
    info!("Frontend origin: {}", args.frontend_url);
    info!("======================================");

    // Connect to MongoDB; dev mode falls back to a seeded in-memory store
    let store: Arc<dyn SupportStore> =
        match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
            Ok(client) => {
                info!("MongoDB connected successfully");
                Arc::new(MongoSupportStore::new(client))
            }
            Err(e) => {
                if args.dev_mode {
                    warn!(
                        "MongoDB connection failed (dev mode, using in-memory store): {}",
                        e
                    );
                    let memory = MemoryStore::new();
                    let summary = seed::run(&memory).await?;
                    info!(
                        "In-memory store seeded with {} demo documents",
                        summary.created
                    );
                    Arc::new(memory)
                } else {
                    error!("MongoDB connection failed: {}", e);
                    std::process::exit(1);
                }
            }
        };

    let secret = args
        .session_secret()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    let sealer = SessionSealer::new(&secret, args.session_ttl_seconds);

    let state = Arc::new(AppState::new(args, store, sealer));
    server::run(state).await?;

    Ok(())
}

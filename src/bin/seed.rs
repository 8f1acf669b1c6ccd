//! Database seeder
//!
//! Explicitly-invoked, idempotent. Connects to MongoDB with the same
//! configuration as the service and upserts the demo dataset by natural
//! key; a second run reports everything as already present.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use concierge::{config::Args, db::MongoClient, seed, store::MongoSupportStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("concierge={},info", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(c) => c,
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    let store = MongoSupportStore::new(client);
    let summary = seed::run(&store).await?;

    info!(
        "Seed run finished: {} created, {} already present",
        summary.created, summary.existing
    );
    Ok(())
}

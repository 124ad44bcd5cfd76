use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imposter::{api, config::ServerConfig, registry::Registry, tasks, words::WordCatalog};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imposter=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting imposter server...");

    let config = ServerConfig::from_env();

    let catalog = match config.word_pairs_path.as_deref() {
        Some(path) => match WordCatalog::from_json_file(path) {
            Ok(catalog) => {
                tracing::info!(path, pairs = catalog.len(), "Loaded word pairs");
                catalog
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load word pairs from {}: {}. Using built-in pairs.",
                    path,
                    e
                );
                WordCatalog::default()
            }
        },
        None => WordCatalog::default(),
    };

    let registry = Registry::new(catalog, config.timers.clone());

    // Spawn background task for evicting abandoned rooms
    tasks::spawn_room_sweeper(registry.clone(), config.room_ttl, config.sweep_interval);

    let app = api::router(registry, config.cors_origin.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

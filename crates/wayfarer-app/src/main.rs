use std::sync::Arc;

use salvo::conn::TcpListener;
use salvo::{Listener, Server};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};
use wayfarer_app::app::router;
use wayfarer_core::config::{LookupMode, load_config};
use wayfarer_db::db::RecordStore;
use wayfarer_db::db::connection::{create_pool, run_migrations};
use wayfarer_service::lookup::lookup_from_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Wayfarer slug routing server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    // Only the store-backed mode talks to the database directly.
    let store: Option<Arc<dyn RecordStore>> = match config.lookup.mode {
        LookupMode::Store => {
            run_migrations(&config.database.url).await?;
            let pool = create_pool(
                &config.database.url,
                u32::from(config.database.max_connections),
            )
            .await?;
            tracing::info!("Database connection pool created.");
            Some(Arc::new(pool))
        }
        LookupMode::Http => None,
    };

    let lookup = lookup_from_settings(&config, store)?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = router(config, lookup);

    tracing::info!("Server listening on {bind_addr}");

    Server::new(acceptor).serve(router).await;

    Ok(())
}

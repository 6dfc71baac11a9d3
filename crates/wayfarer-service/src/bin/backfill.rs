use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wayfarer_core::config::load_config;
use wayfarer_db::db::connection::{create_pool, run_migrations};
use wayfarer_service::backfill::{self, BackfillOptions};

/// Assign canonical slugs to records that do not have one yet.
#[derive(Debug, Parser)]
#[command(name = "backfill", version)]
struct Args {
    /// Only backfill this collection (default: every configured collection).
    #[arg(long)]
    collection: Option<String>,

    /// Log the slugs that would be assigned without writing them.
    #[arg(long)]
    dry_run: bool,

    /// Override `slug.max_suffix_attempts`.
    #[arg(long)]
    max_suffix_attempts: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(config.logging.level.as_str())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(fmt::layer().with_target(true))
        .init();

    tracing::info!(
        collection = ?args.collection,
        dry_run = args.dry_run,
        "Starting slug backfill"
    );

    run_migrations(&config.database.url).await?;
    let pool = create_pool(&config.database.url, 1).await?;

    let options = BackfillOptions {
        max_suffix_attempts: args
            .max_suffix_attempts
            .unwrap_or(config.slug.max_suffix_attempts),
        dry_run: args.dry_run,
    };

    let reports = backfill::run(
        &pool,
        &config.collections,
        args.collection.as_deref(),
        options,
    )
    .await?;

    for report in &reports {
        tracing::info!(
            collection = %report.collection,
            scanned = report.scanned,
            skipped = report.skipped,
            assigned = report.assigned(),
            dry_run = report.dry_run,
            "Backfill finished"
        );
    }

    Ok(())
}

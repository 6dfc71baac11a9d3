use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use wayfarer_core::util::identifier::generate_id;

use crate::db::query::record;
use crate::db::{RecordStore, StoreFuture};
use crate::model::record::{NewRecord, Record};

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection<'pool> = PooledConnection<'pool, AsyncPgConnection>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// ## Summary
/// Creates a new database connection pool.
///
/// ## Errors
/// Returns an error if the pool cannot be created with the provided database URL.
#[tracing::instrument(skip(database_url), fields(pool_size = size))]
pub async fn create_pool(database_url: &str, size: u32) -> anyhow::Result<DbPool> {
    tracing::debug!("Creating database connection pool");

    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

    let pool = Pool::builder()
        .max_size(size)
        .min_idle(Some(size))
        .test_on_check_out(false)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(config)
        .await?;

    tracing::info!(
        pool_size = size,
        "Database connection pool created successfully"
    );

    Ok(pool)
}

/// ## Summary
/// Runs pending embedded migrations on a blocking connection.
///
/// ## Errors
/// Returns an error if connecting or migrating fails.
#[tracing::instrument(skip(database_url))]
pub async fn run_migrations(database_url: &str) -> anyhow::Result<()> {
    let url = database_url.to_string();
    let applied = tokio::task::spawn_blocking(move || {
        let mut conn = diesel::PgConnection::establish(&url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {e}"))?
            .len();
        Ok::<_, anyhow::Error>(applied)
    })
    .await??;

    tracing::info!(applied, "Database migrations up to date");

    Ok(())
}

impl RecordStore for DbPool {
    #[tracing::instrument(skip(self))]
    fn find_by_id<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> StoreFuture<'a, Option<Record>> {
        Box::pin(async move {
            let mut conn = self.get().await?;
            Ok(record::find_by_id(&mut conn, collection, id).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn find_by_slug<'a>(
        &'a self,
        collection: &'a str,
        slug: &'a str,
    ) -> StoreFuture<'a, Option<Record>> {
        Box::pin(async move {
            let mut conn = self.get().await?;
            Ok(record::find_by_slug(&mut conn, collection, slug).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn find_by_legacy_slug<'a>(
        &'a self,
        collection: &'a str,
        slug: &'a str,
    ) -> StoreFuture<'a, Option<Record>> {
        Box::pin(async move {
            let mut conn = self.get().await?;
            Ok(record::find_by_legacy_slug(&mut conn, collection, slug).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn list_missing_slug<'a>(
        &'a self,
        collection: &'a str,
    ) -> StoreFuture<'a, Vec<Record>> {
        Box::pin(async move {
            let mut conn = self.get().await?;
            Ok(record::list_missing_slug(&mut conn, collection).await?)
        })
    }

    #[tracing::instrument(skip(self, legacy_slugs))]
    fn assign_slug<'a>(
        &'a self,
        id: &'a str,
        slug: &'a str,
        legacy_slugs: &'a [String],
    ) -> StoreFuture<'a, Record> {
        Box::pin(async move {
            let mut conn = self.get().await?;
            Ok(record::assign_slug(&mut conn, id, slug, legacy_slugs).await?)
        })
    }

    #[tracing::instrument(skip(self))]
    fn insert<'a>(
        &'a self,
        collection: &'a str,
        name: Option<&'a str>,
        slug: Option<&'a str>,
    ) -> StoreFuture<'a, Record> {
        Box::pin(async move {
            let id = generate_id();
            let new_record = NewRecord {
                id: &id,
                collection,
                name,
                slug,
                legacy_slugs: Vec::new(),
            };
            let mut conn = self.get().await?;
            Ok(record::insert(&mut conn, &new_record).await?)
        })
    }
}

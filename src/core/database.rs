use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Build the shared connection pool.
///
/// Connections are acquired per operation and returned on drop, so the
/// acquire timeout is the only wait bound callers see for pool exhaustion.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
}

/// Apply pending migrations from `./migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

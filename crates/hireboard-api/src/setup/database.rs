//! Postgres pool and schema migrations

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use hireboard_core::Config;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Connect the pool and bring the schema (and seed jobs) up to date.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let acquire_timeout = Duration::from_secs(config.db_timeout_seconds());
    let pool = pool_options(config.db_max_connections(), acquire_timeout)
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        acquire_timeout_secs = acquire_timeout.as_secs(),
        idle_timeout_secs = IDLE_TIMEOUT.as_secs(),
        max_lifetime_secs = MAX_LIFETIME.as_secs(),
        "Database pool ready"
    );

    let applied = run_migrations(&pool).await?;
    tracing::info!(applied, "Database schema up to date");

    Ok(pool)
}

fn pool_options(max_connections: u32, acquire_timeout: Duration) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
}

/// Runs pending migrations and returns how many were applied by this call.
async fn run_migrations(pool: &PgPool) -> Result<i64> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;

    let before = applied_migration_count(pool).await?;
    tracing::debug!(
        known = migrator.iter().count(),
        already_applied = before,
        "Running migrations"
    );

    migrator
        .run(pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(applied_migration_count(pool).await? - before)
}

async fn applied_migration_count(pool: &PgPool) -> Result<i64> {
    // The bookkeeping table only exists once the first migration has run
    let tracked: bool = sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
        .fetch_one(pool)
        .await
        .context("Failed to inspect migration table")?;
    if !tracked {
        return Ok(0);
    }

    sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await
        .context("Failed to count applied migrations")
}

use anyhow::{Context, Result, anyhow};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::config::AppConfig;
use crate::web::PgPool;

// Embed migrations into the binary
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

pub fn create_pool(config: &AppConfig) -> Result<PgPool> {
    info!(
        "Creating database connection pool (max {} connections)",
        config.database_pool_size
    );
    let manager = ConnectionManager::<PgConnection>::new(config.database_url()?);
    Pool::builder()
        .max_size(config.database_pool_size)
        .build(manager)
        .context("Failed to create database connection pool")
}

/// Apply any pending migrations using a pooled connection
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    let pool = pool.clone();
    let applied = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow!("Failed to run database migrations: {}", e))?;
        Ok::<usize, anyhow::Error>(applied.len())
    })
    .await??;

    if applied > 0 {
        info!("Applied {} database migration(s)", applied);
    } else {
        info!("Database schema is up to date");
    }
    Ok(())
}

use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use airlog::config::AppConfig;
use airlog::database::{create_pool, run_migrations};
use airlog::route_import::read_routes_csv_file;
use airlog::route_store::PgRouteStore;
use airlog::route_upsert::RouteUpserter;

/// Bulk upsert the routes listed in a CSV file
pub async fn handle_import_routes(config: &AppConfig, path: &Path, dry_run: bool) -> Result<()> {
    sentry::configure_scope(|scope| {
        scope.set_tag("operation", "import-routes");
    });

    let routes = read_routes_csv_file(path)?;
    info!(
        "Read {} route rows from {} ({} rejected)",
        routes.descriptors.len() + routes.rejected_rows,
        path.display(),
        routes.rejected_rows
    );

    if dry_run {
        let preview = routes.preview();
        info!(
            "Dry run: {} rows, {} unique routes would be submitted, {} skipped",
            preview.rows, preview.unique_routes, preview.skipped
        );
        return Ok(());
    }

    if routes.descriptors.is_empty() {
        warn!("No routes to import from {}", path.display());
        return Ok(());
    }

    let pool = create_pool(config)?;
    run_migrations(&pool).await?;
    let store = PgRouteStore::new(pool);

    let mut result = RouteUpserter::new(&store)
        .upsert_bulk(&routes.descriptors)
        .await;
    result.skipped += routes.rejected_rows;

    for error in &result.errors {
        warn!("Route not imported: {}", error);
    }
    info!(
        "Route import complete: {} upserted, {} skipped, {} errors",
        result.upserted,
        result.skipped,
        result.errors.len()
    );

    Ok(())
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use airlog::config::AppConfig;

mod commands;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "airlog",
    version,
    about = "Flight log backend: route catalog API and importer"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Web {
        /// Interface to bind to
        #[arg(long, default_value = "0.0.0.0")]
        interface: String,

        /// Port to listen on
        #[arg(long, default_value_t = 61225)]
        port: u16,
    },
    /// Bulk upsert routes from a CSV file
    ImportRoutes {
        /// CSV with airline_iata, origin_iata, destination_iata, flight_number columns
        csv: PathBuf,

        /// Only parse and deduplicate the file; don't connect to the database
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(config.environment.clone().into()),
            attach_stacktrace: true,
            ..Default::default()
        },
    )))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,h2=warn,hyper=warn,tower_http=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(sentry_tracing::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Web { interface, port } => {
            commands::handle_web(&config, interface, port).await
        }
        Commands::ImportRoutes { csv, dry_run } => {
            commands::handle_import_routes(&config, &csv, dry_run).await
        }
    };

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    result
}

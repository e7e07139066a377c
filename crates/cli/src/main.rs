//! `dve`: operator commands for the design version engine.
//!
//! Reads `DATABASE_URL` and the `DVE_*` settings from the environment (or a
//! `.env` file) and prints results as JSON on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dve_core::diff::ComparisonType;
use dve_core::types::{DbId, VersionNumber};
use dve_db::DbPool;
use dve_engine::gateway::QualityGateway;
use dve_engine::store::PgDesignStore;
use dve_engine::{telemetry, DesignVersionEngine, EngineConfig};
use dve_events::{EventBus, EventLogger, EventPersistence, EventPublisher};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "dve")]
#[command(about = "Design version control engine", long_about = None)]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// List the most recent versions of an asset, newest first
    History {
        asset_id: DbId,

        /// Maximum number of versions
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Compare two versions of an asset
    Compare {
        asset_id: DbId,
        from: VersionNumber,
        to: VersionNumber,

        /// visual, placement, metadata, or full
        #[arg(long = "type", default_value = "visual")]
        comparison_type: String,
    },

    /// Print history analytics for an asset
    Analytics { asset_id: DbId },

    /// Append a new version replaying an earlier one
    Revert {
        asset_id: DbId,
        version: VersionNumber,

        /// User performing the revert
        #[arg(long = "by")]
        reverted_by: DbId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = dve_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    dve_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    if let Commands::Migrate = cli.command {
        dve_db::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Database migrations applied");
        return Ok(());
    }

    let config = EngineConfig::from_env()?;
    tracing::debug!(?config, "Loaded engine configuration");

    let bus = Arc::new(EventBus::default());
    let logger = tokio::spawn(EventLogger::run(bus.subscribe()));
    let persistence = tokio::spawn(EventPersistence::run(pool.clone(), bus.subscribe()));

    let engine = build_engine(pool, bus.clone(), config);
    let outcome = run(&engine, cli.command, cli.pretty).await;

    // Close the bus so the subscribers drain and exit.
    drop(engine);
    drop(bus);
    let _ = logger.await;
    let _ = persistence.await;

    outcome
}

fn build_engine(pool: DbPool, bus: Arc<EventBus>, config: EngineConfig) -> DesignVersionEngine {
    let store = Arc::new(PgDesignStore::new(pool));
    DesignVersionEngine::new(
        store.clone(),
        store,
        QualityGateway::from_config(&config),
        bus as Arc<dyn EventPublisher>,
        config,
    )
}

async fn run(engine: &DesignVersionEngine, command: Commands, pretty: bool) -> Result<()> {
    match command {
        Commands::Migrate => Ok(()),
        Commands::History { asset_id, limit } => {
            let versions = engine.list_versions(asset_id, limit).await?;
            print_json(&versions, pretty)
        }
        Commands::Compare {
            asset_id,
            from,
            to,
            comparison_type,
        } => {
            let comparison_type: ComparisonType = comparison_type.parse()?;
            let comparison = engine
                .compare_versions(asset_id, from, to, comparison_type)
                .await?;
            print_json(&comparison, pretty)
        }
        Commands::Analytics { asset_id } => {
            let analytics = engine.get_version_analytics(asset_id).await?;
            print_json(&analytics, pretty)
        }
        Commands::Revert {
            asset_id,
            version,
            reverted_by,
        } => {
            let created = engine
                .revert_to_version(asset_id, version, reverted_by)
                .await?;
            print_json(&created, pretty)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

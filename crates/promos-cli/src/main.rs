use std::path::PathBuf;

use clap::{Parser, Subcommand};
use promos_ingest::ParserRegistry;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "promos-cli")]
#[command(about = "Promotions database command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Load a local promotions file
    Ingest {
        /// File to load; its extension selects the parser
        path: PathBuf,

        /// Parser to use instead of the one implied by the extension
        #[arg(long)]
        file_type: Option<String>,
    },
    /// Delete every promotion and product
    Clear,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check database connectivity
    Ping,
    /// Drop both tables and recreate them
    Rebuild,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("promos-cli: pass --help for available commands");
        return Ok(());
    };

    let config = promos_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = promos_db::PoolConfig::from_app_config(&config);
    let pool = promos_db::connect_pool(&config.database_url, pool_config).await?;

    let result = run(command, &pool).await;
    pool.close().await;
    result
}

async fn run(command: Commands, pool: &sqlx::SqlitePool) -> anyhow::Result<()> {
    match command {
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = promos_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            promos_db::ping(pool).await?;
            println!("database reachable");
        }
        Commands::Db {
            command: DbCommands::Rebuild,
        } => {
            promos_db::rebuild_schema(pool).await?;
            tracing::info!("schema rebuilt");
            println!("dropped and recreated product and promotion tables");
        }
        Commands::Ingest { path, file_type } => {
            promos_db::run_migrations(pool).await?;
            ingest_file(pool, &path, file_type.as_deref()).await?;
        }
        Commands::Clear => {
            promos_db::run_migrations(pool).await?;
            promos_db::clear_all(pool).await?;
            println!("cleared all promotions and products");
        }
    }
    Ok(())
}

async fn ingest_file(
    pool: &sqlx::SqlitePool,
    path: &std::path::Path,
    file_type: Option<&str>,
) -> anyhow::Result<()> {
    let input = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("couldn't read {}: {e}", path.display()))?;
    let filename = path.file_name().and_then(|name| name.to_str());

    let registry = ParserRegistry::default();
    let summary =
        promos_ingest::load_promotions_file(pool, &registry, filename, file_type, &input).await?;

    println!(
        "loaded {} promotion(s), created {} product(s), skipped {} entr{}",
        summary.loaded,
        summary.products_created,
        summary.skipped,
        if summary.skipped == 1 { "y" } else { "ies" },
    );
    Ok(())
}

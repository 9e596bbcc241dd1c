use clap::{Parser, Subcommand};
use configuration::{init_tracing, load_config, Overrides};
use database::{DbRepository, Gateway};
use std::sync::Arc;

/// The main entry point for the bookstore service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // The binding and all other settings are resolved exactly once, here.
    let settings = load_config(&cli.overrides)?;
    let _guard = init_tracing(&settings.log)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => web_server::run_server(settings).await?,
        Commands::Check => handle_check(&settings).await?,
        Commands::Migrate => {
            database::run_migrations(&settings.hana).await?;
            tracing::info!(schema = %settings.hana.schema, "Migrations applied.");
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A REST service for the books relation.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the books API over HTTP.
    Serve,
    /// Verify that the `hana` binding can be used to connect and select the schema.
    Check,
    /// Create the books relation inside the configured schema.
    Migrate,
}

/// Runs one statement through the gateway and reports the outcome.
async fn handle_check(settings: &configuration::Settings) -> anyhow::Result<()> {
    let gateway = Arc::new(Gateway::configure(&settings.hana, settings.gateway.policy));
    let repo = DbRepository::new(gateway);

    match repo.check().await {
        Ok(()) => {
            println!(
                "Database {}:{} is reachable and schema {} is selectable.",
                settings.hana.host, settings.hana.port, settings.hana.schema
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Database check failed during {}: {}", e.stage, e);
            eprintln!("Make sure the hana binding points at a running instance and the schema exists.");
            Err(e.into())
        }
    }
}

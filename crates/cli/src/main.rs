//! # Sirius CLI
//!
//! Operator tools for the Sirius authorization core.
//!
//! ## Usage
//!
//! ```bash
//! sirius check ada@example.com <team-id> class:create   # Resolve one permission
//! sirius ancestors <team-id>                             # Walk the hierarchy
//! sirius validate --connect                              # Verify configuration
//! sirius --help                                          # Show help
//! ```

mod commands;
mod config;

use clap::{CommandFactory as _, Parser};
use commands::{Commands, CompletionsArgs};
use config::DatabaseConfig;
use logging::measure_duration;
use sea_orm::{Database, DatabaseConnection};

/// Sirius - team authorization tools
#[derive(Parser, Debug)]
#[command(name = "sirius")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "SIRIUS_LOG_FORMAT", default_value = "compact")]
    log_format: String,

    /// Optional log file, rotated daily
    #[arg(long, env = "SIRIUS_LOG_FILE")]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(&cli.log_level, &cli.log_format, cli.log_file.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    logging::info!(target: "app", command = ?cli.command, "Sirius CLI starting...");

    match &cli.command {
        Commands::Check(args) => {
            let db = connect().await?;
            let result = measure_duration!("check", "permission check", {
                commands::check::check(&db, args).await
            })?;
            if result.is_allowed() {
                println!("allowed");
            }
            else {
                println!("denied ({})", result.reason());
            }
        },
        Commands::Ancestors(args) => {
            let db = connect().await?;
            let chain = commands::ancestors::ancestors(&db, args).await?;
            if chain.is_empty() {
                println!("(root team)");
            }
            else {
                println!("{}", commands::ancestors::render(&chain));
            }
        },
        Commands::Completions(args) => completions(args)?,
        Commands::Validate(args) => {
            let config = DatabaseConfig::from_env()?;
            commands::validate::validate(&config, args.connect).await?;
            println!("configuration ok");
        },
    }

    logging::info!(target: "app", "Sirius CLI completed successfully");
    Ok(())
}

async fn connect() -> anyhow::Result<DatabaseConnection> {
    let config = DatabaseConfig::from_env()?;
    config.validate()?;
    logging::info!(target: "app",
        url = %config::redact_url(&config.connection_url()),
        pool_size = config.pool_size,
        "Connecting to database..."
    );
    let db = Database::connect(commands::validate::connect_options(&config))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    Ok(db)
}

fn completions(args: &CompletionsArgs) -> anyhow::Result<()> {
    commands::completions::completions(args.shell, &mut Cli::command(), &mut std::io::stdout())?;
    Ok(())
}

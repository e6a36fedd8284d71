//! TPG Loader - batch delimited-text-to-PostgreSQL loader

use std::path::PathBuf;

use clap::Parser;
use tpg_common::logging::{init_logging, LogConfig, LogLevel};
use tpg_loader::config::{load_groups, TableRegistry};
use tpg_loader::pipeline::BatchRunner;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "tpg-loader")]
#[command(author, version, about = "Batch delimited-text to PostgreSQL loader")]
struct Cli {
    /// Group configuration file
    #[arg(long, default_value = "./groups.toml")]
    groups: PathBuf,

    /// Table registry file
    #[arg(long, default_value = "./tables.toml")]
    tables: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("tpg-loader".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    // The loader must still run when logging cannot initialize
    let _ = init_logging(&log_config);

    // The batch always exits 0: it is a scheduled job, and the outcome of
    // partial runs lives in the logs and the archived filenames.
    if let Err(e) = run(&cli).await {
        error!(error = %e, "Batch run failed");
        eprintln!("Error: {}", e);
    }
}

async fn run(cli: &Cli) -> tpg_common::Result<()> {
    let groups = load_groups(&cli.groups)?;
    let registry = TableRegistry::load(&cli.tables)?;

    info!(groups = groups.len(), "Starting batch run");

    let runner = BatchRunner::new(groups, registry);
    let stats = runner.run().await;

    info!("Batch run completed: {:?}", stats);
    Ok(())
}

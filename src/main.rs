//! Axum Service Template - Application entry point
//!
//! CLI-based entry point that dispatches to various commands.

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    fmt::time::ChronoLocal, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use service_template::{
    cli::{Cli, Commands},
    commands,
    config::{Config, LogFormat, LoggingConfig},
};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration (.env first, then the process environment)
    let config = Config::from_env();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(&config.logging, cli.verbose);
    tracing::debug!("Configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
    };

    // Handle errors
    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
///
/// `RUST_LOG` wins over `LOG_LEVEL` when set.
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::from_level(logging.level_value())
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let timer = ChronoLocal::new(logging.date_format.clone());

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_timer(timer).pretty())
            .init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().with_timer(timer).compact())
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().with_timer(timer).json())
            .init(),
    }
}

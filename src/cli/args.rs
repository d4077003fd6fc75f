//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Axum Service Template - CRUD web service with database migrations
#[derive(Parser, Debug)]
#[command(name = "service-template")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),
}

/// Arguments for the serve command
///
/// Flags override `APP_HOST` / `APP_PORT` from the configuration.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Apply the given flags on top of the loaded settings.
    pub fn apply_to(self, app: &mut AppConfig) {
        if let Some(host) = self.host {
            app.host = host;
        }
        if let Some(port) = self.port {
            app.port = port;
        }
    }
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
    /// Create a new empty migration file
    Revision {
        /// Short description, used in the file name
        #[arg(short, long)]
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    fn serve_args(argv: &[&str]) -> ServeArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Serve(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_without_flags_keeps_configured_address() {
        let mut app = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 9100,
            ..AppConfig::default()
        };

        serve_args(&["service-template", "serve"]).apply_to(&mut app);

        assert_eq!(app.server_addr(), "127.0.0.1:9100");
    }

    #[test]
    fn serve_flags_override_configured_address() {
        let mut app = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 9100,
            ..AppConfig::default()
        };

        serve_args(&["service-template", "serve", "--port", "7000"]).apply_to(&mut app);

        assert_eq!(app.host, "127.0.0.1");
        assert_eq!(app.port, 7000);
    }

    #[test]
    fn revision_requires_message() {
        assert!(Cli::try_parse_from(["service-template", "migrate", "revision"]).is_err());

        let cli = Cli::try_parse_from([
            "service-template",
            "migrate",
            "revision",
            "-m",
            "add tags",
        ])
        .unwrap();
        match cli.command {
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Revision { message },
            }) => assert_eq!(message, "add tags"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

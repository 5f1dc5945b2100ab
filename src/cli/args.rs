//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// CRUD API skeleton - accounts, authentication and bots over REST
#[derive(Parser, Debug)]
#[command(name = "crud-api-skeleton")]
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
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Host to bind to [default: 0.0.0.0]
    #[arg(short = 'H', long, env = "SERVER_HOST")]
    pub host: Option<String>,

    /// Port to listen on [default: 3000]
    #[arg(short, long, env = "SERVER_PORT")]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from(["crud-api-skeleton", "-v", "serve", "--port", "8080"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, Some(8080)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_migrate_actions() {
        for (arg, action) in [
            ("up", MigrateAction::Up),
            ("down", MigrateAction::Down),
            ("status", MigrateAction::Status),
            ("fresh", MigrateAction::Fresh),
        ] {
            let cli = Cli::try_parse_from(["crud-api-skeleton", "migrate", arg]).unwrap();
            match cli.command {
                Commands::Migrate(args) => assert_eq!(args.action, action),
                other => panic!("unexpected command: {:?}", other),
            }
        }
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        assert!(Cli::try_parse_from(["crud-api-skeleton", "generate"]).is_err());
    }
}

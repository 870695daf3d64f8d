mod commands;
mod context;
mod migration;
mod output;
mod registry;
mod resolver;
mod secrets;
mod traits;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{
    ConfigCommand, ConnectionStringCommand, MigrateCommand, QualityCommand, SecretsCommand,
    ServicesCommand, StatusCommand,
};
use context::Context;

#[derive(Parser)]
#[command(name = "sophia")]
#[command(about = "Sophia - service configuration, secrets and schema migration", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered services
    Services,

    /// Show backend health and registry status
    Status,

    /// Inspect resolved service configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print the connection string for a database service
    ConnectionString {
        /// Service name (e.g. snowflake)
        service: String,
    },

    /// Manage secrets in the backend
    Secrets {
        #[command(subcommand)]
        command: SecretsCommands,
    },

    /// Create or evolve a table to fit a JSON sample record
    Migrate {
        /// Target table name
        table: String,

        /// Path to a JSON file holding one sample record
        #[arg(short, long)]
        sample: String,

        /// PostgreSQL connection string
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },

    /// Score the data quality of a JSON sample record
    Quality {
        /// Path to a JSON file holding one sample record
        #[arg(short, long)]
        sample: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show every declared key for a service
    Show {
        /// Service name
        service: String,

        /// Show secret values instead of redacting them
        #[arg(long)]
        reveal: bool,
    },

    /// Print a single resolved value
    Get {
        /// Service name
        service: String,

        /// Config or secret key
        key: String,
    },
}

#[derive(Subcommand)]
enum SecretsCommands {
    /// Import variables from a local env file into the backend
    ImportEnv {
        /// Env file to import
        #[arg(long, default_value = ".env")]
        env_file: String,
    },

    /// Export resolved configuration for all services to an env file
    ExportEnv {
        /// Env file to write
        #[arg(long, default_value = ".env.new")]
        env_file: String,
    },

    /// Rotate secrets to fresh random values
    Rotate {
        /// Service name, or "all"
        #[arg(short, long)]
        service: String,
    },

    /// Report services whose secrets are overdue for rotation
    Audit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::new();

    match cli.command {
        Commands::Services => {
            ServicesCommand::execute(&ctx)?;
        }
        Commands::Status => {
            StatusCommand::execute(&ctx)?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show { service, reveal } => {
                ConfigCommand::execute_show(&ctx, &service, reveal)?;
            }
            ConfigCommands::Get { service, key } => {
                ConfigCommand::execute_get(&ctx, &service, &key)?;
            }
        },
        Commands::ConnectionString { service } => {
            ConnectionStringCommand::execute(&ctx, &service)?;
        }
        Commands::Secrets { command } => match command {
            SecretsCommands::ImportEnv { env_file } => {
                SecretsCommand::execute_import_env(&ctx, &env_file)?;
            }
            SecretsCommands::ExportEnv { env_file } => {
                SecretsCommand::execute_export_env(&ctx, &env_file)?;
            }
            SecretsCommands::Rotate { service } => {
                SecretsCommand::execute_rotate(&ctx, &service)?;
            }
            SecretsCommands::Audit => {
                SecretsCommand::execute_audit(&ctx)?;
            }
        },
        Commands::Migrate {
            table,
            sample,
            database_url,
        } => {
            MigrateCommand::execute(&ctx, &table, &sample, &database_url)?;
        }
        Commands::Quality { sample } => {
            QualityCommand::execute(&ctx, &sample)?;
        }
    }

    Ok(())
}

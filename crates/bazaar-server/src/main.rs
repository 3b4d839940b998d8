//! Bazaar CLI - marketplace chat server and operator tools

use bazaar_core::config::Config;
use bazaar_core::storage::{Database, DatabaseConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Marketplace chat backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Listen host (overrides server.host)
        #[arg(long, env = "BAZAAR_HOST")]
        host: Option<String>,
        /// Listen port (overrides server.port)
        #[arg(short, long, env = "BAZAAR_PORT")]
        port: Option<u16>,
        /// Database file (overrides database.path)
        #[arg(long, env = "BAZAAR_DATABASE")]
        database: Option<PathBuf>,
    },

    /// Apply pending schema migrations
    Migrate {
        /// Database file (overrides database.path)
        #[arg(long, env = "BAZAAR_DATABASE")]
        database: Option<PathBuf>,
    },

    /// Run health check
    Doctor {
        /// Database file (overrides database.path)
        #[arg(long, env = "BAZAAR_DATABASE")]
        database: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bazaar=info".parse()?)
                .add_directive("bazaar_core=info".parse()?)
                .add_directive("bazaar_server=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            database,
        } => cmd_serve(host, port, database).await,

        Commands::Migrate { database } => cmd_migrate(database, cli.quiet).await,

        Commands::Doctor { database } => cmd_doctor(database, cli.quiet).await,

        Commands::Config { action } => cmd_config(action, cli.quiet),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    database: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if database.is_some() {
        config.database.path = database;
    }
    config.validate()?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        room_order = %config.chat.room_order,
        "Starting bazaar"
    );
    bazaar_server::serve(config).await
}

/// Storage configuration from the config file and an optional path override
fn database_config(database: Option<PathBuf>) -> anyhow::Result<DatabaseConfig> {
    let mut config = Config::load()?;
    if database.is_some() {
        config.database.path = database;
    }
    Ok(config.database.to_database_config())
}

async fn cmd_migrate(database: Option<PathBuf>, quiet: bool) -> anyhow::Result<()> {
    let db_config = database_config(database)?.no_migrate();
    let db = Database::new(db_config).await?;

    let before = db.migration_status().await?;
    if before.needs_migration {
        db.migrate().await?;
    }
    let after = db.migration_status().await?;

    if !quiet {
        if before.needs_migration {
            println!(
                "Migrated {} from v{} to v{}",
                db.path().display(),
                before.current_version,
                after.current_version
            );
        } else {
            println!(
                "Database {} is up to date (v{})",
                db.path().display(),
                after.current_version
            );
        }
    }

    db.close().await;
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(database: Option<PathBuf>, quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("Bazaar Health Check");
        println!("===================");
        println!();
    }

    let mut all_ok = true;

    // Check configuration
    let config = match Config::load() {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
            }
            config
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Configuration: Error - {}", e);
            }
            Config::default()
        }
    };

    // Check config file location
    if !quiet {
        match Config::config_path() {
            Ok(path) => {
                if path.exists() {
                    println!("[OK] Config file: {}", path.display());
                } else {
                    println!("[--] Config file: {} (using defaults)", path.display());
                }
            }
            Err(e) => {
                println!("[!!] Config file: Error - {}", e);
            }
        }
    }

    // Check database
    let mut settings = config.database.clone();
    if database.is_some() {
        settings.path = database;
    }
    match Database::new(settings.to_database_config().no_migrate()).await {
        Ok(db) => {
            match db.health_check().await {
                Ok(()) => {
                    if !quiet {
                        println!("[OK] Database: Connected");
                        println!("     Path: {}", db.path().display());
                    }

                    match db.migration_status().await {
                        Ok(status) if status.needs_migration => {
                            all_ok = false;
                            if !quiet {
                                println!(
                                    "[!!] Database: Migrations pending (v{} -> v{})",
                                    status.current_version, status.target_version
                                );
                                println!("     Run `bazaar migrate`");
                            }
                        }
                        Ok(status) => {
                            if !quiet {
                                println!("[OK] Database: Schema v{}", status.current_version);
                            }
                        }
                        Err(e) => {
                            all_ok = false;
                            if !quiet {
                                println!("[!!] Database: Migration check failed - {}", e);
                            }
                        }
                    }
                }
                Err(e) => {
                    all_ok = false;
                    if !quiet {
                        println!("[!!] Database: Health check failed - {}", e);
                    }
                }
            }
            db.close().await;
        }
        Err(e) => {
            all_ok = false;
            warn!(error = %e, "Database unavailable");
            if !quiet {
                println!("[!!] Database: Failed to initialize - {}", e);
            }
        }
    }

    // Summary
    if !quiet {
        println!();
        println!(
            "Chat: max message length {}, room order {}",
            config.chat.max_message_length, config.chat.room_order
        );
        if all_ok {
            println!("All checks passed!");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }

    Ok(())
}

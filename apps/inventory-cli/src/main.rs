use anyhow::Result;
use clap::{Parser, Subcommand};
use inventory::Inventory;
use runtime::{AppConfig, CliArgs};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Inventory - browse fixed assets and consumable stock
#[derive(Parser, Debug)]
#[command(name = "inventory")]
#[command(about = "Inventory - browse fixed assets and consumable stock")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database URL (overrides config)
    #[arg(long)]
    database_url: Option<String>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate,
    /// List patrimonies
    Patrimonies(PageArgs),
    /// Show one patrimony with its status and tags
    Patrimony { nid: i32 },
    /// List consumables
    Consumables(PageArgs),
    /// List consumables and patrimonies together, ordered by tid
    Items(PageArgs),
}

#[derive(clap::Args, Debug, Clone, Copy, PartialEq, Eq)]
struct PageArgs {
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: u64,

    /// Page size; 0 selects the configured default
    #[arg(long, default_value_t = 0)]
    size: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        database_url: cli.database_url.clone(),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, Path::new(&config.home_dir));

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let Some(command) = cli.command else {
        println!("{}", config.to_yaml()?);
        return Ok(());
    };

    tracing::debug!(?command, "Running command");
    let inventory = Inventory::from_app_config(&config).await?;
    run(&inventory, command).await
}

async fn run(inventory: &Inventory, command: Commands) -> Result<()> {
    let services = inventory.services();
    match command {
        // from_app_config has already applied the migrations
        Commands::Migrate => {
            println!("Schema is up to date");
            Ok(())
        }
        Commands::Patrimonies(p) => print_json(&services.patrimonies.list(p.page, p.size).await?),
        Commands::Patrimony { nid } => print_json(&services.patrimonies.get(nid).await?),
        Commands::Consumables(p) => print_json(&services.consumables.list(p.page, p.size).await?),
        Commands::Items(p) => print_json(&services.items.list(p.page, p.size).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

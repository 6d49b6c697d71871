use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pawpal_cli::commands::{conflicts, export, import, pet, plan, status, task};
use pawpal_cli::{Cli, Commands, Config, PetAction, TaskAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(pawpal_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = pawpal_db::Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut db, config) = open_database(cli.config.as_deref())?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match command {
        Commands::Pet(PetAction::Add(args)) => pet::add(&mut out, &mut db, &config, args)?,
        Commands::Pet(PetAction::List { json }) => pet::list(&mut out, &db, &config, *json)?,
        Commands::Task(TaskAction::Add(args)) => task::add(&mut out, &mut db, &config, args)?,
        Commands::Task(TaskAction::List(args)) => task::list(&mut out, &db, &config, args)?,
        Commands::Task(TaskAction::Complete { id }) => {
            task::complete(&mut out, &mut db, &config, *id)?;
        }
        Commands::Plan(args) => plan::run(&mut out, &db, &config, args)?,
        Commands::Conflicts { json } => conflicts::run(&mut out, &db, &config, *json)?,
        Commands::Status => status::run(&mut out, &db, &config)?,
        Commands::Export => export::run(&mut out, &db, &config)?,
        Commands::Import => import::run(io::stdin().lock(), &mut out, &mut db)?,
    }

    out.flush()?;
    Ok(())
}

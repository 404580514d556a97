mod applications;
mod attributes;
mod catalog;
mod db;
mod error;
mod identity;
mod jobs;
mod loader;
mod matching;
mod models;
mod people;
mod pipeline;
mod reference;
mod reset;

use anyhow::Result;
use clap::{Parser, Subcommand};
use db::Database;
use error::SeedError;
use pipeline::{RunStats, SeedConfig, Seeder, DEFAULT_RECRUITER_RATIO};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "crewseed")]
#[command(about = "Seed a film-industry job board database from scraped data")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Scraped dataset to seed from
    #[arg(short, long, env = "CREWSEED_INPUT", default_value = "film_industry_data.json", global = true)]
    input: PathBuf,

    /// SQLite database file (defaults to the platform data directory)
    #[arg(long, env = "CREWSEED_DB", global = true)]
    db: Option<PathBuf>,

    /// RNG seed for reproducible runs
    #[arg(short, long, env = "CREWSEED_SEED", global = true)]
    seed: Option<u64>,

    /// Share of professionals that become recruiters, within [0, 1]
    #[arg(long, env = "CREWSEED_RECRUITER_RATIO", default_value_t = DEFAULT_RECRUITER_RATIO, global = true)]
    recruiter_ratio: f64,

    /// Skip creating the platform admin account
    #[arg(long, global = true)]
    no_admin: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug output, including matching fallbacks
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Wipe generated data and rebuild it from the input file (default)
    Seed,

    /// Wipe all generated data
    Reset,

    /// Show row counts per table
    Stats,
}

impl Cli {
    fn seed_config(&self) -> SeedConfig {
        SeedConfig {
            input: self.input.clone(),
            seed: self.seed,
            recruiter_ratio: self.recruiter_ratio,
            with_admin: !self.no_admin,
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CREWSEED_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Only `seed` creates the schema; the other commands expect an existing store.
fn open_store(path: Option<PathBuf>, create_schema: bool) -> Result<Database, SeedError> {
    let db = Database::open(path).map_err(SeedError::StoreUnavailable)?;
    let ready = if create_schema {
        db.init()
    } else {
        db.ensure_initialized()
    };
    ready.map_err(SeedError::StoreUnavailable)?;
    Ok(db)
}

fn print_stats(stats: &RunStats) {
    println!("{:<20} {:>8}", "TABLE", "ROWS");
    println!("{}", "-".repeat(29));
    for (table, count) in &stats.counts {
        println!("{:<20} {:>8}", table, count);
    }
    println!("{}", "-".repeat(29));
    println!("{:<20} {:>8}", "total", stats.total());
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.seed_config();
    config.validate()?;
    let command = cli.command.unwrap_or(Commands::Seed);
    let db = open_store(cli.db.clone(), matches!(command, Commands::Seed))?;

    match command {
        Commands::Seed => {
            let dataset = loader::load_dataset(&config.input)?;
            let mut seeder = Seeder::new(db, config.seed);
            let stats = seeder.run(&dataset, &config)?;
            println!("Seeded {}", seeder.db().path().display());
            print_stats(&stats);
        }

        Commands::Reset => {
            let mut seeder = Seeder::new(db, config.seed);
            let removed = seeder.reset()?;
            println!("Removed {} rows from {}", removed, seeder.db().path().display());
        }

        Commands::Stats => {
            print_stats(&RunStats::collect(&db)?);
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("Warning: {err:#}");
    }

    if let Err(err) = run(cli) {
        error!("seed run failed: {err:#}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

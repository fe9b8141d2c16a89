//! Timetable search CLI.
//!
//! Usage:
//!   u-timetable <courses.tsv> <demands.tsv> [--config search.json] [--log run.tsv]
//!
//! The run log goes to `--log` or standard output. Diagnostics go to
//! standard error; `-v` raises verbosity, `RUST_LOG` overrides it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use u_timetable::report::RunLog;
use u_timetable::validation::{unknown_demands, validate_catalog};
use u_timetable::{loader, Catalog, SearchConfig, TimetableSearch};

#[derive(Parser)]
#[command(name = "u-timetable")]
#[command(about = "Search a weekly course timetable with a genetic algorithm")]
struct Cli {
    /// Tab-delimited course catalog (header row first)
    courses: PathBuf,
    /// Tab-delimited student demand list
    demands: PathBuf,
    /// JSON search configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Run log output file (default: stdout)
    #[arg(short, long)]
    log: Option<PathBuf>,
    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
    /// Generation ceiling
    #[arg(short, long)]
    generations: Option<usize>,
    /// Population size
    #[arg(short, long)]
    population: Option<usize>,
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => SearchConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(n) = cli.generations {
        config = config.with_max_generations(n);
    }
    if let Some(n) = cli.population {
        config = config.with_population_size(n);
    }

    let courses = loader::read_catalog_file(&cli.courses)
        .with_context(|| format!("reading courses {}", cli.courses.display()))?;
    let demands = loader::read_demands_file(&cli.demands)
        .with_context(|| format!("reading demands {}", cli.demands.display()))?;

    if let Err(errors) = validate_catalog(&courses, &config.placement) {
        for e in &errors {
            warn!(kind = ?e.kind, "{}", e.message);
        }
        anyhow::bail!("catalog failed validation with {} error(s)", errors.len());
    }

    let catalog = Arc::new(Catalog::new(courses));
    for id in unknown_demands(&demands, &catalog) {
        warn!(course = %id, "demanded course not in catalog");
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, "random seed");
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut search = TimetableSearch::new(config, catalog, demands)?;
    let writer: Box<dyn Write> = match &cli.log {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating log {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    let mut log = RunLog::new(writer);
    let outcome = search.run(&mut rng, &mut log)?;

    info!(
        fitness = outcome.best.fitness(),
        generations = outcome.generations,
        "done"
    );
    Ok(())
}

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vampire_rhythm_charter::jobs::{run_job, JobList, RunOptions};
use vampire_rhythm_charter::validate::validate;
use vampire_rhythm_charter::{Chart, GeneratorConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Procedural chart generator for Vampire Rhythm", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate charts from a chart list (the built-in stage list if none is given)
    Generate {
        /// JSON array of {title, artist, duration | audio, bpm, output_path, seed?}
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory that relative output paths are written under
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Base seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Check chart files for ordering, tail buffers, strengths and positions
    Validate {
        #[arg(required = true)]
        charts: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_default_env()
        .filter_level(level.parse()?)
        .init();

    // load .env if present (so env overrides work)
    let _ = dotenvy::dotenv();

    match args.command {
        Some(Command::Validate { charts }) => validate_charts(&charts),
        Some(Command::Generate { config, output_dir, seed }) => generate_charts(config, output_dir, seed),
        None => generate_charts(None, None, None),
    }
}

fn generate_charts(config: Option<PathBuf>, output_dir: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let config = config.or_else(|| std::env::var("CHART_CONFIG").ok().map(PathBuf::from));
    let output_dir = output_dir.or_else(|| std::env::var("CHARTS_DIR").ok().map(PathBuf::from));

    let jobs = match &config {
        Some(path) => {
            log::info!("Loading chart list from {}", path.display());
            JobList::load(path)?
        }
        None => {
            log::info!("No chart list given, using built-in stage tracks");
            JobList::builtin()
        }
    };

    let options = RunOptions {
        output_dir,
        seed,
        generator: GeneratorConfig::default(),
    };

    for (index, job) in jobs.jobs.iter().enumerate() {
        let report = run_job(index, job, &options)?;
        println!("{}", report);
    }

    println!("\nAll charts generated successfully!");
    Ok(())
}

fn validate_charts(paths: &[PathBuf]) -> Result<()> {
    let config = GeneratorConfig::default();
    let mut failed = 0;

    for path in paths {
        let chart = Chart::load(path)?;
        let issues = validate(&chart, &config);

        if issues.is_empty() {
            println!("{}: ok ({} notes)", path.display(), chart.notes.len());
            continue;
        }

        failed += 1;
        println!("{}: {} issue(s)", path.display(), issues.len());
        for issue in issues {
            println!("  - {}", issue);
        }
    }

    if failed > 0 {
        return Err(anyhow!("{} of {} chart(s) failed validation", failed, paths.len()));
    }

    log::info!("✓ All charts valid");
    Ok(())
}

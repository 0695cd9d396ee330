use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use vampire_rhythm_sprites::optimize_png;

#[derive(Parser, Debug)]
#[command(author, version, about = "Losslessly shrink PNG sprite sheets", long_about = None)]
struct Args {
    /// PNG files to re-encode
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write results here instead of overwriting the inputs
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_default_env()
        .filter_level(level.parse()?)
        .init();

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    for input in &args.inputs {
        let output = match (&args.out_dir, input.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => input.clone(),
        };

        println!("Optimizing {}...", input.display());
        let report = optimize_png(input, &output)?;
        println!("{}", report);

        if report.saved_bytes() < 0 {
            log::warn!("{} grew after re-encoding", output.display());
        }
    }

    println!("\nOptimization complete!");
    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use dungeon_core::analysis::run_seed_sweep;
use dungeon_core::logging::{init_tracing, LogLevel, TracingConfig};
use dungeon_core::{GeneratorConfig, Generator, ModuleCatalog};

#[derive(Parser, Debug)]
#[command(name = "dungeon-gen")]
#[command(about = "Grow a procedural dungeon layout and export it as JSON", long_about = None)]
struct Args {
    /// Generator config (.ron or .json); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Module catalog (.ron or .json); the built-in catalog when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long)]
    iterations: Option<u32>,

    /// Skip the pacing and settle delays
    #[arg(long)]
    no_pacing: bool,

    /// Write the layout here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the generation report to stderr
    #[arg(long)]
    report: bool,

    /// Run a parallel sweep over N derived seeds and print its summary
    #[arg(long, value_name = "N")]
    sweep: Option<usize>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&TracingConfig::default().with_level(LogLevel::from_verbosity(args.verbose)));

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if args.no_pacing {
        config = config.without_pacing();
    }

    let catalog = match &args.catalog {
        Some(path) => ModuleCatalog::load(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => ModuleCatalog::standard(),
    };

    if let Some(runs) = args.sweep {
        let summary = run_seed_sweep(&config, &catalog, runs)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let mut generator = Generator::new(config, catalog)?;
    generator.run_paced(std::thread::sleep);
    let (world, _, report) = generator.into_parts();

    if args.report {
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    let json = world.layout().to_json_pretty();
    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing layout to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

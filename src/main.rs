use std::fs;
use std::path::PathBuf;

use clap::Parser;
use intermodal::{Scenario, ScenarioError};
use log::info;

/// Multimodal route planner with penalized movement sequences
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
struct Args {
    /// Scenario TOML file
    #[arg(required = true)]
    scenario: PathBuf,
    /// Write the restriction automaton in Graphviz format
    #[arg(long)]
    dot: Option<PathBuf>,
    /// Write the restriction automaton as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ScenarioError> {
    let scenario = Scenario::load(&args.scenario)?;
    let built = scenario.build()?;

    if let Some(path) = &args.dot {
        fs::write(path, built.automaton.to_dot(|road_edge| road_edge.to_string()))?;
        info!("Automaton written to {}", path.display());
    }
    if let Some(path) = &args.snapshot {
        fs::write(path, serde_json::to_string(&built.automaton.to_snapshot())?)?;
        info!("Automaton snapshot written to {}", path.display());
    }

    let outcomes = built.run();
    let output = if args.pretty {
        serde_json::to_string_pretty(&outcomes)?
    } else {
        serde_json::to_string(&outcomes)?
    };
    println!("{output}");
    Ok(())
}

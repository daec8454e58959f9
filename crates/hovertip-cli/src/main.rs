use anyhow::{Context, Result};
use clap::Parser;
use hovertip_tracker::TooltipConfig;
use std::path::PathBuf;

mod scenario;

use scenario::Scenario;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file describing the widget tree and the input to replay
    scenario: PathBuf,

    /// Tooltip config file; defaults to the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the replay report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TooltipConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TooltipConfig::load(),
    };

    let text = std::fs::read_to_string(&args.scenario)
        .with_context(|| format!("reading scenario {}", args.scenario.display()))?;
    let scenario: Scenario = serde_json::from_str(&text)
        .with_context(|| format!("parsing scenario {}", args.scenario.display()))?;

    let report = scenario::replay(&scenario, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for step in &report {
            println!("{}", step);
        }
    }

    Ok(())
}

//! Command-line driver: loads a board file, drives its inputs and prints its outputs.

use std::path::PathBuf;

use clap::Parser;
use eyre::{eyre, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wiregrid::{circuits::factory, io, SimConfig, State};

#[derive(Parser, Debug)]
#[command(name = "wiregrid")]
#[command(about = "Simulate a logic board file", long_about = None)]
struct Args {
    /// Board file to load
    file: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value = "1")]
    ticks: usize,

    /// RON file with simulation settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Drive a top-level input, as NAME=STATE (e.g. A=HIGH)
    #[arg(short, long = "set", value_parser = parse_assignment)]
    set: Vec<(String, State)>,

    /// Print the known component types and exit
    #[arg(long)]
    list_components: bool,
}

fn parse_assignment(arg: &str) -> Result<(String, State), String> {
    let (name, state) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=STATE, got {arg:?}"))?;
    let state = state.parse().map_err(|e| format!("{e}"))?;
    Ok((name.trim().to_owned(), state))
}

fn main() -> eyre::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .wrap_err_with(|| format!("loading {}", path.display()))?,
        None => SimConfig::default(),
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if args.list_components {
        let registry = factory::registry();
        for id in registry.ids() {
            let id = id.as_str();
            let details = registry.default_details(id).unwrap_or_default();
            println!("{id:<14} {details}");
        }
        return Ok(());
    }

    let path = args.file.ok_or_else(|| eyre!("no board file given"))?;
    let mut board =
        io::load_from_path(&path).wrap_err_with(|| format!("loading {}", path.display()))?;

    for (name, state) in &args.set {
        board.set_input(name, *state)?;
    }

    for tick in 0..args.ticks {
        let stats = board.tick_with(&config);
        if stats.hit_limit {
            info!(tick, passes = stats.settle_passes, "tick cut short by pass limit");
        }
    }

    for output in board.outputs() {
        let state = board.output(output.name())?;
        println!("{} = {state}", output.name());
    }
    Ok(())
}

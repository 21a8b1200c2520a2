use std::path::PathBuf;

use anyhow::Context;
use birthday_party::{config::PartyConfig, PartyApp};
use clap::Parser;

/// Scripted 3D birthday party
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML config file; defaults apply for anything it leaves out
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cake model (.obj), overrides the config
    #[arg(long)]
    model: Option<PathBuf>,

    /// RNG seed for balloon, candle and confetti placement
    #[arg(long)]
    seed: Option<u64>,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PartyConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PartyConfig::default(),
    };
    if let Some(model) = args.model {
        config.assets.model_path = model;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    PartyApp::new(config)?.run()?;
    Ok(())
}

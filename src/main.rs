use anomfit::manager::Manager;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// Whitespace-delimited `YYYYMM value` file with one header line.
    #[arg(long)]
    data_file: PathBuf,

    /// Optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for charts and summaries.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fit the polynomial trend.
    Fit,

    /// Check the series against the empirical rule.
    Distribution,

    /// Run both analyses.
    All,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(&args.data_file, args.config.as_deref(), args.out_dir)
        .context("failed to construct mgr")?;

    match args.command {
        Command::Fit => {
            mgr.run_fit()?;
        }
        Command::Distribution => {
            mgr.run_distribution()?;
        }
        Command::All => {
            mgr.run_fit()?;
            println!();
            mgr.run_distribution()?;
        }
    }

    Ok(())
}

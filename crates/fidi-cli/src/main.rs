//! Fidi CLI - command-line front end for the fidi compressor.

mod commands;
mod settings;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fidi")]
#[command(author, version, about = "Stereo-linked dynamic range compressor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress an audio file
    Process(commands::process::ProcessArgs),

    /// Print the static transfer curve for a set of parameters
    Curve(commands::curve::CurveArgs),

    /// List the compressor parameters with ranges and defaults
    Params(commands::params::ParamsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Curve(args) => commands::curve::run(args),
        Commands::Params(args) => commands::params::run(args),
    }
}

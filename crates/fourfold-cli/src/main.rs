//! fourfold CLI - offline host for the fourfold units.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fourfold")]
#[command(author, version, about = "fourfold offline unit host", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available units and their parameters
    Units(commands::units::UnitsArgs),

    /// Render an oscillator unit to a mono WAV file
    Render(commands::render::RenderArgs),

    /// Process a WAV file through an effect unit
    Process(commands::process::ProcessArgs),

    /// List, show, and save presets
    Presets(commands::presets::PresetsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Units(args) => commands::units::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Process(args) => commands::process::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}

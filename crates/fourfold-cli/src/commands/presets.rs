//! Preset management commands.

use super::common::{build_unit, load_preset, parse_key_val};
use anyhow::bail;
use clap::{Args, Subcommand};
use fourfold_config::{Preset, factory_presets, validate_preset};
use std::path::PathBuf;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List factory presets
    List {
        /// Show only presets for this unit
        #[arg(short, long)]
        unit: Option<String>,
    },

    /// Show details of a preset
    Show {
        /// Preset name or path
        name: String,
    },

    /// Check a preset against the unit's parameter ranges
    Validate {
        /// Preset name or path
        name: String,
    },

    /// Save a unit's full parameter state as a preset file
    Save {
        /// Unit id
        unit: String,

        /// Output TOML file
        output: PathBuf,

        /// Preset name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Start from this preset instead of the unit defaults
        #[arg(long)]
        from: Option<String>,

        /// Parameter overrides (e.g. "fm_depth1=400")
        #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
        param: Vec<(String, String)>,

        /// Overwrite if the file already exists
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { unit } => list_presets(unit.as_deref()),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Validate { name } => check_preset(&name),
        PresetsCommand::Save {
            unit,
            output,
            name,
            description,
            from,
            param,
            force,
        } => save_preset(SaveRequest {
            unit: &unit,
            output,
            name,
            description,
            from: from.as_deref(),
            overrides: &param,
            force,
        }),
    }
}

fn list_presets(unit: Option<&str>) -> anyhow::Result<()> {
    println!("Factory Presets:");
    println!("================");
    for preset in factory_presets()
        .into_iter()
        .filter(|p| unit.is_none_or(|u| p.unit == u))
    {
        let desc = preset.description.as_deref().unwrap_or("");
        println!("  {:14} {:8} - {}", preset.name, preset.unit, desc);
    }
    println!();
    println!("Use 'fourfold presets show <name>' for parameter values.");
    Ok(())
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();
    if let Some(desc) = &preset.description {
        println!("Description: {}", desc);
    }
    println!("Unit:        {}", preset.unit);
    println!("Sample Rate: {} Hz", preset.sample_rate);
    println!("Note:        {}", preset.note);
    println!();
    println!("Parameters ({}):", preset.params.len());
    for (key, value) in &preset.params {
        println!("  {} = {}", key, value);
    }
    Ok(())
}

fn check_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;
    validate_preset(&preset)?;
    println!("Preset '{}' is valid for unit '{}'.", preset.name, preset.unit);
    Ok(())
}

struct SaveRequest<'a> {
    unit: &'a str,
    output: PathBuf,
    name: Option<String>,
    description: Option<String>,
    from: Option<&'a str>,
    overrides: &'a [(String, String)],
    force: bool,
}

fn save_preset(req: SaveRequest<'_>) -> anyhow::Result<()> {
    if req.output.exists() && !req.force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            req.output.display()
        );
    }

    let base = req.from.map(load_preset).transpose()?;
    let sample_rate = base.as_ref().map_or(48000, |p| p.sample_rate);
    let unit = build_unit(req.unit, sample_rate, base.as_ref(), req.overrides)?;

    let name = req.name.unwrap_or_else(|| {
        req.output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string()
    });
    let mut preset = Preset::from_unit(name, req.unit, &unit);
    if let Some(base) = &base {
        preset = preset.with_note(base.note);
    }
    if let Some(desc) = req.description {
        preset = preset.with_description(desc);
    }

    preset.save(&req.output)?;
    println!("Saved preset '{}' to {}", preset.name, req.output.display());
    Ok(())
}

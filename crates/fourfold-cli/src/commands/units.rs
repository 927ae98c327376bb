//! Unit listing and parameter information command.

#![allow(clippy::print_literal)]

use anyhow::Context;
use clap::Args;
use fourfold_config::{UnitKind, UnitRegistry};
use fourfold_core::{DEFAULT_SAMPLE_RATE, ParamDescriptor, ParamFlags, ParameterInfo};

#[derive(Args)]
pub struct UnitsArgs {
    /// Show parameters for a specific unit
    #[arg(value_name = "UNIT")]
    unit: Option<String>,
}

pub fn run(args: UnitsArgs) -> anyhow::Result<()> {
    let registry = UnitRegistry::new();

    let Some(id) = &args.unit else {
        println!("Available Units");
        println!("===============");
        for kind in [
            UnitKind::Oscillator,
            UnitKind::InsertEffect,
            UnitKind::ModulationEffect,
        ] {
            println!();
            println!("{}:", kind.name());
            for desc in registry.units_of_kind(kind) {
                println!("  {:10} - {}", desc.id, desc.description);
            }
        }
        println!();
        println!("Use 'fourfold units <unit>' for parameter details.");
        return Ok(());
    };

    let descriptor = registry
        .descriptor(id)
        .with_context(|| format!("Unknown unit: {}", id))?;
    let unit = registry
        .create(id, DEFAULT_SAMPLE_RATE)
        .with_context(|| format!("Unknown unit: {}", id))?;

    println!("{} ({})", descriptor.name, descriptor.id);
    println!("{}", "=".repeat(descriptor.name.len() + descriptor.id.len() + 3));
    println!();
    println!("{}", descriptor.description);
    println!("Kind: {} - {}", descriptor.kind.name(), descriptor.kind.description());
    println!();
    println!("Parameters:");
    println!();
    println!(
        "  {:14}  {:12}  {:>8}  {}",
        "Id", "Name", "Default", "Range"
    );
    println!(
        "  {:14}  {:12}  {:>8}  {}",
        "--", "----", "-------", "-----"
    );
    for index in 0..unit.param_count() {
        if let Some(desc) = unit.param_info(index) {
            println!(
                "  {:14}  {:12}  {:>8}  {}",
                desc.string_id,
                desc.name,
                format_value(&desc, desc.default),
                format_range(&desc)
            );
        }
    }

    println!();
    println!("Example usage:");
    println!();
    let example = unit
        .param_info(0)
        .map(|d| format!(" --param {}={}", d.string_id, format_value(&d, d.default)))
        .unwrap_or_default();
    match descriptor.kind {
        UnitKind::Oscillator => {
            println!("  fourfold render {} out.wav --note 60{}", descriptor.id, example);
        }
        UnitKind::InsertEffect | UnitKind::ModulationEffect => {
            println!(
                "  fourfold process {} input.wav output.wav{}",
                descriptor.id, example
            );
        }
    }

    Ok(())
}

fn format_value(desc: &ParamDescriptor, value: f32) -> String {
    if desc.flags.contains(ParamFlags::STEPPED) {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn format_range(desc: &ParamDescriptor) -> String {
    format!(
        "{}..{}{}",
        format_value(desc, desc.min),
        format_value(desc, desc.max),
        desc.unit.suffix()
    )
}

//! File-based effect processing command.

use super::common::{build_unit, linear_to_db, load_preset, parse_key_val, peak};
use crate::wav::{WavSpec, check_bit_depth, read_wav_stereo, write_wav};
use anyhow::bail;
use clap::Args;
use fourfold_config::UnitInstance;
use fourfold_core::{InsertEffect, ModulationEffect};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Effect unit id (e.g. phaser, chorus)
    #[arg(value_name = "UNIT")]
    unit: String,

    /// Input WAV file (mono input is duplicated to stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (stereo)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or TOML file
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter overrides (e.g. "phaser_rate=0.2")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Frames per host block
    #[arg(long, default_value = "64")]
    block: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block == 0 {
        bail!("block size must be at least 1");
    }
    let bits = check_bit_depth(args.bit_depth)?;

    let (input, spec) = read_wav_stereo(&args.input)?;
    let frames = input.len() / 2;
    println!(
        "Read {} frames, {} Hz, {:.2}s from {}",
        frames,
        spec.sample_rate,
        frames as f32 / spec.sample_rate as f32,
        args.input.display()
    );

    let preset = args.preset.as_deref().map(load_preset).transpose()?;
    let mut unit = build_unit(&args.unit, spec.sample_rate, preset.as_ref(), &args.param)?;

    tracing::info!(unit = %args.unit, frames, block = args.block, "processing");
    let output = process(&mut unit, &input, args.block)?;

    write_wav(
        &args.output,
        &output,
        WavSpec {
            channels: 2,
            sample_rate: spec.sample_rate,
            bits_per_sample: bits,
        },
    )?;

    println!("Wrote {}", args.output.display());
    println!(
        "  Input peak {:.1} dB, output peak {:.1} dB",
        linear_to_db(peak(&input)),
        linear_to_db(peak(&output))
    );

    Ok(())
}

/// Runs interleaved stereo through an effect in blocks of `block` frames.
///
/// Modulation effects see a silent sub bus.
fn process(unit: &mut UnitInstance, input: &[f32], block: usize) -> anyhow::Result<Vec<f32>> {
    let chunk = block * 2;
    match unit {
        UnitInstance::InsertEffect(fx) => {
            let mut output = input.to_vec();
            for frames in output.chunks_mut(chunk) {
                fx.process_block(frames);
            }
            Ok(output)
        }
        UnitInstance::ModulationEffect(fx) => {
            let mut output = vec![0.0; input.len()];
            let silence = vec![0.0; chunk];
            let mut sub_out = vec![0.0; chunk];
            for (main_in, main_out) in input.chunks(chunk).zip(output.chunks_mut(chunk)) {
                let n = main_in.len();
                fx.process_block(main_in, main_out, &silence[..n], &mut sub_out[..n]);
            }
            Ok(output)
        }
        UnitInstance::Oscillator(_) => {
            bail!("unit is an oscillator; use 'fourfold render'")
        }
    }
}

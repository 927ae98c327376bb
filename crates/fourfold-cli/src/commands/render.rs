//! Offline oscillator rendering command.

use super::common::{build_unit, linear_to_db, load_preset, parse_key_val, peak};
use crate::wav::{WavSpec, check_bit_depth, write_wav};
use anyhow::{Context, bail};
use clap::Args;
use fourfold_core::{NoteParams, OscillatorUnit, q31_to_f32};
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Oscillator unit id (e.g. fm4, unison)
    #[arg(value_name = "UNIT")]
    unit: String,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// MIDI note to play (defaults to the preset note, else 60)
    #[arg(short, long)]
    note: Option<u8>,

    /// Fine pitch in 1/256 semitone
    #[arg(long, default_value = "0")]
    fine: u8,

    /// Duration in seconds
    #[arg(short, long, default_value = "2.0")]
    duration: f32,

    /// Seconds after which note-off is sent (defaults to the full duration)
    #[arg(long)]
    gate: Option<f32>,

    /// Frames per host block
    #[arg(long, default_value = "64")]
    block: usize,

    /// Sample rate in Hz (defaults to the preset rate, else 48000)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Preset name or TOML file
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter overrides (e.g. "uni_voices=5")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if args.block == 0 {
        bail!("block size must be at least 1");
    }
    if !(args.duration.is_finite() && args.duration > 0.0) {
        bail!("duration must be positive");
    }
    let bits = check_bit_depth(args.bit_depth)?;

    let preset = args.preset.as_deref().map(load_preset).transpose()?;
    let sample_rate = args
        .sample_rate
        .or(preset.as_ref().map(|p| p.sample_rate))
        .unwrap_or(48000);
    let note = args
        .note
        .or(preset.as_ref().map(|p| p.note))
        .unwrap_or(60);

    let mut unit = build_unit(&args.unit, sample_rate, preset.as_ref(), &args.param)?;
    let osc = unit
        .as_oscillator_mut()
        .with_context(|| format!("'{}' is an effect; use 'fourfold process'", args.unit))?;

    let frames = (args.duration * sample_rate as f32).round() as usize;
    let gate_frames = args
        .gate
        .map_or(frames, |g| (g.max(0.0) * sample_rate as f32).round() as usize);
    let params = NoteParams {
        pitch: (u16::from(note) << 8) | u16::from(args.fine),
        shape_lfo: 0,
    };

    tracing::info!(unit = %args.unit, note, sample_rate, frames, block = args.block, "rendering");
    let output = render(osc, &params, frames, gate_frames, args.block);

    write_wav(
        &args.output,
        &output,
        WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: bits,
        },
    )?;

    println!(
        "Rendered {} frames ({:.2}s) of '{}' at note {} to {}",
        frames,
        frames as f32 / sample_rate as f32,
        args.unit,
        note,
        args.output.display()
    );
    println!("  Peak {:.1} dB", linear_to_db(peak(&output)));

    Ok(())
}

/// Drives an oscillator in fixed-size blocks, sending note-off once
/// `gate_frames` have elapsed.
fn render(
    osc: &mut (dyn OscillatorUnit + Send),
    params: &NoteParams,
    frames: usize,
    gate_frames: usize,
    block: usize,
) -> Vec<f32> {
    let mut output = Vec::with_capacity(frames);
    let mut buffer = vec![0i32; block];
    let mut gate_open = true;

    osc.note_on(params);
    while output.len() < frames {
        if gate_open && output.len() >= gate_frames {
            osc.note_off(params);
            gate_open = false;
        }
        let n = block.min(frames - output.len());
        osc.process_block(params, &mut buffer[..n]);
        output.extend(buffer[..n].iter().map(|&s| q31_to_f32(s)));
    }
    if gate_open {
        osc.note_off(params);
    }

    output
}

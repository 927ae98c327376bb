//! Extreme parameter tests for both effect units.
//!
//! Every parameter is driven to its descriptor minimum and maximum, and the
//! units are run at 8 kHz and 192 kHz as well as 48 kHz.

use fourfold_core::{InsertEffect, ModulationEffect, ParameterInfo, Unit};
use fourfold_effects::{QuadraturePhaser, TriPhaseChorus};

const SAMPLE_RATES: [f32; 3] = [8000.0, 48000.0, 192000.0];
const NUM_FRAMES: usize = 2000;

fn test_signal() -> Vec<f32> {
    (0..NUM_FRAMES * 2)
        .map(|i| match (i / 2) % 3 {
            0 => 0.5,
            1 => -0.5,
            _ => 0.0,
        })
        .collect()
}

fn set_all(unit: &mut impl ParameterInfo, max: bool) {
    for i in 0..unit.param_count() {
        if let Some(desc) = unit.param_info(i) {
            unit.set_param(i, if max { desc.max } else { desc.min });
        }
    }
}

fn assert_finite(label: &str, samples: &[f32]) {
    for (i, x) in samples.iter().enumerate() {
        assert!(x.is_finite(), "{label}: non-finite output at {i}: {x}");
    }
}

fn run_phaser(sample_rate: f32, max: bool) {
    let mut phaser = QuadraturePhaser::new(sample_rate);
    set_all(&mut phaser, max);
    let mut frames = test_signal();
    phaser.process_block(&mut frames);
    assert_finite(&format!("phaser @ {sample_rate} max={max}"), &frames);
}

fn run_chorus(sample_rate: f32, max: bool) {
    let mut chorus = TriPhaseChorus::new(sample_rate);
    set_all(&mut chorus, max);
    let input = test_signal();
    let mut main_out = vec![0.0; input.len()];
    let mut sub_out = vec![0.0; input.len()];
    chorus.process_block(&input, &mut main_out, &input, &mut sub_out);
    assert_finite(&format!("chorus @ {sample_rate} max={max}"), &main_out);
}

#[test]
fn phaser_extreme_params() {
    for sr in SAMPLE_RATES {
        run_phaser(sr, false);
        run_phaser(sr, true);
    }
}

#[test]
fn chorus_extreme_params() {
    for sr in SAMPLE_RATES {
        run_chorus(sr, false);
        run_chorus(sr, true);
    }
}

#[test]
fn phaser_full_negative_feedback_is_stable() {
    let mut phaser = QuadraturePhaser::new(48000.0);
    let fb = phaser.param_index_by_string_id("phaser_feedback").unwrap();
    phaser.set_param(fb, -1.0);
    let mut frames = test_signal();
    for _ in 0..20 {
        phaser.process_block(&mut frames);
        frames = test_signal();
    }
    phaser.process_block(&mut frames);
    assert_finite("phaser fb=-1", &frames);
    assert!(frames.iter().all(|x| x.abs() < 20.0));
}

#[test]
fn silence_in_silence_out() {
    let mut phaser = QuadraturePhaser::new(48000.0);
    set_all(&mut phaser, true);
    let mut frames = vec![0.0_f32; 1024];
    phaser.process_block(&mut frames);
    assert!(frames.iter().all(|&x| x == 0.0));

    let mut chorus = TriPhaseChorus::new(48000.0);
    set_all(&mut chorus, true);
    let silence = vec![0.0_f32; 1024];
    let mut out = vec![1.0_f32; 1024];
    let mut sub = vec![1.0_f32; 1024];
    chorus.process_block(&silence, &mut out, &silence, &mut sub);
    assert!(out.iter().all(|&x| x == 0.0));
    assert!(sub.iter().all(|&x| x == 0.0));
}

#[test]
fn empty_block_is_noop() {
    let mut phaser = QuadraturePhaser::new(48000.0);
    phaser.process_block(&mut []);
    let mut chorus = TriPhaseChorus::new(48000.0);
    chorus.process_block(&[], &mut [], &[], &mut []);
    chorus.init(0, 0);
}

//! Basic functions, such as shape generators.
//!
//! Every generator returns a unit-amplitude value in [-1, 1].

use std::f64::consts::TAU;

use crate::types::{Frequency, Time};

/// The fractional part of `x`, always in [0, 1) even for negative inputs.
pub fn fract(x: f64) -> f64 {
    x - f64::floor(x)
}

/// Generate a sine wave of a given frequency at a given time, rising through zero at `time = 0`.
pub fn sine_wave(time: Time, frequency: Frequency) -> f64 {
    let phase = TAU * frequency * time;
    phase.sin()
}

/// Generate a square wave of a given frequency at a given time, high for the first `duty` fraction
/// of each period and low for the rest.
pub fn square_wave(time: Time, frequency: Frequency, duty: f64) -> f64 {
    let period = 1.0 / frequency;
    if fract(time / period) < duty { 1.0 } else { -1.0 }
}

/// Generate a triangle wave of a given frequency at a given time, at its minimum at the start of
/// each period and its maximum half way through.
pub fn triangle_wave(time: Time, frequency: Frequency) -> f64 {
    // https://en.wikipedia.org/wiki/Triangle_wave#Definition
    let period = 1.0 / frequency;
    let distance = fract(time / period + 0.5) - 0.5;
    2.0 * f64::abs(2.0 * distance) - 1.0
}

//! Sweeps a signal across the screen, producing one sample per horizontal pixel column.

use crate::scale::DisplayScale;
use crate::signal::{Coupling, SignalModel};
use crate::types::{Divisions, Time, Voltage, GRID_WIDTH_DIVISIONS};

/// Empirical correction to the width of the time base, calibrated so that a 50Hz signal at 2ms/div
/// spans the ten divisions of the screen.
pub const TIME_SCALE_CORRECTION: f64 = 1.039;

/// The smallest number of samples a sweep produces.
pub const MIN_SAMPLE_COUNT: usize = 2;

/// Below this magnitude the DC level is not worth marking on screen.
const DC_MARKER_THRESHOLD: Voltage = 1e-6;

/// One sampled point of a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// The horizontal position, in samples from the left edge of the screen.
    pub index: usize,
    pub value: Voltage,
}

/// An iterator over the samples of one sweep across the screen.
///
/// A clone of a sweep replays the same samples from the same position; sweeps over identical
/// inputs always yield identical samples.
#[derive(Debug, Clone)]
pub struct Sweep<'a> {
    signal: &'a SignalModel,
    coupling: Coupling,
    time_step: Time,
    time_offset: Time,
    index: usize,
    count: usize,
}

impl<'a> Sweep<'a> {
    /// Prepare a sweep of `count` samples, raised to at least [`MIN_SAMPLE_COUNT`].
    pub fn new(signal: &'a SignalModel, scale: &DisplayScale, coupling: Coupling, count: usize) -> Self {
        let count = count.max(MIN_SAMPLE_COUNT);
        let seconds_per_division = scale.seconds_per_division();
        let total_time = seconds_per_division * GRID_WIDTH_DIVISIONS * TIME_SCALE_CORRECTION;

        Self {
            signal,
            coupling,
            time_step: total_time / (count - 1) as f64,
            time_offset: scale.horizontal_pan() * seconds_per_division,
            index: 0,
            count,
        }
    }

    /// The signal time at which sample `index` is taken.
    pub fn time_at(&self, index: usize) -> Time {
        index as f64 * self.time_step - self.time_offset
    }
}

impl Iterator for Sweep<'_> {
    type Item = SamplePoint;

    fn next(&mut self) -> Option<SamplePoint> {
        if self.index >= self.count {
            return None;
        }

        let index = self.index;
        self.index += 1;

        let value = self.signal.evaluate_coupled(self.time_at(index), self.coupling);
        Some(SamplePoint { index, value })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Sweep<'_> {}

/// A finished sweep plus what a renderer needs to place it on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub points: Vec<SamplePoint>,
    /// The DC offset of the signal, whatever the coupling.
    pub dc_level: Voltage,
    pub coupling: Coupling,
    pub volts_per_division: f64,
    /// The zero volt line, in divisions from the top of the screen.
    pub zero_line: Divisions,
}

impl Trace {
    /// Convert a value to its vertical position in divisions from the top of the screen.
    pub fn vertical_position(&self, value: Voltage) -> Divisions {
        self.zero_line - value / self.volts_per_division
    }

    /// The level to draw the DC marker line at, if one should be drawn. The marker is only shown
    /// with DC coupling and a non-negligible offset.
    pub fn dc_marker(&self) -> Option<Voltage> {
        match self.coupling {
            Coupling::DC if self.dc_level.abs() > DC_MARKER_THRESHOLD => Some(self.dc_level),
            _ => None,
        }
    }
}

/// Sample `count` points of `signal` across the screen at the given scale and coupling.
pub fn sample(signal: &SignalModel, scale: &DisplayScale, coupling: Coupling, count: usize) -> Trace {
    let points = Sweep::new(signal, scale, coupling, count).collect();

    Trace {
        points,
        dc_level: signal.dc_offset,
        coupling,
        volts_per_division: scale.volts_per_division(),
        zero_line: scale.vertical_pan(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscillators::WaveShape;
    use crate::signal::Signal;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn sweep_times(scale: &DisplayScale, count: usize) -> Vec<f64> {
        let total = scale.seconds_per_division() * 10.0 * 1.039;
        let offset = scale.horizontal_pan() * scale.seconds_per_division();
        let step = total / (count - 1) as f64;
        (0..count).map(|i| i as f64 * step - offset).collect()
    }

    #[test]
    fn test_sine_matches_formula() {
        let signal = SignalModel::new(WaveShape::Sine, 2.0, 0.5, 50.0);
        let scale = DisplayScale::default();
        let trace = sample(&signal, &scale, Coupling::DC, 400);

        assert_eq!(trace.points.len(), 400);
        for (point, time) in trace.points.iter().zip(sweep_times(&scale, 400)) {
            let expected = 2.0 * f64::sin(2.0 * PI * 50.0 * time) + 0.5;
            assert_relative_eq!(point.value, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_square_matches_formula() {
        let mut signal = SignalModel::new(WaveShape::Square, 1.5, -1.0, 80.0);
        signal.oscillator.duty = 0.3;
        let mut scale = DisplayScale::new(2, 6);
        scale.set_horizontal_pan(2.3);

        let trace = sample(&signal, &scale, Coupling::DC, 257);
        for (point, time) in trace.points.iter().zip(sweep_times(&scale, 257)) {
            let period = 1.0 / 80.0;
            let phase = time / period - f64::floor(time / period);
            let expected = if phase < 0.3 { 0.5 } else { -2.5 };
            assert_eq!(point.value, expected);
        }
    }

    #[test]
    fn test_triangle_matches_formula() {
        let signal = SignalModel::new(WaveShape::Triangle, 3.0, 2.0, 125.0);
        let scale = DisplayScale::default();

        let trace = sample(&signal, &scale, Coupling::DC, 300);
        for (point, time) in trace.points.iter().zip(sweep_times(&scale, 300)) {
            let x = time * 125.0;
            let expected = 3.0 * (2.0 * f64::abs(2.0 * (x - f64::floor(x + 0.5))) - 1.0) + 2.0;
            assert_relative_eq!(point.value, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ac_coupling_removes_offset() {
        let scale = DisplayScale::default();
        for shape in WaveShape::ALL {
            let with_offset = SignalModel::new(shape, 2.0, 1.7, 60.0);
            let without_offset = SignalModel::new(shape, 2.0, 0.0, 60.0);

            let ac = sample(&with_offset, &scale, Coupling::AC, 128);
            let dc = sample(&without_offset, &scale, Coupling::DC, 128);
            assert_eq!(ac.points, dc.points);
        }
    }

    #[test]
    fn test_pan_shifts_sampling_origin() {
        let signal = SignalModel::new(WaveShape::Sine, 1.0, 0.0, 50.0);
        let mut scale = DisplayScale::default();
        scale.set_horizontal_pan(0.0);

        // With no pan the first sample is taken at t = 0.
        let sweep = Sweep::new(&signal, &scale, Coupling::DC, 10);
        assert_eq!(sweep.time_at(0), 0.0);

        // Centred, the first sample is five divisions before t = 0.
        scale.reset_horizontal_pan();
        let sweep = Sweep::new(&signal, &scale, Coupling::DC, 10);
        assert_relative_eq!(sweep.time_at(0), -0.01);
        let first = sweep.clone().next().map(|point| point.value);
        assert_eq!(first, Some(signal.evaluate(-0.01)));
    }

    #[test]
    fn test_sweep_is_restartable() {
        let signal = SignalModel::default();
        let scale = DisplayScale::default();
        let sweep = Sweep::new(&signal, &scale, Coupling::DC, 50);
        assert_eq!(sweep.len(), 50);

        let first: Vec<_> = sweep.clone().collect();
        let second: Vec<_> = sweep.collect();
        assert_eq!(first, second);
        assert_eq!(first.last().map(|point| point.index), Some(49));
    }

    #[test]
    fn test_minimum_sample_count() {
        let signal = SignalModel::default();
        let scale = DisplayScale::default();
        for count in [0, 1, 2] {
            let trace = sample(&signal, &scale, Coupling::DC, count);
            assert_eq!(trace.points.len(), 2);
            assert!(trace.points.iter().all(|point| point.value.is_finite()));
        }
    }

    #[test]
    fn test_trace_layout() {
        let signal = SignalModel::new(WaveShape::Sine, 1.0, 1.0, 50.0);
        let mut scale = DisplayScale::new(3, 7);
        scale.set_vertical_pan(3.0);

        let trace = sample(&signal, &scale, Coupling::DC, 10);
        assert_eq!(trace.volts_per_division, 0.5);
        assert_eq!(trace.dc_level, 1.0);
        assert_eq!(trace.dc_marker(), Some(1.0));
        // One volt at 0.5 V/div is two divisions above the zero line.
        assert_relative_eq!(trace.vertical_position(1.0), 1.0);

        let trace = sample(&signal, &scale, Coupling::AC, 10);
        assert_eq!(trace.dc_marker(), None);

        let flat = SignalModel::new(WaveShape::Sine, 1.0, 0.0, 50.0);
        assert_eq!(sample(&flat, &scale, Coupling::DC, 10).dc_marker(), None);
    }
}

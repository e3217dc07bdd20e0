//! Basic oscillators that can output simple shapes like sine waves.

use std::fmt;

use crate::functions::{sine_wave, square_wave, triangle_wave};
use crate::signal::Signal;
use crate::types::{Frequency, Time, Voltage};

/// The lowest frequency an oscillator runs at. Anything lower, including zero, is raised to this.
pub const MIN_FREQUENCY: Frequency = 1e-6;

/// The range a square wave's duty ratio is kept within.
pub const MIN_DUTY: f64 = 0.05;
pub const MAX_DUTY: f64 = 0.95;

/// The shape of a periodic waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveShape {
    Sine,
    Square,
    Triangle,
}

impl WaveShape {
    /// Every shape, in the order exercises pick from.
    pub const ALL: [WaveShape; 3] = [WaveShape::Sine, WaveShape::Square, WaveShape::Triangle];
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WaveShape::Sine => "sine",
            WaveShape::Square => "square",
            WaveShape::Triangle => "triangle",
        };
        f.write_str(name)
    }
}

/// A periodic oscillator of a given shape, peak amplitude and frequency, centred on zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Oscillator {
    /// The waveform generator used for each sample.
    pub shape: WaveShape,
    /// Peak amplitude; the sign is ignored.
    pub amplitude: Voltage,
    /// Cycles per second; raised to `MIN_FREQUENCY` when evaluated.
    pub frequency: Frequency,
    /// The fraction of each period a square wave spends high. Unused by other shapes.
    pub duty: f64,
}

impl Oscillator {
    /// Create a new oscillator with a 50% duty ratio.
    pub fn new(shape: WaveShape, amplitude: Voltage, frequency: Frequency) -> Self {
        Self {
            shape,
            amplitude,
            frequency,
            duty: 0.5,
        }
    }

    /// Set the duty ratio, clamped to [`MIN_DUTY`, `MAX_DUTY`].
    pub fn with_duty(mut self, duty: f64) -> Self {
        self.duty = duty.clamp(MIN_DUTY, MAX_DUTY);
        self
    }
}

impl Signal for Oscillator {
    fn evaluate(&self, time: Time) -> Voltage {
        let frequency = f64::max(MIN_FREQUENCY, self.frequency);
        let amplitude = self.amplitude.abs();

        let unit = match self.shape {
            WaveShape::Sine => sine_wave(time, frequency),
            WaveShape::Square => square_wave(time, frequency, self.duty.clamp(MIN_DUTY, MAX_DUTY)),
            WaveShape::Triangle => triangle_wave(time, frequency),
        };
        amplitude * unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_amplitude_is_absolute() {
        let oscillator = Oscillator::new(WaveShape::Sine, -3.0, 1.0);
        assert_relative_eq!(oscillator.evaluate(0.25), 3.0);
    }

    #[test]
    fn test_zero_frequency_does_not_blow_up() {
        for shape in WaveShape::ALL {
            let oscillator = Oscillator::new(shape, 1.0, 0.0);
            for i in 0..10 {
                assert!(oscillator.evaluate(f64::from(i) * 0.1).is_finite());
            }
        }
    }

    #[test]
    fn test_duty_is_clamped() {
        assert_eq!(Oscillator::new(WaveShape::Square, 1.0, 1.0).with_duty(0.0).duty, MIN_DUTY);
        assert_eq!(Oscillator::new(WaveShape::Square, 1.0, 1.0).with_duty(2.0).duty, MAX_DUTY);

        // A duty set directly on the field is clamped at evaluation time instead.
        let mut oscillator = Oscillator::new(WaveShape::Square, 1.0, 1.0);
        oscillator.duty = 0.0;
        assert_eq!(oscillator.evaluate(0.01), 1.0);
        assert_eq!(oscillator.evaluate(0.5), -1.0);
    }

    #[test]
    fn test_shapes_scale_with_amplitude() {
        let square = Oscillator::new(WaveShape::Square, 2.5, 10.0).with_duty(0.3);
        assert_eq!(square.evaluate(0.01), 2.5);
        assert_eq!(square.evaluate(0.05), -2.5);

        let triangle = Oscillator::new(WaveShape::Triangle, 2.5, 10.0);
        assert_relative_eq!(triangle.evaluate(0.0), -2.5);
        assert_relative_eq!(triangle.evaluate(0.05), 2.5, epsilon = 1e-9);
    }
}

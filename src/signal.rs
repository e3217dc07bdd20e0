//! The signal fed to the simulated scope and the coupling applied to it.

use std::fmt;

use crate::oscillators::{Oscillator, WaveShape};
use crate::types::{Frequency, Time, Voltage};

/// A trait for signals which can be evaluated at a given time.
pub trait Signal {
    /// Evaluate this signal at the given time, yielding its instantaneous value.
    fn evaluate(&self, time: Time) -> Voltage;
}

/// Whether the DC component of the signal reaches the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coupling {
    /// The DC offset is added to every sample.
    #[default]
    DC,
    /// The DC offset is blocked; only the periodic part is shown.
    AC,
}

impl Coupling {
    /// The opposite coupling.
    pub fn toggled(self) -> Self {
        match self {
            Coupling::DC => Coupling::AC,
            Coupling::AC => Coupling::DC,
        }
    }
}

impl fmt::Display for Coupling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coupling::DC => write!(f, "DC coupling"),
            Coupling::AC => write!(f, "AC coupling"),
        }
    }
}

/// A periodic waveform riding on a DC offset.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalModel {
    /// The AC part of the signal.
    pub oscillator: Oscillator,
    /// Added to every sample under DC coupling, dropped under AC coupling.
    pub dc_offset: Voltage,
}

impl Default for SignalModel {
    /// A 2V, 50Hz sine with no offset.
    fn default() -> Self {
        Self {
            oscillator: Oscillator::new(WaveShape::Sine, 2.0, 50.0),
            dc_offset: 0.0,
        }
    }
}

impl SignalModel {
    /// Create a signal from its shape, peak amplitude, DC offset and frequency.
    pub fn new(shape: WaveShape, amplitude: Voltage, dc_offset: Voltage, frequency: Frequency) -> Self {
        Self {
            oscillator: Oscillator::new(shape, amplitude, frequency),
            dc_offset,
        }
    }

    /// The waveform of the AC part.
    pub fn shape(&self) -> WaveShape {
        self.oscillator.shape
    }

    /// Peak amplitude of the AC part, not counting the offset.
    pub fn amplitude(&self) -> Voltage {
        self.oscillator.amplitude
    }

    /// The signal frequency.
    pub fn frequency(&self) -> Frequency {
        self.oscillator.frequency
    }

    /// Evaluate the signal as seen through the given coupling.
    pub fn evaluate_coupled(&self, time: Time, coupling: Coupling) -> Voltage {
        let value = self.oscillator.evaluate(time);
        match coupling {
            Coupling::DC => value + self.dc_offset,
            Coupling::AC => value,
        }
    }
}

impl Signal for SignalModel {
    /// The full signal, DC offset included.
    fn evaluate(&self, time: Time) -> Voltage {
        self.evaluate_coupled(time, Coupling::DC)
    }
}

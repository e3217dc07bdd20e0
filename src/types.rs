//! Shared type definitions.

/// A point in time on the simulated screen, in seconds.
pub type Time = f64;

/// A signal frequency, in hertz.
pub type Frequency = f64;

/// An instantaneous signal value, in volts.
pub type Voltage = f64;

/// A length measured in screen grid divisions.
pub type Divisions = f64;

/// The number of grid divisions across the screen.
pub const GRID_WIDTH_DIVISIONS: Divisions = 10.0;

/// The number of grid divisions from the bottom to the top of the screen.
pub const GRID_HEIGHT_DIVISIONS: Divisions = 8.0;

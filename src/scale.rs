//! Vertical and horizontal display scale, selected from fixed step tables, plus pan offsets.

use crate::types::{Divisions, GRID_HEIGHT_DIVISIONS, GRID_WIDTH_DIVISIONS};

/// Selectable volts per division, coarsest first.
pub const VOLTS_PER_DIVISION_STEPS: [f64; 12] =
    [5.0, 2.0, 1.0, 0.5, 0.2, 0.1, 0.05, 0.02, 0.01, 0.005, 0.002, 0.001];

/// Selectable seconds per division, coarsest first.
pub const SECONDS_PER_DIVISION_STEPS: [f64; 12] =
    [0.5, 0.2, 0.1, 0.05, 0.02, 0.01, 0.005, 0.002, 0.001, 0.0005, 0.0002, 0.0001];

/// Initial vertical step: 1 V/div.
const DEFAULT_VERTICAL_STEP: usize = 2;

/// Initial horizontal step: 2 ms/div.
const DEFAULT_HORIZONTAL_STEP: usize = 7;

/// The amount one wheel notch moves the trace vertically.
pub const VERTICAL_PAN_STEP: Divisions = 0.2;

/// The active scale selection and pan of the screen.
///
/// Indices always point inside the step tables and pans always lie within the grid: every setter
/// clamps its input.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayScale {
    vertical_step: usize,
    horizontal_step: usize,
    vertical_pan: Divisions,
    horizontal_pan: Divisions,
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self {
            vertical_step: DEFAULT_VERTICAL_STEP,
            horizontal_step: DEFAULT_HORIZONTAL_STEP,
            vertical_pan: GRID_HEIGHT_DIVISIONS / 2.0,
            horizontal_pan: GRID_WIDTH_DIVISIONS / 2.0,
        }
    }
}

impl DisplayScale {
    /// Create a scale at the given step indices with both pans centred.
    pub fn new(vertical_step: usize, horizontal_step: usize) -> Self {
        let mut scale = Self::default();
        scale.set_scale(vertical_step, horizontal_step);
        scale
    }

    /// The index of the active volts per division step; 0 is the coarsest.
    pub fn vertical_step(&self) -> usize {
        self.vertical_step
    }

    /// The index of the active seconds per division step; 0 is the coarsest.
    pub fn horizontal_step(&self) -> usize {
        self.horizontal_step
    }

    /// The vertical position of the zero volt line, in divisions from the top of the screen.
    pub fn vertical_pan(&self) -> Divisions {
        self.vertical_pan
    }

    /// The horizontal position of time zero, in divisions from the left of the screen.
    pub fn horizontal_pan(&self) -> Divisions {
        self.horizontal_pan
    }

    /// The active volts per division.
    pub fn volts_per_division(&self) -> f64 {
        VOLTS_PER_DIVISION_STEPS[self.vertical_step]
    }

    /// The active seconds per division.
    pub fn seconds_per_division(&self) -> f64 {
        SECONDS_PER_DIVISION_STEPS[self.horizontal_step]
    }

    /// Select both steps at once and recentre the screen.
    pub fn set_scale(&mut self, vertical_step: usize, horizontal_step: usize) {
        self.set_vertical_step(vertical_step);
        self.set_horizontal_step(horizontal_step);
        self.recentre();
    }

    /// Select a vertical step, clamped to the table. Returns whether the selection changed.
    pub fn set_vertical_step(&mut self, step: usize) -> bool {
        let step = step.min(VOLTS_PER_DIVISION_STEPS.len() - 1);
        let changed = step != self.vertical_step;
        self.vertical_step = step;
        changed
    }

    /// Select a horizontal step, clamped to the table. Returns whether the selection changed.
    pub fn set_horizontal_step(&mut self, step: usize) -> bool {
        let step = step.min(SECONDS_PER_DIVISION_STEPS.len() - 1);
        let changed = step != self.horizontal_step;
        self.horizontal_step = step;
        changed
    }

    /// Move the vertical selection by `delta` steps; positive values select finer scales.
    pub fn step_vertical(&mut self, delta: isize) -> bool {
        self.set_vertical_step(self.vertical_step.saturating_add_signed(delta))
    }

    /// Move the horizontal selection by `delta` steps; positive values select finer scales.
    pub fn step_horizontal(&mut self, delta: isize) -> bool {
        self.set_horizontal_step(self.horizontal_step.saturating_add_signed(delta))
    }

    /// Place the zero volt line `pan` divisions from the top of the screen, clamped to the grid.
    pub fn set_vertical_pan(&mut self, pan: Divisions) {
        self.vertical_pan = clamp_pan(pan, GRID_HEIGHT_DIVISIONS);
    }

    /// Place time zero `pan` divisions from the left of the screen, clamped to the grid.
    pub fn set_horizontal_pan(&mut self, pan: Divisions) {
        self.horizontal_pan = clamp_pan(pan, GRID_WIDTH_DIVISIONS);
    }

    /// Shift the zero volt line by `delta` divisions, clamped to the grid.
    pub fn pan_vertical_by(&mut self, delta: Divisions) {
        self.set_vertical_pan(self.vertical_pan + delta);
    }

    /// Shift time zero by `delta` divisions, clamped to the grid.
    pub fn pan_horizontal_by(&mut self, delta: Divisions) {
        self.set_horizontal_pan(self.horizontal_pan + delta);
    }

    /// Put the zero volt line back in the middle of the screen.
    pub fn reset_vertical_pan(&mut self) {
        self.vertical_pan = GRID_HEIGHT_DIVISIONS / 2.0;
    }

    /// Put time zero back in the middle of the screen.
    pub fn reset_horizontal_pan(&mut self) {
        self.horizontal_pan = GRID_WIDTH_DIVISIONS / 2.0;
    }

    /// Put both pans back in the middle of the screen.
    pub fn recentre(&mut self) {
        self.reset_vertical_pan();
        self.reset_horizontal_pan();
    }

    /// A label for the vertical knob, e.g. `500 mV/div`.
    pub fn vertical_label(&self) -> String {
        format_volts_per_division(self.volts_per_division())
    }

    /// A label for the horizontal knob, e.g. `2 ms/div`.
    pub fn horizontal_label(&self) -> String {
        format_seconds_per_division(self.seconds_per_division())
    }
}

fn clamp_pan(pan: Divisions, extent: Divisions) -> Divisions {
    // NaN would slip through clamp.
    if pan.is_nan() {
        return extent / 2.0;
    }
    pan.clamp(0.0, extent)
}

/// Format a volts per division value with the largest unit that keeps it at or above one.
pub fn format_volts_per_division(volts: f64) -> String {
    if volts >= 1.0 {
        format!("{} V/div", trim_number(volts))
    }
    else if volts >= 1e-3 {
        format!("{} mV/div", trim_number(volts * 1e3))
    }
    else {
        format!("{} µV/div", trim_number(volts * 1e6))
    }
}

/// Format a seconds per division value with the largest unit that keeps it at or above one.
pub fn format_seconds_per_division(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{} s/div", trim_number(seconds))
    }
    else if seconds >= 1e-3 {
        format!("{} ms/div", trim_number(seconds * 1e3))
    }
    else {
        format!("{} µs/div", trim_number(seconds * 1e6))
    }
}

/// Print a number with at most three decimals and no trailing zeros.
fn trim_number(value: f64) -> String {
    let text = format!("{value:.3}");
    match text.trim_end_matches('0').trim_end_matches('.') {
        "" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}
